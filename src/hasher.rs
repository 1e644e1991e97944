//! A deterministic, unkeyed hasher for callers that want to control exactly
//! which bucket a key lands in.
//!
//! Integer keys hash to their own value, so a key `k` lands in bucket
//! `k mod capacity`. Anything written as bytes (strings, slices, composite
//! keys) is folded with the FNV-1a step, which keeps the result stable across
//! runs and platforms of the same endianness.
//!
//! ```rust
//! use chained_hash::HashMap;
//! use chained_hash::hasher::BuildModuloHasher;
//!
//! let mut map: HashMap<u64, &str, BuildModuloHasher> =
//!     HashMap::with_capacity_and_hasher(11, BuildModuloHasher::default()).unwrap();
//! map.put(3, "three").unwrap();
//! map.put(14, "fourteen").unwrap();
//!
//! assert_eq!(map.bucket_index(&3), 3);
//! assert_eq!(map.bucket_index(&14), 3);
//! ```

use core::hash::BuildHasherDefault;
use core::hash::Hasher;

const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// [`BuildHasher`](core::hash::BuildHasher) producing [`ModuloHasher`]s.
pub type BuildModuloHasher = BuildHasherDefault<ModuloHasher>;

/// Hasher that maps a single integer to itself and folds byte streams.
///
/// The state starts at zero and every write is mixed in as
/// `state = state * FNV_PRIME ^ word`, so the first integer written is
/// returned unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModuloHasher {
    state: u64,
}

impl ModuloHasher {
    #[inline(always)]
    fn fold(&mut self, word: u64) {
        self.state = self.state.wrapping_mul(FNV_PRIME) ^ word;
    }
}

impl Hasher for ModuloHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.fold(byte as u64);
        }
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.fold(i as u64);
    }

    #[inline]
    fn write_u16(&mut self, i: u16) {
        self.fold(i as u64);
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.fold(i as u64);
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.fold(i);
    }

    #[inline]
    fn write_u128(&mut self, i: u128) {
        self.fold((i >> 64) as u64);
        self.fold(i as u64);
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.fold(i as u64);
    }

    // Signed integers are reinterpreted rather than sign extended so small
    // negative keys stay spread across buckets instead of piling up at the
    // top of the u64 range.

    #[inline]
    fn write_i8(&mut self, i: i8) {
        self.write_u8(i as u8);
    }

    #[inline]
    fn write_i16(&mut self, i: i16) {
        self.write_u16(i as u16);
    }

    #[inline]
    fn write_i32(&mut self, i: i32) {
        self.write_u32(i as u32);
    }

    #[inline]
    fn write_i64(&mut self, i: i64) {
        self.write_u64(i as u64);
    }

    #[inline]
    fn write_i128(&mut self, i: i128) {
        self.write_u128(i as u128);
    }

    #[inline]
    fn write_isize(&mut self, i: isize) {
        self.write_usize(i as usize);
    }
}

#[cfg(test)]
mod tests {
    use core::hash::BuildHasher;

    use super::*;

    #[test]
    fn integers_hash_to_themselves() {
        let state = BuildModuloHasher::default();
        assert_eq!(state.hash_one(0u64), 0);
        assert_eq!(state.hash_one(42u32), 42);
        assert_eq!(state.hash_one(7usize), 7);
        assert_eq!(state.hash_one(19i32), 19);
    }

    #[test]
    fn negative_integers_are_reinterpreted() {
        let state = BuildModuloHasher::default();
        assert_eq!(state.hash_one(-1i32), u32::MAX as u64);
        assert_eq!(state.hash_one(-1i64), u64::MAX);
    }

    #[test]
    fn strings_are_deterministic() {
        let a = BuildModuloHasher::default();
        let b = BuildModuloHasher::default();
        assert_eq!(a.hash_one("adam"), b.hash_one("adam"));
        assert_ne!(a.hash_one("adam"), a.hash_one("eve"));
        assert_eq!(a.hash_one("adam"), a.hash_one(alloc::string::String::from("adam")));
    }

    #[test]
    fn composite_keys_depend_on_order() {
        let state = BuildModuloHasher::default();
        assert_ne!(state.hash_one((1u8, 2u8)), state.hash_one((2u8, 1u8)));
    }
}
