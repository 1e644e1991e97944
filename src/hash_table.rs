//! A fixed-capacity hash table using separate chaining.
//!
//! [`HashTable`] is the raw storage underneath [`HashMap`](crate::HashMap).
//! It knows nothing about keys: callers hand it a precomputed `u64` hash and
//! an equality predicate, and the table takes care of bucket selection and of
//! the collision chains.
//!
//! Entries are stored in a single arena and chained together by index. A
//! bucket holds the index of the newest entry that hashed to it, and every
//! entry holds the index of the next (older) entry in the same bucket.
//! Removed slots are threaded onto a free list and reused by later inserts.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::Enumerate;
use core::iter::FusedIterator;

use crate::error::Error;

/// Number of buckets used by [`HashTable::new`] and the `new`/`with_hasher`
/// constructors of [`HashMap`](crate::HashMap).
pub const DEFAULT_CAPACITY: usize = 11;

#[derive(Clone)]
struct Node<V> {
    hash: u64,
    value: V,
    next: Option<usize>,
}

#[derive(Clone)]
enum Slot<V> {
    Occupied(Node<V>),
    Vacant { next_free: Option<usize> },
}

impl<V> Slot<V> {
    // Chain links and bucket heads only ever point at occupied slots; reaching a
    // vacant one means the arena is corrupt.
    #[inline(always)]
    fn node(&self) -> &Node<V> {
        match self {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("collision chain links to a vacant slot"),
        }
    }

    #[inline(always)]
    fn node_mut(&mut self) -> &mut Node<V> {
        match self {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("collision chain links to a vacant slot"),
        }
    }
}

/// A hash table with a fixed number of buckets, resolving collisions by
/// chaining entries together.
///
/// `HashTable<V>` stores values of type `V` without any knowledge of keys.
/// Every operation takes the value's precomputed hash and, where a lookup is
/// involved, an equality closure to identify the wanted entry.
///
/// # Shadowing inserts
///
/// [`insert`](HashTable::insert) never searches for an existing equal entry.
/// A second insert for the same key adds a second entry at the head of the
/// bucket's chain, so lookups find the newer one first. Removing the newer
/// entry exposes the older one again.
///
/// # Capacity
///
/// The number of buckets is chosen at construction and never changes. There is
/// no resizing: chains simply grow as the load factor rises.
///
/// # Examples
///
/// ```rust
/// use chained_hash::HashTable;
///
/// let mut table = HashTable::with_capacity(11).unwrap();
/// table.insert(3, "three").unwrap();
/// table.insert(14, "fourteen").unwrap();
///
/// // Both hashes share bucket 3; the newest entry heads the chain.
/// let chain: Vec<_> = table.bucket(3).unwrap().copied().collect();
/// assert_eq!(chain, ["fourteen", "three"]);
///
/// assert_eq!(table.find(3, |v| *v == "three"), Some(&"three"));
/// assert_eq!(table.remove(14, |v| *v == "fourteen"), Some("fourteen"));
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    heads: Box<[Option<usize>]>,
    slots: Vec<Slot<V>>,
    free: Option<usize>,
    populated: usize,
}

impl<V> Debug for HashTable<V>
where
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        struct ChainDebug<'a, V>(Chain<'a, V>);

        impl<V: Debug> Debug for ChainDebug<'_, V> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_list().entries(self.0.clone()).finish()
            }
        }

        struct BucketsDebug<'a, V>(&'a HashTable<V>);

        impl<V: Debug> Debug for BucketsDebug<'_, V> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_map()
                    .entries(
                        self.0
                            .buckets()
                            .map(|(index, chain)| (index, ChainDebug(chain))),
                    )
                    .finish()
            }
        }

        f.debug_struct("HashTable")
            .field("populated", &self.populated)
            .field("capacity", &self.capacity())
            .field("buckets", &BucketsDebug(self))
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates a new table with [`DEFAULT_CAPACITY`] buckets.
    pub fn new() -> Self {
        log::trace!("allocating hash table with {DEFAULT_CAPACITY} buckets");
        Self::from_heads(vec![None; DEFAULT_CAPACITY].into_boxed_slice())
    }

    /// Creates a new table with exactly `capacity` buckets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroCapacity`] if `capacity` is zero, before anything
    /// is allocated, and [`Error::Alloc`] if the bucket array cannot be
    /// allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chained_hash::Error;
    /// use chained_hash::HashTable;
    ///
    /// let table: HashTable<u32> = HashTable::with_capacity(7).unwrap();
    /// assert_eq!(table.capacity(), 7);
    ///
    /// assert_eq!(HashTable::<u32>::with_capacity(0).unwrap_err(), Error::ZeroCapacity);
    /// ```
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        if capacity == 0 {
            log::debug!("rejected hash table with zero buckets");
            return Err(Error::ZeroCapacity);
        }

        let mut heads = Vec::new();
        heads.try_reserve_exact(capacity)?;
        heads.resize(capacity, None);

        log::trace!("allocating hash table with {capacity} buckets");
        Ok(Self::from_heads(heads.into_boxed_slice()))
    }

    fn from_heads(heads: Box<[Option<usize>]>) -> Self {
        Self {
            heads,
            slots: Vec::new(),
            free: None,
            populated: 0,
        }
    }

    /// Returns the bucket a value with the given hash belongs to.
    ///
    /// This is `hash mod capacity` and depends on nothing but its inputs.
    #[inline]
    pub fn bucket_index(&self, hash: u64) -> usize {
        (hash % self.heads.len() as u64) as usize
    }

    /// Returns the number of buckets. This never changes after construction.
    pub fn capacity(&self) -> usize {
        self.heads.len()
    }

    /// Returns the number of entries in the table, counting shadowed entries.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the ratio of live entries to buckets.
    pub fn load_factor(&self) -> f64 {
        self.populated as f64 / self.heads.len() as f64
    }

    /// Inserts `value` at the head of the chain for `hash` and returns a
    /// mutable reference to it.
    ///
    /// No search for an equal entry is made. If one exists it stays in the
    /// chain behind the new entry and is shadowed by it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Alloc`] if the entry arena cannot grow. The value is
    /// dropped and the table is left unchanged. Use
    /// [`try_insert`](HashTable::try_insert) to get the value back instead.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chained_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.insert(5, ("key", 1)).unwrap();
    /// table.insert(5, ("key", 2)).unwrap();
    ///
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(table.find(5, |(k, _)| *k == "key"), Some(&("key", 2)));
    /// ```
    pub fn insert(&mut self, hash: u64, value: V) -> Result<&mut V, Error> {
        self.try_insert(hash, value).map_err(|(err, _)| err)
    }

    /// Like [`insert`](HashTable::insert), but hands `value` back alongside
    /// the error when the entry arena cannot grow, so the caller can retry
    /// without rebuilding it.
    pub fn try_insert(&mut self, hash: u64, value: V) -> Result<&mut V, (Error, V)> {
        let bucket = self.bucket_index(hash);

        let index = match self.free {
            Some(index) => {
                self.free = match self.slots[index] {
                    Slot::Vacant { next_free } => next_free,
                    Slot::Occupied(_) => unreachable!("free list links to an occupied slot"),
                };
                index
            }
            None => {
                if let Err(err) = self.slots.try_reserve(1) {
                    log::warn!("hash table entry allocation failed: {err}");
                    return Err((err.into(), value));
                }
                self.slots.push(Slot::Vacant { next_free: None });
                self.slots.len() - 1
            }
        };

        self.slots[index] = Slot::Occupied(Node {
            hash,
            value,
            next: self.heads[bucket],
        });
        self.heads[bucket] = Some(index);
        self.populated += 1;

        Ok(&mut self.slots[index].node_mut().value)
    }

    fn position(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<usize> {
        let mut cursor = self.heads[self.bucket_index(hash)];
        while let Some(index) = cursor {
            let node = self.slots[index].node();
            if node.hash == hash && eq(&node.value) {
                return Some(index);
            }
            cursor = node.next;
        }

        None
    }

    /// Finds the first entry in chain order with the given hash that
    /// satisfies `eq`.
    ///
    /// Chains are ordered newest first, so with shadowed duplicates the most
    /// recently inserted match is returned.
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        self.position(hash, eq)
            .map(|index| &self.slots[index].node().value)
    }

    /// Mutable counterpart of [`find`](HashTable::find).
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        self.position(hash, eq)
            .map(|index| &mut self.slots[index].node_mut().value)
    }

    /// Removes the first entry in chain order with the given hash that
    /// satisfies `eq`, returning its value.
    ///
    /// At most one entry is removed. If the removed entry was shadowing an
    /// older duplicate, that duplicate becomes visible to lookups again.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chained_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.insert(9, ("k", "old")).unwrap();
    /// table.insert(9, ("k", "new")).unwrap();
    ///
    /// assert_eq!(table.remove(9, |(k, _)| *k == "k"), Some(("k", "new")));
    /// assert_eq!(table.find(9, |(k, _)| *k == "k"), Some(&("k", "old")));
    /// assert_eq!(table.remove(9, |(k, _)| *k == "k"), Some(("k", "old")));
    /// assert_eq!(table.remove(9, |(k, _)| *k == "k"), None);
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        let bucket = self.bucket_index(hash);

        let mut previous: Option<usize> = None;
        let mut cursor = self.heads[bucket];
        while let Some(index) = cursor {
            let node = self.slots[index].node();
            if node.hash == hash && eq(&node.value) {
                let next = node.next;
                match previous {
                    None => self.heads[bucket] = next,
                    Some(previous) => self.slots[previous].node_mut().next = next,
                }
                return Some(self.release(index));
            }

            previous = Some(index);
            cursor = node.next;
        }

        None
    }

    /// Moves the value out of an already unlinked slot and threads the slot
    /// onto the free list.
    fn release(&mut self, index: usize) -> V {
        let slot = core::mem::replace(
            &mut self.slots[index],
            Slot::Vacant {
                next_free: self.free,
            },
        );
        self.free = Some(index);
        self.populated -= 1;

        match slot {
            Slot::Occupied(node) => node.value,
            Slot::Vacant { .. } => unreachable!("released a vacant slot"),
        }
    }

    /// Drops every entry and empties every bucket, returning how many entries
    /// were released.
    ///
    /// The bucket count is unchanged and the table can be used again
    /// immediately.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chained_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.insert(1, 'a').unwrap();
    /// table.insert(12, 'b').unwrap();
    ///
    /// assert_eq!(table.clear(), 2);
    /// assert_eq!(table.clear(), 0);
    /// assert!(table.is_empty());
    /// ```
    pub fn clear(&mut self) -> usize {
        let released = self.populated;

        self.heads.fill(None);
        self.slots.clear();
        self.free = None;
        self.populated = 0;

        log::trace!("cleared {released} entries from hash table");
        released
    }

    /// Returns the chain stored in bucket `index`, or `None` if `index` is
    /// not less than the capacity.
    pub fn bucket(&self, index: usize) -> Option<Chain<'_, V>> {
        self.heads.get(index).map(|head| Chain {
            slots: &self.slots,
            cursor: *head,
        })
    }

    /// Returns an iterator over every bucket in index order, yielding the
    /// bucket index and its chain.
    ///
    /// Each chain runs from the most recently inserted entry to the oldest.
    /// Empty buckets are included.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chained_hash::HashTable;
    ///
    /// let mut table = HashTable::with_capacity(3).unwrap();
    /// table.insert(1, "a").unwrap();
    /// table.insert(4, "b").unwrap();
    /// table.insert(2, "c").unwrap();
    ///
    /// let dump: Vec<(usize, Vec<&str>)> = table
    ///     .buckets()
    ///     .map(|(index, chain)| (index, chain.copied().collect()))
    ///     .collect();
    /// assert_eq!(dump, [(0, vec![]), (1, vec!["b", "a"]), (2, vec!["c"])]);
    /// ```
    pub fn buckets(&self) -> Buckets<'_, V> {
        Buckets {
            slots: &self.slots,
            heads: self.heads.iter().enumerate(),
        }
    }

    /// Returns an iterator over all values in bucket order, then chain order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets(),
            chain: Chain {
                slots: &self.slots,
                cursor: None,
            },
            remaining: self.populated,
        }
    }

    /// Removes every value from the table, yielding them in bucket order.
    ///
    /// Values not consumed before the iterator is dropped are dropped with it.
    pub fn drain(&mut self) -> Drain<'_, V> {
        Drain {
            table: self,
            bucket: 0,
        }
    }

    /// Returns a histogram of chain lengths: entry `n` is the number of
    /// buckets holding exactly `n` entries.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> ChainHistogram {
        let mut counts: Vec<usize> = Vec::new();
        for (_, chain) in self.buckets() {
            let length = chain.count();
            if counts.len() <= length {
                counts.resize(length + 1, 0);
            }
            counts[length] += 1;
        }

        ChainHistogram { counts }
    }

    /// Summarizes how entries are spread over the buckets.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let histogram = self.chain_histogram();

        DebugStats {
            populated: self.populated,
            capacity: self.capacity(),
            empty_buckets: histogram.counts.first().copied().unwrap_or(0),
            longest_chain: histogram.counts.len().saturating_sub(1),
            load_factor: self.load_factor(),
            vacant_slots: self.slots.len() - self.populated,
        }
    }
}

/// Count of buckets per chain length, produced by
/// [`HashTable::chain_histogram`].
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainHistogram {
    counts: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ChainHistogram {
    /// Bucket counts indexed by chain length.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Prints one line per chain length.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let total: usize = self.counts.iter().sum();
        std::println!("Chain length histogram ({total} buckets):");
        for (length, count) in self.counts.iter().enumerate() {
            let share = if total == 0 {
                0.0
            } else {
                *count as f64 / total as f64 * 100.0
            };
            std::println!("  {length:>3}: {count:>8} ({share:>6.2}%)");
        }
    }
}

/// Occupancy summary produced by [`HashTable::debug_stats`].
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq)]
pub struct DebugStats {
    /// Live entries, shadowed ones included.
    pub populated: usize,
    /// Number of buckets.
    pub capacity: usize,
    /// Buckets with an empty chain.
    pub empty_buckets: usize,
    /// Length of the longest chain.
    pub longest_chain: usize,
    /// `populated / capacity`.
    pub load_factor: f64,
    /// Arena slots waiting on the free list.
    pub vacant_slots: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Prints the summary.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        std::println!("Populated:      {}", self.populated);
        std::println!("Buckets:        {}", self.capacity);
        std::println!("Empty buckets:  {}", self.empty_buckets);
        std::println!("Longest chain:  {}", self.longest_chain);
        std::println!("Load factor:    {:.2}", self.load_factor);
        std::println!("Vacant slots:   {}", self.vacant_slots);
    }
}

/// An iterator over one bucket's collision chain, newest entry first.
pub struct Chain<'a, V> {
    slots: &'a [Slot<V>],
    cursor: Option<usize>,
}

impl<V> Clone for Chain<'_, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots,
            cursor: self.cursor,
        }
    }
}

impl<'a, V> Iterator for Chain<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let slots: &'a [Slot<V>] = self.slots;
        let node = slots[self.cursor?].node();
        self.cursor = node.next;
        Some(&node.value)
    }
}

impl<V> FusedIterator for Chain<'_, V> {}

/// An iterator over every bucket of a [`HashTable`] in index order.
pub struct Buckets<'a, V> {
    slots: &'a [Slot<V>],
    heads: Enumerate<core::slice::Iter<'a, Option<usize>>>,
}

impl<'a, V> Iterator for Buckets<'a, V> {
    type Item = (usize, Chain<'a, V>);

    fn next(&mut self) -> Option<Self::Item> {
        let (index, head) = self.heads.next()?;
        Some((
            index,
            Chain {
                slots: self.slots,
                cursor: *head,
            },
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.heads.size_hint()
    }
}

impl<V> ExactSizeIterator for Buckets<'_, V> {}

impl<V> FusedIterator for Buckets<'_, V> {}

/// An iterator over all values of a [`HashTable`].
pub struct Iter<'a, V> {
    buckets: Buckets<'a, V>,
    chain: Chain<'a, V>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(value) = self.chain.next() {
                self.remaining -= 1;
                return Some(value);
            }
            if self.remaining == 0 {
                return None;
            }
            let (_, chain) = self.buckets.next()?;
            self.chain = chain;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

/// A draining iterator over the values of a [`HashTable`].
pub struct Drain<'a, V> {
    table: &'a mut HashTable<V>,
    bucket: usize,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        while self.bucket < self.table.heads.len() {
            if let Some(index) = self.table.heads[self.bucket] {
                self.table.heads[self.bucket] = self.table.slots[index].node().next;
                return Some(self.table.release(index));
            }
            self.bucket += 1;
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.populated, Some(self.table.populated))
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}

impl<V> Drop for Drain<'_, V> {
    fn drop(&mut self) {
        self.table.clear();
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use core::hash::Hasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;

    struct HashState {
        k0: u64,
        k1: u64,
    }

    impl HashState {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k0: rng.try_next_u64().unwrap(),
                k1: rng.try_next_u64().unwrap(),
            }
        }

        fn build_hasher(&self) -> SipHasher {
            SipHasher::new_with_keys(self.k0, self.k1)
        }
    }

    #[derive(Debug, PartialEq, Eq, Clone)]
    struct Item {
        key: u64,
        value: i32,
    }

    fn hash_key(state: &HashState, key: u64) -> u64 {
        let mut h = state.build_hasher();
        h.write_u64(key);
        h.finish()
    }

    fn chain_values(table: &HashTable<Item>, bucket: usize) -> Vec<i32> {
        table
            .bucket(bucket)
            .expect("bucket in range")
            .map(|item| item.value)
            .collect()
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(
            HashTable::<Item>::with_capacity(0).unwrap_err(),
            Error::ZeroCapacity
        );
    }

    #[test]
    fn oversized_capacity_is_an_allocation_error() {
        assert!(matches!(
            HashTable::<u8>::with_capacity(usize::MAX),
            Err(Error::Alloc(_))
        ));
        assert!(matches!(
            HashTable::<Item>::with_capacity(usize::MAX / 2),
            Err(Error::Alloc(_))
        ));
    }

    #[test]
    fn try_insert_returns_reference_to_new_entry() {
        let mut table: HashTable<u32> = HashTable::with_capacity(3).unwrap();
        *table.try_insert(4, 40).unwrap() += 1;
        table.try_insert(4, 7).unwrap();

        assert_eq!(table.find(4, |&v| v == 41), Some(&41));
        assert_eq!(table.bucket(1).unwrap().copied().collect::<Vec<_>>(), vec![7, 41]);
    }

    #[test]
    fn new_uses_default_capacity() {
        let table: HashTable<Item> = HashTable::new();
        assert_eq!(table.capacity(), DEFAULT_CAPACITY);
        assert!(table.is_empty());
        assert_eq!(table.buckets().len(), DEFAULT_CAPACITY);
    }

    #[test]
    fn insert_and_find() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::with_capacity(13).unwrap();
        for k in 0..64u64 {
            let hash = hash_key(&state, k);
            table
                .insert(
                    hash,
                    Item {
                        key: k,
                        value: (k as i32) * 2,
                    },
                )
                .unwrap();
            assert_eq!(
                table.find(hash, |v| v.key == k),
                Some(&Item {
                    key: k,
                    value: (k as i32) * 2
                }),
                "{:#?}",
                table
            );
        }
        assert_eq!(table.len(), 64);
        assert_eq!(table.capacity(), 13);

        for k in 0..64u64 {
            let hash = hash_key(&state, k);
            assert_eq!(
                table.find(hash, |v| v.key == k).map(|v| v.value),
                Some((k as i32) * 2)
            );
        }

        let miss_hash = hash_key(&state, 999);
        assert!(table.find(miss_hash, |v| v.key == 999).is_none());
    }

    #[test]
    fn entries_land_in_hash_mod_capacity() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::with_capacity(7).unwrap();
        for k in 0..50u64 {
            table
                .insert(hash_key(&state, k), Item { key: k, value: 0 })
                .unwrap();
        }

        for (index, chain) in table.buckets() {
            for item in chain {
                assert_eq!(hash_key(&state, item.key) % 7, index as u64);
            }
        }
    }

    #[test]
    fn insert_pushes_onto_chain_head() {
        let mut table: HashTable<Item> = HashTable::with_capacity(11).unwrap();
        for (n, hash) in [3u64, 14, 25, 36].into_iter().enumerate() {
            table
                .insert(
                    hash,
                    Item {
                        key: hash,
                        value: n as i32,
                    },
                )
                .unwrap();
        }

        assert_eq!(chain_values(&table, 3), vec![3, 2, 1, 0]);
        assert!(chain_values(&table, 4).is_empty());
    }

    #[test]
    fn duplicate_insert_shadows() {
        let mut table: HashTable<Item> = HashTable::new();
        table.insert(42, Item { key: 1, value: 7 }).unwrap();
        table.insert(42, Item { key: 1, value: 11 }).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.find(42, |v| v.key == 1).map(|v| v.value), Some(11));

        assert_eq!(table.remove(42, |v| v.key == 1).map(|v| v.value), Some(11));
        assert_eq!(table.find(42, |v| v.key == 1).map(|v| v.value), Some(7));

        assert_eq!(table.remove(42, |v| v.key == 1).map(|v| v.value), Some(7));
        assert_eq!(table.remove(42, |v| v.key == 1), None);
        assert!(table.is_empty());
    }

    #[test]
    fn equal_predicate_with_different_hash_does_not_match() {
        let mut table: HashTable<Item> = HashTable::with_capacity(11).unwrap();
        table.insert(3, Item { key: 1, value: 1 }).unwrap();

        // Same bucket, different full hash.
        assert!(table.find(14, |v| v.key == 1).is_none());
        assert!(table.remove(14, |v| v.key == 1).is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn remove_relinks_head_middle_and_tail() {
        let mut table: HashTable<Item> = HashTable::with_capacity(11).unwrap();
        // Chain in bucket 0 is 44 -> 33 -> 22 -> 11 -> 0 after these inserts.
        for hash in [0u64, 11, 22, 33, 44] {
            table
                .insert(
                    hash,
                    Item {
                        key: hash,
                        value: hash as i32,
                    },
                )
                .unwrap();
        }

        // Middle.
        assert!(table.remove(22, |v| v.key == 22).is_some());
        assert_eq!(chain_values(&table, 0), vec![44, 33, 11, 0]);

        // Head.
        assert!(table.remove(44, |v| v.key == 44).is_some());
        assert_eq!(chain_values(&table, 0), vec![33, 11, 0]);

        // Tail.
        assert!(table.remove(0, |v| v.key == 0).is_some());
        assert_eq!(chain_values(&table, 0), vec![33, 11]);

        assert!(table.remove(0, |v| v.key == 0).is_none());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn removed_slots_are_reused() {
        let mut table: HashTable<Item> = HashTable::with_capacity(5).unwrap();
        for k in 0..10u64 {
            table.insert(k, Item { key: k, value: 0 }).unwrap();
        }
        assert_eq!(table.slots.len(), 10);

        for k in 0..4u64 {
            assert!(table.remove(k, |v| v.key == k).is_some());
        }
        for k in 100..104u64 {
            table.insert(k, Item { key: k, value: 1 }).unwrap();
        }

        assert_eq!(table.slots.len(), 10);
        assert_eq!(table.len(), 10);
        for k in (4..10u64).chain(100..104) {
            assert!(table.find(k, |v| v.key == k).is_some());
        }
    }

    #[test]
    fn find_mut_updates_in_place() {
        let mut table: HashTable<Item> = HashTable::new();
        table.insert(8, Item { key: 8, value: 1 }).unwrap();

        if let Some(item) = table.find_mut(8, |v| v.key == 8) {
            item.value = 99;
        }
        assert_eq!(table.find(8, |v| v.key == 8).map(|v| v.value), Some(99));
        assert!(table.find_mut(9, |v| v.key == 9).is_none());
    }

    #[test]
    fn clear_counts_and_keeps_capacity() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::with_capacity(17).unwrap();
        for k in 0..40u64 {
            table
                .insert(hash_key(&state, k), Item { key: k, value: 0 })
                .unwrap();
        }
        for k in 0..10u64 {
            let hash = hash_key(&state, k);
            assert!(table.remove(hash, |v| v.key == k).is_some());
        }

        assert_eq!(table.clear(), 30);
        assert_eq!(table.capacity(), 17);
        assert!(table.is_empty());
        assert!(table.buckets().all(|(_, mut chain)| chain.next().is_none()));
        for k in 0..40u64 {
            let hash = hash_key(&state, k);
            assert!(table.find(hash, |v| v.key == k).is_none());
        }

        assert_eq!(table.clear(), 0);

        table.insert(5, Item { key: 5, value: 5 }).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.find(5, |v| v.key == 5).map(|v| v.value), Some(5));
    }

    #[test]
    fn bucket_out_of_range() {
        let table: HashTable<Item> = HashTable::with_capacity(4).unwrap();
        assert!(table.bucket(3).is_some());
        assert!(table.bucket(4).is_none());
    }

    #[test]
    fn iter_follows_bucket_then_chain_order() {
        let mut table: HashTable<Item> = HashTable::with_capacity(3).unwrap();
        for hash in [2u64, 0, 3, 5, 1] {
            table
                .insert(
                    hash,
                    Item {
                        key: hash,
                        value: hash as i32,
                    },
                )
                .unwrap();
        }

        let iter = table.iter();
        assert_eq!(iter.len(), 5);
        let order: Vec<i32> = iter.map(|v| v.value).collect();
        assert_eq!(order, vec![3, 0, 1, 5, 2]);
    }

    #[test]
    fn iter_string_values() {
        let mut table: HashTable<String> = HashTable::with_capacity(2).unwrap();
        for (hash, s) in [(0u64, "a"), (1, "b"), (2, "c")] {
            table.insert(hash, s.to_string()).unwrap();
        }

        let mut found = table.iter().cloned().collect::<Vec<_>>();
        found.sort();
        assert_eq!(found, vec!["a", "b", "c"]);
    }

    #[test]
    fn drain_empties_table() {
        let mut table: HashTable<String> = HashTable::with_capacity(3).unwrap();
        for (hash, s) in [(0u64, "a"), (3, "b"), (2, "c")] {
            table.insert(hash, s.to_string()).unwrap();
        }

        let drained: Vec<String> = table.drain().collect();
        assert_eq!(drained, vec!["b", "a", "c"]);
        assert!(table.is_empty());
        assert!(table.slots.is_empty());

        table.insert(1, "d".to_string()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn dropped_drain_releases_remaining() {
        let mut table: HashTable<String> = HashTable::with_capacity(3).unwrap();
        for hash in 0..9u64 {
            table.insert(hash, hash.to_string()).unwrap();
        }

        let mut drain = table.drain();
        assert_eq!(drain.len(), 9);
        assert!(drain.next().is_some());
        drop(drain);

        assert!(table.is_empty());
        assert!(table.iter().next().is_none());
    }

    #[test]
    fn clone_is_independent() {
        let state = HashState::default();
        let mut original: HashTable<Item> = HashTable::with_capacity(5).unwrap();
        for k in 0..20u64 {
            original
                .insert(
                    hash_key(&state, k),
                    Item {
                        key: k,
                        value: k as i32,
                    },
                )
                .unwrap();
        }

        let cloned = original.clone();
        assert_eq!(cloned.len(), original.len());

        let hash = hash_key(&state, 3);
        if let Some(item) = original.find_mut(hash, |v| v.key == 3) {
            item.value = 999;
        }
        assert_eq!(
            original.find(hash, |v| v.key == 3).map(|v| v.value),
            Some(999)
        );
        assert_eq!(cloned.find(hash, |v| v.key == 3).map(|v| v.value), Some(3));
    }

    #[test]
    fn drops_long_chain_without_recursion() {
        let mut table: HashTable<String> = HashTable::with_capacity(1).unwrap();
        for n in 0..200_000u64 {
            table.insert(0, n.to_string()).unwrap();
        }
        assert_eq!(table.bucket(0).unwrap().count(), 200_000);
        drop(table);
    }

    #[test]
    fn histogram_and_stats() {
        let mut table: HashTable<Item> = HashTable::with_capacity(4).unwrap();
        for hash in [0u64, 4, 8, 1] {
            table.insert(hash, Item { key: hash, value: 0 }).unwrap();
        }
        table.remove(1, |v| v.key == 1);

        assert_eq!(table.chain_histogram().counts(), &[3, 0, 0, 1]);

        let stats = table.debug_stats();
        assert_eq!(stats.populated, 3);
        assert_eq!(stats.capacity, 4);
        assert_eq!(stats.empty_buckets, 3);
        assert_eq!(stats.longest_chain, 3);
        assert_eq!(stats.vacant_slots, 1);
        assert!((stats.load_factor - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn debug_output_lists_buckets() {
        let mut table: HashTable<u32> = HashTable::with_capacity(2).unwrap();
        table.insert(1, 10).unwrap();
        table.insert(3, 30).unwrap();

        let rendered = alloc::format!("{:?}", table);
        assert_eq!(
            rendered,
            "HashTable { populated: 2, capacity: 2, buckets: {0: [], 1: [30, 10]} }"
        );
    }
}
