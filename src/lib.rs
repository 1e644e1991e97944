#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Errors returned when constructing or inserting into a table.
pub mod error;

/// A HashMap implementation using separate chaining.
///
/// This module provides a `HashMap` that wraps the `HashTable` and hashes keys
/// with a configurable hasher builder.
pub mod hash_map;

pub mod hash_table;

pub mod hasher;

/// A singly linked list with head and tail links.
pub mod singly_linked_list;

/// A doubly linked list with head and tail links.
pub mod doubly_linked_list;

/// A doubly linked ring built around a single dummy node.
pub mod sentinel_linked_list;

/// A singly linked ring addressed through its last node.
pub mod circular_linked_list;

pub use circular_linked_list::CircularLinkedList;
pub use doubly_linked_list::DoublyLinkedList;
pub use error::Error;
pub use hash_map::HashMap;
pub use hash_table::DEFAULT_CAPACITY;
pub use hash_table::HashTable;
pub use sentinel_linked_list::SentinelLinkedList;
pub use singly_linked_list::SinglyLinkedList;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used by [`HashMap`] when none is specified.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used by [`HashMap`] when none is specified.
        pub type DefaultHashBuilder = std::collections::hash_map::RandomState;
    } else {
        /// The hasher builder used by [`HashMap`] when none is specified.
        pub type DefaultHashBuilder = hasher::BuildModuloHasher;
    }
}
