use alloc::collections::TryReserveError;

/// Errors produced while building or growing a table.
///
/// Looking up or removing a key that is not present is not an error; those
/// operations report absence through an [`Option`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A table was requested with zero buckets.
    ///
    /// Every key must map to some bucket, so a table needs at least one.
    #[error("a chained hash table needs at least one bucket")]
    ZeroCapacity,

    /// The allocator could not provide memory for the bucket array or for a
    /// new entry.
    #[error("failed to allocate table storage")]
    Alloc(#[from] TryReserveError),
}
