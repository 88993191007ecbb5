use thiserror::Error;

/// Errors reported by [`KeyValueHeap`](crate::KeyValueHeap) operations.
///
/// Every variant is a contract violation on the caller's side. The heap is
/// left untouched, with its heap property intact, whenever one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// The key cannot be ordered against itself (e.g. `f64::NAN`), so it has
    /// no place in a heap.
    #[error("key is not comparable with itself")]
    InvalidKey,

    /// The destination of a bulk export cannot hold every live entry.
    #[error("destination too small: {required} entries from offset {offset}, but only {available} slots")]
    InsufficientSpace {
        offset: usize,
        required: usize,
        available: usize,
    },

    /// The operation needs at least one entry.
    #[error("heap is empty")]
    Empty,

    /// The heap was structurally modified after the enumeration started.
    #[error("heap was modified during enumeration (generation {expected}, now {found})")]
    ConcurrentModification { expected: u64, found: u64 },

    /// The enumeration session was started on a different heap.
    #[error("enumerator belongs to heap {expected}, not heap {found}")]
    ForeignSource { expected: u64, found: u64 },
}
