//! Error type shared by both map implementations

use thiserror::Error;

/// Convenience alias for results returned by map operations
pub type Result<T> = std::result::Result<T, MapError>;

/// Errors raised when a map detects that its internal invariants no longer hold.
///
/// A missing key is never an error; lookups report absence with `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// A probe walk visited `capacity` slots without finding the key or a free slot.
    ///
    /// The load-factor resize policy keeps a free slot on every probe sequence, so this
    /// indicates a corrupted table rather than a full one.
    #[error("probe sequence for key {key:?} exhausted all {capacity} buckets without a free slot")]
    ProbeExhausted {
        /// The key being inserted
        key: String,
        /// Bucket count of the table at the time of the failure
        capacity: usize,
    },

    /// A computed bucket index fell outside the bucket array.
    #[error("bucket {index} for key {key:?} is outside a table of {capacity} buckets")]
    MissingBucket {
        /// The key being inserted
        key: String,
        /// The out-of-range bucket index
        index: usize,
        /// Bucket count of the table at the time of the failure
        capacity: usize,
    },
}
