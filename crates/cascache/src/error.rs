//! Error types for the cache engine.

use thiserror::Error;

/// Result type alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Error variants for cache operations.
///
/// Lookups that miss are not errors; they return empty or `None` results.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A raw fragment insertion targeted a range that already intersects a
    /// resident fragment. The overlap-splitting insert never produces this;
    /// seeing it means the disjointness invariant was about to be broken.
    #[error("fragment overlap at offset {offset} (len {len}): range index must stay disjoint")]
    FragmentOverlap {
        /// Offset of the rejected insertion.
        offset: u64,
        /// Length of the rejected insertion.
        len: u64,
    },
}
