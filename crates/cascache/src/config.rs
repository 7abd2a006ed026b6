//! Configuration for the cache engine.

use serde::{Deserialize, Serialize};

/// Default read-cache byte budget (512 MiB).
pub const DEFAULT_READ_BUDGET_BYTES: u64 = 512 * 1024 * 1024;

/// Configuration for a [`crate::engine::CacheEngine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Total bytes the read cache may keep resident before eviction kicks in.
    ///
    /// The write cache is not budgeted; it holds staged data only until the
    /// flush path collects it.
    pub read_budget_bytes: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            read_budget_bytes: DEFAULT_READ_BUDGET_BYTES,
        }
    }
}
