//! The cache engine: both directories behind independent locks.
//!
//! Every public operation acquires the lock of the cache it touches for the
//! whole call; interval-tree restructuring and recency-list splicing are not
//! safely interruptible. The write-cache and read-cache locks are
//! independent, so staging traffic never blocks read-through traffic.

use parking_lot::Mutex;

use crate::config::CacheConfig;
use crate::dataset::DataSet;
use crate::error::CacheResult;
use crate::fingerprint::Fingerprint;
use crate::read_cache::{ReadCache, ReadCacheStats};
use crate::write_cache::{WriteCache, WriteCacheStats};

/// Thread-safe facade over a [`WriteCache`] and a [`ReadCache`].
///
/// An engine is an ordinary value; construct as many as needed (tests do).
/// there is no process-wide state. Dropping the engine releases everything;
/// [`CacheEngine::shutdown`] does the same explicitly for callers that want a
/// teardown point.
pub struct CacheEngine {
    config: CacheConfig,
    write_cache: Mutex<WriteCache>,
    read_cache: Mutex<ReadCache>,
}

impl CacheEngine {
    /// Creates an engine with empty caches.
    pub fn new(config: CacheConfig) -> Self {
        tracing::debug!(
            read_budget_bytes = config.read_budget_bytes,
            "cache engine initialized"
        );
        Self {
            write_cache: Mutex::new(WriteCache::new()),
            read_cache: Mutex::new(ReadCache::new(config.clone())),
            config,
        }
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Stages `data` at `offset` for `fingerprint` in the write cache.
    pub fn write(&self, fingerprint: &Fingerprint, offset: u64, data: &[u8]) -> CacheResult<()> {
        self.write_cache.lock().write(fingerprint, offset, data)
    }

    /// Reads staged fragments intersecting `[offset, offset + len)`.
    ///
    /// The locked facade returns owned copies; embedders holding a
    /// [`WriteCache`] directly can use [`WriteCache::read`] for borrowed
    /// views instead.
    pub fn read(&self, fingerprint: &Fingerprint, offset: u64, len: u64) -> DataSet {
        self.write_cache.lock().read(fingerprint, offset, len).to_data_set()
    }

    /// Drains everything staged for `fingerprint`, transferring buffer
    /// ownership to the caller. `None` when nothing is staged.
    pub fn collect(&self, fingerprint: &Fingerprint) -> Option<DataSet> {
        self.write_cache.lock().collect(fingerprint)
    }

    /// Returns copies of read-cached fragments intersecting
    /// `[offset, offset + len)`, promoting each to most-recently-used.
    pub fn get(&self, fingerprint: &Fingerprint, offset: u64, len: u64) -> DataSet {
        self.read_cache.lock().get(fingerprint, offset, len)
    }

    /// Inserts previously fetched data into the read cache, then evicts as
    /// needed to stay under the byte budget.
    pub fn put(&self, fingerprint: &Fingerprint, offset: u64, data: &[u8]) -> CacheResult<()> {
        self.read_cache.lock().put(fingerprint, offset, data)
    }

    /// Snapshot of write-cache counters and gauges.
    pub fn write_stats(&self) -> WriteCacheStats {
        self.write_cache.lock().stats()
    }

    /// Snapshot of read-cache counters and gauges.
    pub fn read_stats(&self) -> ReadCacheStats {
        self.read_cache.lock().stats()
    }

    /// Releases every fragment, directory entry, and bucket list across both
    /// caches, leaving the engine empty but usable.
    pub fn shutdown(&self) {
        self.write_cache.lock().clear();
        self.read_cache.lock().clear();
        tracing::debug!("cache engine shut down");
    }
}

impl Default for CacheEngine {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
