//! Read-through cache: previously fetched ranges kept under a global byte
//! budget, evicted approximately least-recently-used across all fingerprints.

use lru::LruCache;
use serde::{Deserialize, Serialize};

use crate::config::CacheConfig;
use crate::dataset::{DataSegment, DataSet};
use crate::directory::Directory;
use crate::error::CacheResult;
use crate::fingerprint::Fingerprint;

/// Stable handle of one resident fragment: enough to reach its directory
/// entry and its slot in the range index in O(1) + one bucket probe, which is
/// what eviction needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FragmentKey {
    value: [u8; 16],
    offset: u64,
}

/// Counters and gauges for a [`ReadCache`].
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ReadCacheStats {
    /// Number of `get` calls.
    pub gets: u64,
    /// `get` calls that returned at least one fragment.
    pub hits: u64,
    /// `get` calls that returned nothing.
    pub misses: u64,
    /// Number of `put` calls that inserted data.
    pub puts: u64,
    /// Fragments evicted to stay under budget.
    pub evictions: u64,
    /// Bytes inserted as new fragments over the cache's lifetime.
    pub inserted_bytes: u64,
    /// Bytes copied into already-resident fragments over the cache's
    /// lifetime. Not charged against the budget; see `resident_bytes`.
    pub overwritten_bytes: u64,
    /// Bytes currently resident.
    pub resident_bytes: u64,
    /// Fragments currently resident.
    pub fragments: usize,
    /// Fingerprints currently resident.
    pub objects: usize,
}

/// Budgeted read-through cache with a global recency list.
pub struct ReadCache {
    directory: Directory,
    /// Global recency list over all resident fragments, MRU first. Unbounded:
    /// the byte budget, not an entry count, decides eviction.
    recency: LruCache<FragmentKey, ()>,
    /// Sum of resident fragment lengths. Bytes overwritten in place are not
    /// added again; the counter tracks exactly what eviction can reclaim.
    resident_bytes: u64,
    budget_bytes: u64,
    stats: ReadCacheStats,
}

impl ReadCache {
    /// Creates an empty read cache with the configured byte budget.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            directory: Directory::new(),
            recency: LruCache::unbounded(),
            resident_bytes: 0,
            budget_bytes: config.read_budget_bytes,
            stats: ReadCacheStats::default(),
        }
    }

    /// Returns copies of the cached fragments intersecting
    /// `[offset, offset + len)`, ascending by offset.
    ///
    /// Every returned fragment is promoted to most-recently-used. Unknown
    /// fingerprints yield an empty set and leave the recency list untouched.
    pub fn get(&mut self, fingerprint: &Fingerprint, offset: u64, len: u64) -> DataSet {
        self.stats.gets += 1;
        let segments: Vec<DataSegment> = match self.directory.find(&fingerprint.value) {
            Some(entry) => entry
                .index
                .overlapping(offset, len)
                .map(|(frag_offset, data)| DataSegment {
                    offset: frag_offset,
                    data: data.to_vec(),
                })
                .collect(),
            None => Vec::new(),
        };

        if segments.is_empty() {
            self.stats.misses += 1;
        } else {
            self.stats.hits += 1;
            for seg in &segments {
                self.recency.promote(&FragmentKey {
                    value: fingerprint.value,
                    offset: seg.offset,
                });
            }
        }

        DataSet::from_sorted(segments)
    }

    /// Inserts previously fetched, non-hit data for `fingerprint`.
    ///
    /// Overlaps with resident fragments are overwritten in place (and
    /// promoted); uncovered spans become new fragments linked at the
    /// most-recently-used end and charged against the budget. Ends by
    /// evicting until the cache is back under budget. Zero-length data is a
    /// no-op.
    pub fn put(&mut self, fingerprint: &Fingerprint, offset: u64, data: &[u8]) -> CacheResult<()> {
        if data.is_empty() {
            tracing::debug!(offset, "ignoring zero-length put");
            return Ok(());
        }
        let value = fingerprint.value;
        let index = self.directory.find_or_create(fingerprint);
        let report = index.insert_range(offset, data)?;

        for &(frag_offset, _) in &report.created {
            self.recency.put(
                FragmentKey {
                    value,
                    offset: frag_offset,
                },
                (),
            );
        }
        for &frag_offset in &report.updated {
            self.recency.promote(&FragmentKey {
                value,
                offset: frag_offset,
            });
        }

        self.resident_bytes += report.new_bytes;
        self.stats.puts += 1;
        self.stats.inserted_bytes += report.new_bytes;
        self.stats.overwritten_bytes += report.overwritten_bytes;

        self.evict_to_budget();
        Ok(())
    }

    /// Evicts least-recently-used fragments until the resident byte count is
    /// under budget or nothing is left to evict.
    fn evict_to_budget(&mut self) {
        while self.resident_bytes >= self.budget_bytes {
            let Some((key, _)) = self.recency.pop_lru() else {
                // List drained before the budget was satisfied; stop rather
                // than spin.
                break;
            };
            let mut emptied = false;
            if let Some(entry) = self.directory.find_mut(&key.value) {
                if let Some(buf) = entry.index.remove(key.offset) {
                    self.resident_bytes = self.resident_bytes.saturating_sub(buf.len() as u64);
                    self.stats.evictions += 1;
                    tracing::debug!(offset = key.offset, len = buf.len(), "evicted fragment");
                }
                emptied = entry.index.is_empty();
            }
            if emptied {
                self.directory.take(&key.value);
            }
        }
    }

    /// Bytes currently resident.
    pub fn resident_bytes(&self) -> u64 {
        self.resident_bytes
    }

    /// The configured byte budget.
    pub fn budget_bytes(&self) -> u64 {
        self.budget_bytes
    }

    /// Fingerprints currently resident.
    pub fn object_count(&self) -> usize {
        self.directory.len()
    }

    /// Fragments currently resident.
    pub fn fragment_count(&self) -> usize {
        self.recency.len()
    }

    /// Whether nothing is resident.
    pub fn is_empty(&self) -> bool {
        self.directory.is_empty()
    }

    /// Snapshot of counters with current gauges filled in.
    pub fn stats(&self) -> ReadCacheStats {
        ReadCacheStats {
            resident_bytes: self.resident_bytes,
            fragments: self.recency.len(),
            objects: self.directory.len(),
            ..self.stats.clone()
        }
    }

    /// Drops all resident data and resets counters.
    pub fn clear(&mut self) {
        self.directory.clear();
        self.recency.clear();
        self.resident_bytes = 0;
        self.stats = ReadCacheStats::default();
    }
}
