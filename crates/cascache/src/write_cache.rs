//! Write-staging cache: holds dirty ranges per fingerprint until the flush
//! path collects them for the backing store. No eviction; staged data lives
//! exactly until the owning fingerprint is drained.

use serde::{Deserialize, Serialize};

use crate::dataset::{DataSegment, DataSet, DataSetView, SegmentView};
use crate::directory::Directory;
use crate::error::CacheResult;
use crate::fingerprint::Fingerprint;

/// Counters and gauges for a [`WriteCache`].
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct WriteCacheStats {
    /// Number of `write` calls that staged data.
    pub writes: u64,
    /// Number of `read` calls.
    pub reads: u64,
    /// Number of `collect` calls that drained an object.
    pub collects: u64,
    /// Bytes currently staged across all fingerprints.
    pub staged_bytes: u64,
    /// Fingerprints currently holding staged data.
    pub objects: usize,
    /// Fragments currently staged across all fingerprints.
    pub fragments: usize,
}

/// Staging cache for writes awaiting flush.
#[derive(Debug, Default)]
pub struct WriteCache {
    directory: Directory,
    staged_bytes: u64,
    stats: WriteCacheStats,
}

impl WriteCache {
    /// Creates an empty write cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages `data` at `offset` for `fingerprint`.
    ///
    /// The bytes are copied in; the caller's buffer stays caller-owned.
    /// Overlaps with previously staged ranges are overwritten in place.
    /// Zero-length data is a no-op.
    pub fn write(&mut self, fingerprint: &Fingerprint, offset: u64, data: &[u8]) -> CacheResult<()> {
        if data.is_empty() {
            tracing::debug!(offset, "ignoring zero-length write");
            return Ok(());
        }
        let index = self.directory.find_or_create(fingerprint);
        let report = index.insert_range(offset, data)?;
        self.staged_bytes += report.new_bytes;
        self.stats.writes += 1;
        tracing::debug!(
            offset,
            len = data.len(),
            new_bytes = report.new_bytes,
            overwritten_bytes = report.overwritten_bytes,
            "staged write"
        );
        Ok(())
    }

    /// Returns borrowed views of the staged fragments intersecting
    /// `[offset, offset + len)`, ascending by offset.
    ///
    /// Whole fragments are returned; the scan stops at the first fragment
    /// past the queried range. Unknown fingerprints yield an empty view.
    pub fn read(&mut self, fingerprint: &Fingerprint, offset: u64, len: u64) -> DataSetView<'_> {
        self.stats.reads += 1;
        match self.directory.find(&fingerprint.value) {
            Some(entry) => DataSetView::from_sorted(
                entry
                    .index
                    .overlapping(offset, len)
                    .map(|(frag_offset, data)| SegmentView {
                        offset: frag_offset,
                        data,
                    })
                    .collect(),
            ),
            None => DataSetView::default(),
        }
    }

    /// Drains every staged fragment for `fingerprint`, transferring buffer
    /// ownership into the returned set and removing the directory entry.
    ///
    /// Returns `None` when nothing is staged for the fingerprint. Intended
    /// caller: the flush/close path feeding the backing store.
    pub fn collect(&mut self, fingerprint: &Fingerprint) -> Option<DataSet> {
        let entry = self.directory.take(&fingerprint.value)?;
        self.stats.collects += 1;
        self.staged_bytes = self.staged_bytes.saturating_sub(entry.index.total_bytes());
        let set = DataSet::from_sorted(
            entry
                .index
                .into_iter()
                .map(|(offset, data)| DataSegment { offset, data })
                .collect(),
        );
        tracing::debug!(
            segments = set.len(),
            bytes = set.total_len(),
            "collected staged writes"
        );
        Some(set)
    }

    /// Bytes currently staged across all fingerprints.
    pub fn staged_bytes(&self) -> u64 {
        self.staged_bytes
    }

    /// Fingerprints currently holding staged data.
    pub fn object_count(&self) -> usize {
        self.directory.len()
    }

    /// Whether nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.directory.is_empty()
    }

    /// Snapshot of counters with current gauges filled in.
    pub fn stats(&self) -> WriteCacheStats {
        WriteCacheStats {
            staged_bytes: self.staged_bytes,
            objects: self.directory.len(),
            fragments: self.directory.entries().map(|e| e.index.len()).sum(),
            ..self.stats.clone()
        }
    }

    /// Drops all staged data and resets counters.
    pub fn clear(&mut self) {
        self.directory.clear();
        self.staged_bytes = 0;
        self.stats = WriteCacheStats::default();
    }
}
