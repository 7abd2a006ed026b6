#![warn(missing_docs)]

//! cascache: client-side read/write range cache for content-addressed storage.
//!
//! Data is identified by a content [`Fingerprint`] rather than a path. The
//! [`CacheEngine`] fronts two caches: a [`WriteCache`] staging sparse byte
//! ranges until the flush path drains them with `collect`, and a
//! [`ReadCache`] keeping previously fetched ranges under a global byte budget
//! with least-recently-used eviction. Both store per-object ranges in a
//! [`RangeIndex`], whose overlap-aware insert keeps fragments disjoint while
//! overwriting intersecting spans in place.
//!
//! This crate is purely an in-memory staging and caching layer: it neither
//! talks to the backing store nor computes fingerprints.

pub mod config;
pub mod dataset;
pub mod directory;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod range_index;
pub mod read_cache;
pub mod write_cache;

pub use config::{CacheConfig, DEFAULT_READ_BUDGET_BYTES};
pub use dataset::{DataSegment, DataSet, DataSetView, SegmentView};
pub use directory::{Directory, DirectoryEntry, SLOT_COUNT};
pub use engine::CacheEngine;
pub use error::{CacheError, CacheResult};
pub use fingerprint::{Fingerprint, FINGERPRINT_BYTES};
pub use range_index::{InsertReport, RangeIndex};
pub use read_cache::{ReadCache, ReadCacheStats};
pub use write_cache::{WriteCache, WriteCacheStats};
