//! Property-based tests for cascache using proptest.
//!
//! Random overlapping write/put sequences are replayed against a flat
//! reference buffer to check the invariants unit tests can only sample:
//! fragment disjointness, byte-exact coverage, size accounting, and the
//! read-cache byte budget.

use cascache::{
    CacheConfig, CacheEngine, DataSet, Fingerprint, RangeIndex, ReadCache, WriteCache,
    FINGERPRINT_BYTES,
};
use proptest::prelude::*;

/// Domain for generated writes; small enough that overlaps are common.
const OBJECT_BYTES: usize = 1024;

fn make_fp(seed: u8) -> Fingerprint {
    let mut value = [0u8; FINGERPRINT_BYTES];
    value[0] = seed;
    Fingerprint::new(0, value)
}

/// Generator for one write: an offset and a non-empty payload that stays
/// inside the object domain.
fn any_write() -> impl Strategy<Value = (usize, Vec<u8>)> {
    (0..OBJECT_BYTES - 64).prop_flat_map(|offset| {
        (
            Just(offset),
            proptest::collection::vec(any::<u8>(), 1..64),
        )
    })
}

/// Generator for a sequence of overlapping writes.
fn any_write_sequence() -> impl Strategy<Value = Vec<(usize, Vec<u8>)>> {
    proptest::collection::vec(any_write(), 1..40)
}

/// Applies a write sequence to a flat model buffer, last writer wins.
fn apply_to_model(model: &mut [Option<u8>], writes: &[(usize, Vec<u8>)]) {
    for (offset, data) in writes {
        for (i, &byte) in data.iter().enumerate() {
            model[offset + i] = Some(byte);
        }
    }
}

/// Concatenates a data set's bytes over `[0, OBJECT_BYTES)` into the same
/// shape as the model buffer.
fn materialize(set: &DataSet) -> Vec<Option<u8>> {
    let mut out = vec![None; OBJECT_BYTES];
    for seg in set.iter() {
        for (i, &byte) in seg.data.iter().enumerate() {
            let pos = seg.offset as usize + i;
            assert!(out[pos].is_none(), "fragments overlap at byte {pos}");
            out[pos] = Some(byte);
        }
    }
    out
}

fn assert_disjoint_ascending(index: &RangeIndex) {
    let mut prev_end = None;
    for (offset, data) in index.fragments() {
        if let Some(end) = prev_end {
            assert!(offset >= end, "fragment at {offset} overlaps previous end {end}");
        }
        prev_end = Some(offset + data.len() as u64);
    }
}

proptest! {
    /// After any write sequence, the staged fragments are disjoint and their
    /// union reproduces the reference buffer byte for byte.
    #[test]
    fn write_cache_matches_flat_model(writes in any_write_sequence()) {
        let mut cache = WriteCache::new();
        let fp = make_fp(1);
        let mut model = vec![None; OBJECT_BYTES];

        for (offset, data) in &writes {
            cache.write(&fp, *offset as u64, data).expect("write failed");
        }
        apply_to_model(&mut model, &writes);

        let set = cache.read(&fp, 0, OBJECT_BYTES as u64).to_data_set();
        prop_assert_eq!(materialize(&set), model);
    }

    /// The staged byte gauge equals the number of distinct covered bytes,
    /// regardless of how the writes overlapped.
    #[test]
    fn staged_bytes_counts_covered_bytes_once(writes in any_write_sequence()) {
        let mut cache = WriteCache::new();
        let fp = make_fp(2);
        let mut model = vec![None; OBJECT_BYTES];

        for (offset, data) in &writes {
            cache.write(&fp, *offset as u64, data).expect("write failed");
        }
        apply_to_model(&mut model, &writes);

        let covered = model.iter().filter(|b| b.is_some()).count() as u64;
        prop_assert_eq!(cache.staged_bytes(), covered);
    }

    /// Collect returns everything staged exactly once and leaves the
    /// fingerprint empty.
    #[test]
    fn collect_drains_exactly_once(writes in any_write_sequence()) {
        let mut cache = WriteCache::new();
        let fp = make_fp(3);
        let mut model = vec![None; OBJECT_BYTES];

        for (offset, data) in &writes {
            cache.write(&fp, *offset as u64, data).expect("write failed");
        }
        apply_to_model(&mut model, &writes);

        let set = cache.collect(&fp).expect("nothing collected");
        prop_assert_eq!(materialize(&set), model);
        prop_assert!(cache.collect(&fp).is_none());
        prop_assert_eq!(cache.staged_bytes(), 0);
    }

    /// The range index itself never holds overlapping fragments, whatever
    /// insertion order it sees.
    #[test]
    fn range_index_stays_disjoint(writes in any_write_sequence()) {
        let mut index = RangeIndex::new();
        for (offset, data) in &writes {
            index.insert_range(*offset as u64, data).expect("insert failed");
        }
        assert_disjoint_ascending(&index);

        let resident: u64 = index.fragments().map(|(_, d)| d.len() as u64).sum();
        prop_assert_eq!(index.total_bytes(), resident);
    }

    /// After every put the read cache sits under its byte budget, and its
    /// size counter equals the bytes actually resident.
    #[test]
    fn read_cache_honors_budget(
        writes in any_write_sequence(),
        budget in 16u64..256,
    ) {
        let mut cache = ReadCache::new(CacheConfig { read_budget_bytes: budget });

        for (i, (offset, data)) in writes.iter().enumerate() {
            let fp = make_fp((i % 4) as u8);
            cache.put(&fp, *offset as u64, data).expect("put failed");
            prop_assert!(cache.resident_bytes() < budget || cache.resident_bytes() == 0);
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.resident_bytes, cache.resident_bytes());
        prop_assert_eq!(stats.fragments, cache.fragment_count());
    }

    /// Engine round trip: whatever was staged is what collect hands back.
    #[test]
    fn engine_collect_round_trip(writes in any_write_sequence()) {
        let engine = CacheEngine::default();
        let fp = make_fp(7);
        let mut model = vec![None; OBJECT_BYTES];

        for (offset, data) in &writes {
            engine.write(&fp, *offset as u64, data).expect("write failed");
        }
        apply_to_model(&mut model, &writes);

        let set = engine.collect(&fp).expect("nothing collected");
        prop_assert_eq!(materialize(&set), model);
        prop_assert!(engine.read(&fp, 0, OBJECT_BYTES as u64).is_empty());
    }
}
