//! Query result types: ordered, non-overlapping sequences of data segments.

/// One contiguous owned byte range of a query result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSegment {
    /// Byte offset of this segment within the object.
    pub offset: u64,
    /// The segment's bytes.
    pub data: Vec<u8>,
}

impl DataSegment {
    /// Length of the segment in bytes.
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    /// Whether the segment holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// One past the last byte offset covered by this segment.
    pub fn end(&self) -> u64 {
        self.offset + self.len()
    }
}

/// An owned range-query result: segments sorted ascending by offset,
/// pairwise non-overlapping.
///
/// Returned by [`crate::write_cache::WriteCache::collect`] (buffers moved out
/// of the cache) and [`crate::read_cache::ReadCache::get`] (copies).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSet {
    segments: Vec<DataSegment>,
}

impl DataSet {
    /// Builds a data set from segments already sorted and disjoint.
    pub(crate) fn from_sorted(segments: Vec<DataSegment>) -> Self {
        Self { segments }
    }

    /// The segments, ascending by offset.
    pub fn segments(&self) -> &[DataSegment] {
        &self.segments
    }

    /// Iterates the segments in ascending offset order.
    pub fn iter(&self) -> std::slice::Iter<'_, DataSegment> {
        self.segments.iter()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the result holds no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total bytes across all segments.
    pub fn total_len(&self) -> u64 {
        self.segments.iter().map(DataSegment::len).sum()
    }

    /// Smallest covered offset and one past the largest, if any segments exist.
    pub fn bounds(&self) -> Option<(u64, u64)> {
        let first = self.segments.first()?;
        let last = self.segments.last()?;
        Some((first.offset, last.end()))
    }

    /// Consumes the set, handing the segments to the caller.
    pub fn into_segments(self) -> Vec<DataSegment> {
        self.segments
    }
}

impl IntoIterator for DataSet {
    type Item = DataSegment;
    type IntoIter = std::vec::IntoIter<DataSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

impl<'a> IntoIterator for &'a DataSet {
    type Item = &'a DataSegment;
    type IntoIter = std::slice::Iter<'a, DataSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// A borrowed view of one contiguous byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentView<'a> {
    /// Byte offset of this segment within the object.
    pub offset: u64,
    /// Borrowed segment bytes, owned by the cache.
    pub data: &'a [u8],
}

impl SegmentView<'_> {
    /// Length of the segment in bytes.
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    /// Whether the segment holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// One past the last byte offset covered by this segment.
    pub fn end(&self) -> u64 {
        self.offset + self.len()
    }
}

/// A borrowed range-query result over fragments still resident in a cache.
///
/// Returned by [`crate::write_cache::WriteCache::read`]; valid for the borrow
/// of the cache, which by construction ends before the next mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSetView<'a> {
    segments: Vec<SegmentView<'a>>,
}

impl<'a> DataSetView<'a> {
    pub(crate) fn from_sorted(segments: Vec<SegmentView<'a>>) -> Self {
        Self { segments }
    }

    /// The segments, ascending by offset.
    pub fn segments(&self) -> &[SegmentView<'a>] {
        &self.segments
    }

    /// Iterates the segments in ascending offset order.
    pub fn iter(&self) -> std::slice::Iter<'_, SegmentView<'a>> {
        self.segments.iter()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the result holds no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total bytes across all segments.
    pub fn total_len(&self) -> u64 {
        self.segments.iter().map(SegmentView::len).sum()
    }

    /// Copies the viewed bytes into an owned [`DataSet`].
    pub fn to_data_set(&self) -> DataSet {
        DataSet::from_sorted(
            self.segments
                .iter()
                .map(|s| DataSegment {
                    offset: s.offset,
                    data: s.data.to_vec(),
                })
                .collect(),
        )
    }
}
