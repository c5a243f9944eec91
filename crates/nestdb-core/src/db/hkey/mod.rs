//! Module: db::hkey
//! Responsibility: hierarchical keys and their order-preserving byte form.
//! Does not own: deciding which HKey a row has (rows and indexes do that).
//! Boundary: HKeys are reusable scratch values; truncation and copies reuse
//! existing allocations instead of building fresh keys per row.
//!
//! Invariants:
//! - Segment `i` of a row's HKey belongs to the row type at depth `i` of that
//!   row's lineage.
//! - The first `depth(A) + 1` segments of a row's HKey are exactly the HKey
//!   of the row's ancestor of type `A`.
//! - Raw encodings preserve that prefix relation byte for byte.

mod cache;


use crate::{
    model::RowTypeId,
    value::{OrderedValueEncodeError, Value, encode_ordered_value},
};
use std::{
    borrow::Borrow,
    cmp::Ordering,
    fmt::{self, Display},
};

pub use cache::HKeyCache;

///
/// HKeySegment
///
/// One table's key columns inside an HKey.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct HKeySegment {
    table: RowTypeId,
    values: Vec<Value>,
}

impl HKeySegment {
    #[must_use]
    pub const fn new(table: RowTypeId, values: Vec<Value>) -> Self {
        Self { table, values }
    }

    #[must_use]
    pub const fn table(&self) -> RowTypeId {
        self.table
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    // Overwrite this segment in place, keeping the value buffer.
    fn assign(&mut self, table: RowTypeId, values: impl IntoIterator<Item = Value>) {
        self.table = table;
        self.values.clear();
        self.values.extend(values);
    }
}

///
/// HKey
///
/// Ordered sequence of segments. Only the first `len` stored segments are
/// visible; the rest are retained buffers waiting to be reused.
///

#[derive(Clone, Debug, Default)]
pub struct HKey {
    segments: Vec<HKeySegment>,
    len: usize,
}

impl HKey {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
            len: 0,
        }
    }

    /// Empty key with room for `segments` segments.
    #[must_use]
    pub fn with_capacity(segments: usize) -> Self {
        Self {
            segments: Vec::with_capacity(segments),
            len: 0,
        }
    }

    #[must_use]
    pub fn from_segments(segments: Vec<HKeySegment>) -> Self {
        let len = segments.len();

        Self { segments, len }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Number of visible segments.
    #[must_use]
    pub const fn segment_count(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn segments(&self) -> &[HKeySegment] {
        &self.segments[..self.len]
    }

    /// Table owning the deepest visible segment.
    #[must_use]
    pub fn leaf_table(&self) -> Option<RowTypeId> {
        self.segments().last().map(HKeySegment::table)
    }

    /// Whether `self` is `other` or one of its ancestor keys.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.segments().starts_with(self.segments())
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Hide every segment without releasing buffers.
    pub const fn clear(&mut self) {
        self.len = 0;
    }

    /// Append one segment, reusing a retained buffer when one exists.
    pub fn push_segment(&mut self, table: RowTypeId, values: impl IntoIterator<Item = Value>) {
        if let Some(slot) = self.segments.get_mut(self.len) {
            slot.assign(table, values);
        } else {
            self.segments
                .push(HKeySegment::new(table, values.into_iter().collect()));
        }
        self.len += 1;
    }

    /// Truncate to the first `count` segments (an ancestor's key).
    ///
    /// Growing the key this way is a contract violation.
    pub fn use_segments(&mut self, count: usize) {
        assert!(
            count <= self.len,
            "invariant violation: cannot use {count} segments of a {}-segment hkey",
            self.len
        );
        self.len = count;
    }

    /// Copy the visible segments into `other`, reusing its buffers.
    pub fn copy_to(&self, other: &mut Self) {
        other.len = 0;
        for segment in self.segments() {
            if let Some(slot) = other.segments.get_mut(other.len) {
                slot.assign(segment.table, segment.values.iter().cloned());
            } else {
                other.segments.push(segment.clone());
            }
            other.len += 1;
        }
    }

    // ------------------------------------------------------------------
    // Encoding
    // ------------------------------------------------------------------

    /// Encode into the order-preserving byte form used as the store key.
    pub fn to_raw(&self) -> Result<RawHKey, OrderedValueEncodeError> {
        let mut out = Vec::with_capacity(self.len * 16);
        for segment in self.segments() {
            out.extend_from_slice(&segment.table.get().to_be_bytes());
            for value in &segment.values {
                encode_ordered_value(&mut out, value)?;
            }
        }

        Ok(RawHKey(out))
    }
}

impl PartialEq for HKey {
    fn eq(&self, other: &Self) -> bool {
        self.segments() == other.segments()
    }
}

impl Eq for HKey {}

impl PartialOrd for HKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments().cmp(other.segments())
    }
}

impl Display for HKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, segment) in self.segments().iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", segment.table)?;
            for value in &segment.values {
                write!(f, ":{value}")?;
            }
        }
        write!(f, "}}")
    }
}

///
/// RawHKey
///
/// Byte form of an HKey: per segment, the big-endian table id followed by
/// each key value's ordered encoding. Byte order is nested-table order, so a
/// parent sorts immediately before its children.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RawHKey(Vec<u8>);

impl RawHKey {
    /// Shortest key prefix shared by every row of a group rooted at `table`.
    #[must_use]
    pub fn group_prefix(table: RowTypeId) -> Self {
        Self(table.get().to_be_bytes().to_vec())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl Borrow<[u8]> for RawHKey {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}
