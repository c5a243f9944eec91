use crate::model::row_type::RowTypeId;
use std::fmt::{self, Display};

///
/// IndexId
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct IndexId(u32);

impl IndexId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Display for IndexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "idx#{}", self.0)
    }
}

///
/// HKeySegmentSource
///
/// Where one HKey segment's key columns live inside an index entry.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HKeySegmentSource {
    pub table: RowTypeId,
    pub fields: Vec<usize>,
}

impl HKeySegmentSource {
    #[must_use]
    pub const fn new(table: RowTypeId, fields: Vec<usize>) -> Self {
        Self { table, fields }
    }
}

///
/// IndexToHKey
///
/// Root-to-leaf mapping from index-entry fields to the HKey of the indexed
/// table. Validated against the schema when the index is registered.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IndexToHKey {
    segments: Vec<HKeySegmentSource>,
}

impl IndexToHKey {
    #[must_use]
    pub const fn new(segments: Vec<HKeySegmentSource>) -> Self {
        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[HKeySegmentSource] {
        &self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

///
/// TableIndex
///
/// Runtime descriptor for an index over one table. Entries are `field_count`
/// values wide and carry enough key columns to rebuild the indexed row's
/// HKey (and therefore every ancestor's HKey).
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableIndex {
    pub(crate) id: IndexId,
    pub(crate) name: String,
    pub(crate) table: RowTypeId,
    pub(crate) field_count: usize,
    pub(crate) index_to_hkey: IndexToHKey,
}

impl TableIndex {
    #[must_use]
    pub const fn id(&self) -> IndexId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Leafmost (indexed) table.
    #[must_use]
    pub const fn table(&self) -> RowTypeId {
        self.table
    }

    #[must_use]
    pub const fn field_count(&self) -> usize {
        self.field_count
    }

    #[must_use]
    pub const fn index_to_hkey(&self) -> &IndexToHKey {
        &self.index_to_hkey
    }
}

impl Display for TableIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
