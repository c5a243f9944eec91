use crate::model::index::IndexId;
use std::fmt::{self, Display};

///
/// RowTypeId
///
/// Dense table row-type identifier. Ids are assigned in declaration order by
/// `SchemaBuilder` and double as slot indexes into per-type arrays. An id is
/// only meaningful against the schema that issued it.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RowTypeId(u32);

impl RowTypeId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl Display for RowTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

///
/// RowTypeRef
///
/// Runtime type tag of a row: either a table row type from the hierarchy or
/// the row type of a table index. Index row types never take part in
/// ancestor/descendant relationships.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RowTypeRef {
    Table(RowTypeId),
    Index(IndexId),
}

impl RowTypeRef {
    #[must_use]
    pub const fn table(self) -> Option<RowTypeId> {
        match self {
            Self::Table(id) => Some(id),
            Self::Index(_) => None,
        }
    }
}

///
/// RowType
///
/// One table in the nested-table hierarchy. Owned by `Schema`; immutable
/// after construction.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RowType {
    pub(crate) id: RowTypeId,
    pub(crate) name: String,
    pub(crate) parent: Option<RowTypeId>,
    pub(crate) depth: u32,
    pub(crate) key_len: usize,
    pub(crate) preorder: u32,
    pub(crate) subtree_len: u32,
}

impl RowType {
    #[must_use]
    pub const fn id(&self) -> RowTypeId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn parent(&self) -> Option<RowTypeId> {
        self.parent
    }

    /// Hierarchy depth; root tables are 0.
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of key columns this table contributes to its HKey segment.
    #[must_use]
    pub const fn key_len(&self) -> usize {
        self.key_len
    }

    /// Number of HKey segments a row of this type carries.
    #[must_use]
    pub const fn hkey_segments(&self) -> usize {
        self.depth as usize + 1
    }

    /// Non-strict ancestor test as a pre-order range comparison.
    #[must_use]
    pub const fn ancestor_of(&self, other: &Self) -> bool {
        self.preorder <= other.preorder && other.preorder < self.preorder + self.subtree_len
    }
}

impl Display for RowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

///
/// RowTypeSet
///
/// Fixed-membership set of table row types, stored as one flag per schema
/// slot so membership is a single index lookup.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RowTypeSet {
    members: Vec<bool>,
    len: usize,
}

impl RowTypeSet {
    /// Build an empty set sized for `capacity` row-type slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            members: vec![false; capacity],
            len: 0,
        }
    }

    pub fn insert(&mut self, id: RowTypeId) {
        let slot = id.slot();
        if slot >= self.members.len() {
            self.members.resize(slot + 1, false);
        }
        if !self.members[slot] {
            self.members[slot] = true;
            self.len += 1;
        }
    }

    #[must_use]
    pub fn contains(&self, id: RowTypeId) -> bool {
        self.members.get(id.slot()).copied().unwrap_or(false)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Members in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = RowTypeId> + '_ {
        self.members
            .iter()
            .enumerate()
            .filter(|(_, member)| **member)
            .map(|(slot, _)| {
                // Slots come from `RowTypeId::slot`, so they fit in u32.
                RowTypeId::new(u32::try_from(slot).unwrap_or(u32::MAX))
            })
    }
}

impl FromIterator<RowTypeId> for RowTypeSet {
    fn from_iter<I: IntoIterator<Item = RowTypeId>>(iter: I) -> Self {
        let mut set = Self::default();
        for id in iter {
            set.insert(id);
        }
        set
    }
}
