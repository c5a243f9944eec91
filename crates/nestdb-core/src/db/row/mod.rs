//! Module: db::row
//! Responsibility: rows flowing between cursors and the HKeys they expose.
//! Does not own: storage layout or column typing.
//! Boundary: a row is either a table row (it owns its HKey) or an index row
//! (it rebuilds HKeys from its entry fields on demand, into the session cache).

mod index;
mod table;


use crate::{
    db::hkey::{HKey, HKeyCache},
    model::{RowTypeId, RowTypeRef, Schema},
    value::Value,
};
use std::fmt::{self, Display};

pub use index::IndexRow;
pub use table::TableRow;

///
/// RowBase
///
/// Column values shared by both row variants.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RowBase {
    values: Vec<Value>,
}

impl RowBase {
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub fn value(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }
}

///
/// Row
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Row {
    Table(TableRow),
    Index(IndexRow),
}

impl Row {
    /// Runtime type tag used by type-filtering operators.
    #[must_use]
    pub fn kind(&self) -> RowTypeRef {
        match self {
            Self::Table(row) => RowTypeRef::Table(row.row_type()),
            Self::Index(row) => RowTypeRef::Index(row.index().id()),
        }
    }

    /// Table row type, or `None` for index rows.
    #[must_use]
    pub fn table_type(&self) -> Option<RowTypeId> {
        self.kind().table()
    }

    #[must_use]
    pub const fn base(&self) -> &RowBase {
        match self {
            Self::Table(row) => row.base(),
            Self::Index(row) => row.base(),
        }
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        self.base().values()
    }

    #[must_use]
    pub const fn as_table(&self) -> Option<&TableRow> {
        match self {
            Self::Table(row) => Some(row),
            Self::Index(_) => None,
        }
    }

    #[must_use]
    pub const fn as_index(&self) -> Option<&IndexRow> {
        match self {
            Self::Table(_) => None,
            Self::Index(row) => Some(row),
        }
    }

    /// HKey of this row's ancestor of type `ancestor` (the row's own HKey when
    /// `ancestor` is the row's table).
    ///
    /// The returned key may live in `cache` and is only valid until the next
    /// derivation for the same type. A non-ancestor is a contract violation.
    pub fn ancestor_hkey<'c>(
        &'c self,
        ancestor: RowTypeId,
        schema: &Schema,
        cache: &'c mut HKeyCache,
    ) -> &'c HKey {
        match self {
            Self::Table(row) => row.ancestor_hkey(ancestor, schema, cache),
            Self::Index(row) => row.ancestor_hkey(ancestor, schema, cache),
        }
    }
}

impl From<TableRow> for Row {
    fn from(row: TableRow) -> Self {
        Self::Table(row)
    }
}

impl From<IndexRow> for Row {
    fn from(row: IndexRow) -> Self {
        Self::Index(row)
    }
}

impl Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(row) => write!(f, "{}{}", row.row_type(), row.hkey()),
            Self::Index(row) => {
                write!(f, "{}(", row.index())?;
                for (i, value) in row.base().values().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, ")")
            }
        }
    }
}

// Shared contract check for both row variants.
fn require_ancestor(schema: &Schema, ancestor: RowTypeId, leaf: RowTypeId) {
    assert!(
        schema.ancestor_of(ancestor, leaf),
        "invariant violation: {} is not an ancestor of {}",
        schema.name(ancestor),
        schema.name(leaf)
    );
}
