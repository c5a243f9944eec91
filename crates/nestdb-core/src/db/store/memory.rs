//! Module: db::store::memory
//! Responsibility: a byte-ordered in-memory store of nested rows and index
//! entries, implementing `StoreAdapter`.
//! Does not own: durability or concurrent access.
//!
//! Rows are keyed by their raw HKey, so a forward range walk yields each
//! parent immediately followed by its descendants. Index entries are keyed by
//! the ordered encoding of all their fields.

use crate::{
    db::{
        hkey::{HKey, RawHKey},
        row::{IndexRow, Row, TableRow},
        store::{Bindings, RowStream, RowStreamBox, StoreAdapter, VecRowStream},
    },
    error::{ErrorClass, ErrorOrigin, InternalError},
    model::{IndexId, RowType, TableIndex},
    value::{OrderedValueEncodeError, Value, encode_ordered_value},
};
use std::{
    borrow::Borrow,
    collections::{BTreeMap, btree_map},
    ops::Bound,
    sync::Arc,
};
use thiserror::Error as ThisError;

///
/// MemoryStoreError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum MemoryStoreError {
    #[error("row with hkey {hkey} already exists")]
    DuplicateRow { hkey: String },

    #[error("index '{index}' already holds this entry")]
    DuplicateEntry { index: String },

    #[error("key is not storable: {0}")]
    Key(#[from] OrderedValueEncodeError),
}

impl MemoryStoreError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::DuplicateRow { .. } | Self::DuplicateEntry { .. } => ErrorClass::Unsupported,
            Self::Key(_) => ErrorClass::Corruption,
        }
    }
}

impl From<MemoryStoreError> for InternalError {
    fn from(err: MemoryStoreError) -> Self {
        Self::new(err.class(), ErrorOrigin::Store, err.to_string())
    }
}

///
/// MemoryStore
///

#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: BTreeMap<RawHKey, TableRow>,
    indexes: BTreeMap<IndexId, BTreeMap<Vec<u8>, IndexRow>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored table rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Store one table row under its raw HKey.
    pub fn insert_row(&mut self, row: TableRow) -> Result<(), MemoryStoreError> {
        let raw = row.hkey().to_raw()?;
        match self.rows.entry(raw) {
            btree_map::Entry::Occupied(_) => Err(MemoryStoreError::DuplicateRow {
                hkey: row.hkey().to_string(),
            }),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(row);
                Ok(())
            }
        }
    }

    /// Store one entry of `index`.
    pub fn insert_index_entry(
        &mut self,
        index: &Arc<TableIndex>,
        values: Vec<Value>,
    ) -> Result<(), MemoryStoreError> {
        let key = encode_fields(&values)?;
        let entries = self.indexes.entry(index.id()).or_default();
        if entries.contains_key(&key) {
            return Err(MemoryStoreError::DuplicateEntry {
                index: index.name().to_string(),
            });
        }
        entries.insert(key, IndexRow::new(Arc::clone(index), values));

        Ok(())
    }
}

impl StoreAdapter for MemoryStore {
    // Bindings, when present, pin the leading root key columns.
    fn group_scan(
        &self,
        root: &RowType,
        bindings: &Bindings,
    ) -> Result<RowStreamBox<'_>, InternalError> {
        check_binding_width(root.name(), bindings, root.key_len())?;
        let mut prefix = RawHKey::group_prefix(root.id()).as_bytes().to_vec();
        for value in bindings {
            encode_ordered_value(&mut prefix, value).map_err(MemoryStoreError::from)?;
        }
        let range = self
            .rows
            .range::<[u8], _>((Bound::Included(prefix.as_slice()), Bound::Unbounded));

        Ok(Box::new(PrefixStream::new(range, prefix, |row: &TableRow| {
            Row::Table(row.clone())
        })))
    }

    // Bindings, when present, pin the leading index fields.
    fn index_scan(
        &self,
        index: &Arc<TableIndex>,
        bindings: &Bindings,
    ) -> Result<RowStreamBox<'_>, InternalError> {
        check_binding_width(index.name(), bindings, index.field_count())?;
        let Some(entries) = self.indexes.get(&index.id()) else {
            return Ok(Box::new(VecRowStream::new(Vec::new())));
        };
        let prefix = encode_fields(bindings)?;
        let range =
            entries.range::<[u8], _>((Bound::Included(prefix.as_slice()), Bound::Unbounded));

        Ok(Box::new(PrefixStream::new(range, prefix, |row: &IndexRow| {
            Row::Index(row.clone())
        })))
    }

    fn lookup(&self, hkey: &HKey) -> Result<Option<Row>, InternalError> {
        let raw = hkey.to_raw().map_err(MemoryStoreError::from)?;

        Ok(self.rows.get(&raw).cloned().map(Row::Table))
    }
}

// Extra bindings would be encoded where the next segment's table id sits.
fn check_binding_width(
    target: &str,
    bindings: &Bindings,
    width: usize,
) -> Result<(), InternalError> {
    if bindings.len() > width {
        return Err(InternalError::store_unsupported(format!(
            "scan of {target} binds {} values but its key has {width}",
            bindings.len()
        )));
    }

    Ok(())
}

fn encode_fields(values: &[Value]) -> Result<Vec<u8>, MemoryStoreError> {
    let mut out = Vec::new();
    for value in values {
        encode_ordered_value(&mut out, value)?;
    }

    Ok(out)
}

///
/// PrefixStream
///
/// Forward walk over one BTreeMap range that stops at the first key outside
/// `prefix`.
///

struct PrefixStream<'a, K, V, F> {
    range: Option<btree_map::Range<'a, K, V>>,
    prefix: Vec<u8>,
    to_row: F,
}

impl<'a, K, V, F> PrefixStream<'a, K, V, F> {
    const fn new(range: btree_map::Range<'a, K, V>, prefix: Vec<u8>, to_row: F) -> Self {
        Self {
            range: Some(range),
            prefix,
            to_row,
        }
    }
}

impl<K, V, F> RowStream for PrefixStream<'_, K, V, F>
where
    K: Borrow<[u8]>,
    F: Fn(&V) -> Row,
{
    fn next_row(&mut self) -> Result<Option<Row>, InternalError> {
        let Some(range) = self.range.as_mut() else {
            return Ok(None);
        };
        if let Some((key, value)) = range.next() {
            let key: &[u8] = key.borrow();
            if key.starts_with(&self.prefix) {
                return Ok(Some((self.to_row)(value)));
            }
        }
        self.range = None;

        Ok(None)
    }

    fn release(&mut self) {
        self.range = None;
    }
}
