use crate::{
    db::{
        hkey::{HKey, HKeyCache},
        row::{RowBase, require_ancestor},
    },
    model::{RowTypeId, Schema, TableIndex},
    value::Value,
};
use std::sync::Arc;

///
/// IndexRow
///
/// One decoded index entry. It has no stored HKey of its own; the indexed
/// row's HKey (and every ancestor's) is rebuilt from the entry fields through
/// the index's `IndexToHKey` mapping.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexRow {
    index: Arc<TableIndex>,
    base: RowBase,
}

impl IndexRow {
    /// Entries must be exactly `index.field_count()` values wide.
    #[must_use]
    pub fn new(index: Arc<TableIndex>, values: Vec<Value>) -> Self {
        assert!(
            values.len() == index.field_count(),
            "invariant violation: index '{}' entry has {} fields, expected {}",
            index.name(),
            values.len(),
            index.field_count()
        );

        Self {
            index,
            base: RowBase::new(values),
        }
    }

    #[must_use]
    pub const fn index(&self) -> &Arc<TableIndex> {
        &self.index
    }

    #[must_use]
    pub const fn base(&self) -> &RowBase {
        &self.base
    }

    /// Leafmost (indexed) table.
    #[must_use]
    pub fn leaf_type(&self) -> RowTypeId {
        self.index.table()
    }

    pub(crate) fn ancestor_hkey<'c>(
        &self,
        ancestor: RowTypeId,
        schema: &Schema,
        cache: &'c mut HKeyCache,
    ) -> &'c HKey {
        let leaf = self.leaf_type();
        require_ancestor(schema, ancestor, leaf);

        // Phase 1: materialize the leafmost HKey in its own slot.
        let slot = cache.hkey_mut(leaf);
        slot.clear();
        let values = self.base.values();
        for source in self.index.index_to_hkey().segments() {
            slot.push_segment(
                source.table,
                source.fields.iter().map(|field| values[*field].clone()),
            );
        }
        if ancestor == leaf {
            return cache.hkey(leaf);
        }

        // Phase 2: copy into the ancestor's slot and drop deeper segments.
        cache.copy_truncated(leaf, ancestor, schema.row_type(ancestor).hkey_segments())
    }
}
