use crate::{
    db::{
        hkey::{HKey, HKeyCache},
        row::{RowBase, require_ancestor},
    },
    model::{RowTypeId, Schema},
    value::Value,
};

///
/// TableRow
///
/// Row of one table in the hierarchy. Carries its full HKey.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableRow {
    row_type: RowTypeId,
    hkey: HKey,
    base: RowBase,
}

impl TableRow {
    /// Build a table row whose HKey walks `row_type`'s lineage segment by
    /// segment. Any other shape is a contract violation.
    #[must_use]
    pub fn new(schema: &Schema, row_type: RowTypeId, hkey: HKey, values: Vec<Value>) -> Self {
        let lineage = schema.lineage(row_type);
        let shape_matches = hkey.segment_count() == lineage.len()
            && hkey.segments().iter().zip(&lineage).all(|(segment, table)| {
                segment.table() == *table
                    && segment.values().len() == schema.row_type(*table).key_len()
            });
        assert!(
            shape_matches,
            "invariant violation: hkey {hkey} does not follow the lineage of {}",
            schema.name(row_type)
        );

        Self {
            row_type,
            hkey,
            base: RowBase::new(values),
        }
    }

    #[must_use]
    pub const fn row_type(&self) -> RowTypeId {
        self.row_type
    }

    #[must_use]
    pub const fn hkey(&self) -> &HKey {
        &self.hkey
    }

    #[must_use]
    pub const fn base(&self) -> &RowBase {
        &self.base
    }

    pub(crate) fn ancestor_hkey<'c>(
        &'c self,
        ancestor: RowTypeId,
        schema: &Schema,
        cache: &'c mut HKeyCache,
    ) -> &'c HKey {
        require_ancestor(schema, ancestor, self.row_type);
        if ancestor == self.row_type {
            return &self.hkey;
        }

        let slot = cache.hkey_mut(ancestor);
        self.hkey.copy_to(slot);
        slot.use_segments(schema.row_type(ancestor).hkey_segments());

        slot
    }
}
