use crate::{
    db::{
        executor::{cursor::Cursor, operator::PhysicalOperator},
        row::Row,
    },
    error::InternalError,
    model::{RowTypeId, RowTypeSet, Schema},
};

///
/// ExtractPlan
///
/// Keeps table rows of the extract types and their descendants; every other
/// row, index rows included, is dropped.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExtractPlan {
    pub(crate) input: Box<PhysicalOperator>,
    types: Vec<RowTypeId>,
    type_names: Vec<String>,
    keep: RowTypeSet,
}

impl ExtractPlan {
    pub(crate) fn new(schema: &Schema, input: PhysicalOperator, types: &[RowTypeId]) -> Self {
        assert!(
            !types.is_empty(),
            "invariant violation: extract needs at least one row type"
        );

        let mut keep = RowTypeSet::with_capacity(schema.len());
        for extract_type in types {
            keep.insert(*extract_type);
            for descendant in schema.strict_descendants(*extract_type).iter() {
                keep.insert(descendant);
            }
        }

        Self {
            input: Box::new(input),
            types: types.to_vec(),
            type_names: types
                .iter()
                .map(|id| schema.name(*id).to_string())
                .collect(),
            keep,
        }
    }

    #[must_use]
    pub fn types(&self) -> &[RowTypeId] {
        &self.types
    }

    #[must_use]
    pub fn type_names(&self) -> &[String] {
        &self.type_names
    }

    #[must_use]
    pub const fn keep(&self) -> &RowTypeSet {
        &self.keep
    }
}

pub(crate) struct ExtractCursor<'c> {
    keep: &'c RowTypeSet,
    pub(crate) input: Box<Cursor<'c>>,
}

impl<'c> ExtractCursor<'c> {
    pub(crate) const fn new(plan: &'c ExtractPlan, input: Box<Cursor<'c>>) -> Self {
        Self {
            keep: &plan.keep,
            input,
        }
    }

    pub(crate) fn next(&mut self) -> Result<Option<Row>, InternalError> {
        while let Some(row) = self.input.next()? {
            if row
                .table_type()
                .is_some_and(|row_type| self.keep.contains(row_type))
            {
                return Ok(Some(row));
            }
        }

        Ok(None)
    }
}
