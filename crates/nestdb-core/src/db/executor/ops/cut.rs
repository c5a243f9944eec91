//! Module: executor::ops::cut
//! Responsibility: drop every row strictly below a boundary type.
//! Does not own: index rows, which carry no table type and always pass.
//!
//! The reject set is every schema type the boundary is a proper ancestor of,
//! computed once when the plan is built. Each emitted row is either of a
//! type outside that set or not a table row at all.

use crate::{
    db::{
        executor::{cursor::Cursor, operator::PhysicalOperator},
        row::Row,
    },
    error::InternalError,
    model::{RowTypeId, RowTypeSet, Schema},
};

///
/// CutPlan
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CutPlan {
    pub(crate) input: Box<PhysicalOperator>,
    boundary: RowTypeId,
    boundary_name: String,
    reject: RowTypeSet,
}

impl CutPlan {
    pub(crate) fn new(schema: &Schema, input: PhysicalOperator, boundary: RowTypeId) -> Self {
        assert!(
            schema.contains(boundary),
            "invariant violation: cut boundary {boundary} is not part of this schema"
        );

        Self {
            input: Box::new(input),
            boundary,
            boundary_name: schema.name(boundary).to_string(),
            reject: schema.strict_descendants(boundary),
        }
    }

    #[must_use]
    pub const fn boundary(&self) -> RowTypeId {
        self.boundary
    }

    #[must_use]
    pub fn boundary_name(&self) -> &str {
        &self.boundary_name
    }

    /// Types whose rows this cut discards.
    #[must_use]
    pub const fn reject(&self) -> &RowTypeSet {
        &self.reject
    }
}

pub(crate) struct CutCursor<'c> {
    reject: &'c RowTypeSet,
    pub(crate) input: Box<Cursor<'c>>,
}

impl<'c> CutCursor<'c> {
    pub(crate) const fn new(plan: &'c CutPlan, input: Box<Cursor<'c>>) -> Self {
        Self {
            reject: &plan.reject,
            input,
        }
    }

    pub(crate) fn next(&mut self) -> Result<Option<Row>, InternalError> {
        while let Some(row) = self.input.next()? {
            let rejected = row
                .table_type()
                .is_some_and(|row_type| self.reject.contains(row_type));
            if !rejected {
                return Ok(Some(row));
            }
        }

        Ok(None)
    }
}
