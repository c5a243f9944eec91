//! Module: executor::ops::ancestor_lookup
//! Responsibility: fetch the stored ancestors of each input row.
//! Does not own: key derivation (rows do that through the session HKey cache).
//!
//! For every input row of the lookup's input type, the requested ancestors
//! are emitted root to leaf (only those that exist), then the input row
//! itself when `keep_input` is set. Rows of any other type pass through.

use crate::{
    db::{
        executor::{context::ExecutionContext, cursor::Cursor, operator::PhysicalOperator},
        row::Row,
    },
    error::InternalError,
    model::{RowTypeId, RowTypeRef, Schema},
};
use std::collections::VecDeque;

///
/// AncestorLookupPlan
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AncestorLookupPlan {
    pub(crate) input: Box<PhysicalOperator>,
    input_type: RowTypeRef,
    input_name: String,
    ancestors: Vec<RowTypeId>,
    ancestor_names: Vec<String>,
    keep_input: bool,
}

impl AncestorLookupPlan {
    pub(crate) fn new(
        schema: &Schema,
        input: PhysicalOperator,
        input_type: RowTypeRef,
        ancestors: &[RowTypeId],
        keep_input: bool,
    ) -> Self {
        assert!(
            !ancestors.is_empty(),
            "invariant violation: ancestor lookup needs at least one ancestor type"
        );

        // Index rows resolve ancestors of the table they index.
        let (leaf, input_name) = match input_type {
            RowTypeRef::Table(id) => (id, schema.name(id).to_string()),
            RowTypeRef::Index(id) => {
                let index = schema.index(id);
                (index.table(), index.name().to_string())
            }
        };
        for ancestor in ancestors {
            assert!(
                schema.ancestor_of(*ancestor, leaf),
                "invariant violation: {} is not an ancestor of {}",
                schema.name(*ancestor),
                schema.name(leaf)
            );
        }

        let mut ancestors = ancestors.to_vec();
        ancestors.sort_by_key(|id| schema.depth(*id));
        ancestors.dedup();

        Self {
            input: Box::new(input),
            input_type,
            input_name,
            ancestor_names: ancestors
                .iter()
                .map(|id| schema.name(*id).to_string())
                .collect(),
            ancestors,
            keep_input,
        }
    }

    #[must_use]
    pub const fn input_type(&self) -> RowTypeRef {
        self.input_type
    }

    #[must_use]
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Requested ancestors, root first.
    #[must_use]
    pub fn ancestors(&self) -> &[RowTypeId] {
        &self.ancestors
    }

    #[must_use]
    pub fn ancestor_names(&self) -> &[String] {
        &self.ancestor_names
    }

    #[must_use]
    pub const fn keep_input(&self) -> bool {
        self.keep_input
    }
}

pub(crate) struct AncestorLookupCursor<'c> {
    plan: &'c AncestorLookupPlan,
    pending: VecDeque<Row>,
    pub(crate) input: Box<Cursor<'c>>,
}

impl<'c> AncestorLookupCursor<'c> {
    pub(crate) const fn new(plan: &'c AncestorLookupPlan, input: Box<Cursor<'c>>) -> Self {
        Self {
            plan,
            pending: VecDeque::new(),
            input,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.pending.clear();
    }

    pub(crate) fn next(
        &mut self,
        ctx: &ExecutionContext<'c>,
    ) -> Result<Option<Row>, InternalError> {
        loop {
            if let Some(row) = self.pending.pop_front() {
                return Ok(Some(row));
            }
            let Some(row) = self.input.next()? else {
                return Ok(None);
            };
            if row.kind() != self.plan.input_type {
                return Ok(Some(row));
            }

            self.lookup_ancestors(ctx, &row)?;
            if self.plan.keep_input {
                self.pending.push_back(row);
            }
        }
    }

    fn lookup_ancestors(
        &mut self,
        ctx: &ExecutionContext<'c>,
        row: &Row,
    ) -> Result<(), InternalError> {
        let schema = ctx.schema();
        let adapter = ctx.adapter();
        let mut hkeys = ctx.hkeys();

        for ancestor in &self.plan.ancestors {
            let hkey = row.ancestor_hkey(*ancestor, schema, &mut hkeys);
            let Some(found) = adapter.lookup(hkey)? else {
                continue;
            };
            if found.table_type() != Some(*ancestor) {
                return Err(InternalError::executor_internal(format!(
                    "lookup of {hkey} returned {found}, expected a {} row",
                    schema.name(*ancestor)
                )));
            }
            self.pending.push_back(found);
        }

        Ok(())
    }
}
