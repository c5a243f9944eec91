//! Leaf cursors over store adapter streams.

use crate::{
    db::{
        executor::context::ExecutionContext,
        row::Row,
        store::{Bindings, RowStreamBox},
    },
    error::InternalError,
    model::{IndexId, RowTypeId, Schema, TableIndex},
};
use std::sync::Arc;

///
/// GroupScanPlan
///
/// Every row of the groups rooted at one root table, in HKey order.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GroupScanPlan {
    root: RowTypeId,
    root_name: String,
}

impl GroupScanPlan {
    pub(crate) fn new(schema: &Schema, root: RowTypeId) -> Self {
        let row_type = schema.row_type(root);
        assert!(
            row_type.parent().is_none(),
            "invariant violation: group scan root {} has a parent",
            row_type.name()
        );

        Self {
            root,
            root_name: row_type.name().to_string(),
        }
    }

    #[must_use]
    pub const fn root(&self) -> RowTypeId {
        self.root
    }

    #[must_use]
    pub fn root_name(&self) -> &str {
        &self.root_name
    }
}

///
/// IndexScanPlan
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexScanPlan {
    index: Arc<TableIndex>,
}

impl IndexScanPlan {
    pub(crate) fn new(schema: &Schema, index: IndexId) -> Self {
        Self {
            index: Arc::clone(schema.index(index)),
        }
    }

    #[must_use]
    pub const fn index(&self) -> &Arc<TableIndex> {
        &self.index
    }
}

enum ScanSource<'c> {
    Group(RowTypeId),
    Index(&'c Arc<TableIndex>),
}

///
/// ScanCursor
///
/// Owns at most one adapter stream; the stream is released exactly once, on
/// close or before a fresh open.
///

pub(crate) struct ScanCursor<'c> {
    source: ScanSource<'c>,
    stream: Option<RowStreamBox<'c>>,
}

impl<'c> ScanCursor<'c> {
    pub(crate) const fn group(plan: &GroupScanPlan) -> Self {
        Self {
            source: ScanSource::Group(plan.root),
            stream: None,
        }
    }

    pub(crate) const fn index(plan: &'c IndexScanPlan) -> Self {
        Self {
            source: ScanSource::Index(&plan.index),
            stream: None,
        }
    }

    pub(crate) fn open(
        &mut self,
        ctx: &ExecutionContext<'c>,
        bindings: &Bindings,
    ) -> Result<(), InternalError> {
        self.close();
        let adapter = ctx.adapter();
        let stream = match self.source {
            ScanSource::Group(root) => adapter.group_scan(ctx.schema().row_type(root), bindings)?,
            ScanSource::Index(index) => adapter.index_scan(index, bindings)?,
        };
        self.stream = Some(stream);

        Ok(())
    }

    pub(crate) fn next(&mut self) -> Result<Option<Row>, InternalError> {
        match self.stream.as_mut() {
            Some(stream) => stream.next_row(),
            None => Ok(None),
        }
    }

    pub(crate) fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.release();
        }
    }
}
