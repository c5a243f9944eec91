//! Module: executor::cursor
//! Responsibility: the lifecycle every operator cursor shares.
//! Does not own: per-operator row logic (see `ops`).
//! Boundary: consumers only ever see `Cursor`; operator cursors never check
//! lifecycle state themselves.
//!
//! States:
//! - `Idle`: built, never opened. `next` is a contract violation.
//! - `Open`: rows flow. End of stream closes the cursor before returning `None`.
//! - `Closed`: `next` returns `None` without touching inputs; `open` restarts.
//! - `Failed`: an error escaped `open` or `next`. `close` is safe, `open`
//!   restarts, `next` is a contract violation.
//!
//! Children and leaf streams are released exactly once per open, however
//! many times `close` is called.

use crate::{
    db::{
        executor::{
            context::ExecutionContext,
            operator::PhysicalOperator,
            ops::{
                ancestor_lookup::AncestorLookupCursor, cut::CutCursor, extract::ExtractCursor,
                limit::LimitCursor, scan::ScanCursor, values::ValuesCursor,
            },
            trace::{OperatorKind, TraceEvent},
        },
        row::Row,
        store::Bindings,
    },
    error::InternalError,
};

///
/// CursorState
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CursorState {
    Idle,
    Open,
    Closed,
    Failed,
}

///
/// Execution
///
/// Per-operator runtime state, dispatched by match.
///

enum Execution<'c> {
    Values(ValuesCursor<'c>),
    Scan(ScanCursor<'c>),
    Cut(CutCursor<'c>),
    Extract(ExtractCursor<'c>),
    Limit(LimitCursor<'c>),
    AncestorLookup(AncestorLookupCursor<'c>),
}

impl<'c> Execution<'c> {
    fn build(ctx: &'c ExecutionContext<'c>, plan: &'c PhysicalOperator) -> Self {
        let child = |input: &'c PhysicalOperator| Box::new(Cursor::new(ctx, input));

        match plan {
            PhysicalOperator::Values(plan) => Self::Values(ValuesCursor::new(plan)),
            PhysicalOperator::GroupScan(plan) => Self::Scan(ScanCursor::group(plan)),
            PhysicalOperator::IndexScan(plan) => Self::Scan(ScanCursor::index(plan)),
            PhysicalOperator::Cut(plan) => {
                Self::Cut(CutCursor::new(plan, child(plan.input.as_ref())))
            }
            PhysicalOperator::Extract(plan) => {
                Self::Extract(ExtractCursor::new(plan, child(plan.input.as_ref())))
            }
            PhysicalOperator::Limit(plan) => {
                Self::Limit(LimitCursor::new(plan, child(plan.input.as_ref())))
            }
            PhysicalOperator::AncestorLookup(plan) => {
                Self::AncestorLookup(AncestorLookupCursor::new(plan, child(plan.input.as_ref())))
            }
        }
    }

    // Single input of a unary operator, if any.
    fn input_mut(&mut self) -> Option<&mut Cursor<'c>> {
        match self {
            Self::Values(_) | Self::Scan(_) => None,
            Self::Cut(cursor) => Some(cursor.input.as_mut()),
            Self::Extract(cursor) => Some(cursor.input.as_mut()),
            Self::Limit(cursor) => Some(cursor.input.as_mut()),
            Self::AncestorLookup(cursor) => Some(cursor.input.as_mut()),
        }
    }

    fn open(
        &mut self,
        ctx: &ExecutionContext<'c>,
        bindings: &Bindings,
    ) -> Result<(), InternalError> {
        match self {
            Self::Values(cursor) => cursor.open(),
            Self::Scan(cursor) => cursor.open(ctx, bindings)?,
            Self::Limit(cursor) => cursor.reset(),
            Self::AncestorLookup(cursor) => cursor.clear(),
            Self::Cut(_) | Self::Extract(_) => {}
        }
        if let Some(input) = self.input_mut() {
            input.open(bindings)?;
        }

        Ok(())
    }

    fn next(&mut self, ctx: &ExecutionContext<'c>) -> Result<Option<Row>, InternalError> {
        match self {
            Self::Values(cursor) => Ok(cursor.next()),
            Self::Scan(cursor) => cursor.next(),
            Self::Cut(cursor) => cursor.next(),
            Self::Extract(cursor) => cursor.next(),
            Self::Limit(cursor) => cursor.next(),
            Self::AncestorLookup(cursor) => cursor.next(ctx),
        }
    }

    fn close(&mut self) {
        match self {
            Self::Values(cursor) => cursor.close(),
            Self::Scan(cursor) => cursor.close(),
            Self::AncestorLookup(cursor) => cursor.clear(),
            Self::Cut(_) | Self::Extract(_) | Self::Limit(_) => {}
        }
        if let Some(input) = self.input_mut() {
            input.close();
        }
    }
}

///
/// Cursor
///
/// Pull-based row producer for one operator of a plan.
///

pub struct Cursor<'c> {
    ctx: &'c ExecutionContext<'c>,
    kind: OperatorKind,
    state: CursorState,
    rows: u64,
    execution: Execution<'c>,
}

impl<'c> Cursor<'c> {
    pub(crate) fn new(ctx: &'c ExecutionContext<'c>, plan: &'c PhysicalOperator) -> Self {
        Self {
            ctx,
            kind: plan.kind(),
            state: CursorState::Idle,
            rows: 0,
            execution: Execution::build(ctx, plan),
        }
    }

    #[must_use]
    pub const fn state(&self) -> CursorState {
        self.state
    }

    #[must_use]
    pub const fn kind(&self) -> OperatorKind {
        self.kind
    }

    /// Rows returned since the last open.
    #[must_use]
    pub const fn rows_returned(&self) -> u64 {
        self.rows
    }

    /// Start producing rows; `bindings` reach every child and leaf stream.
    pub fn open(&mut self, bindings: &Bindings) -> Result<(), InternalError> {
        match self.state {
            CursorState::Open => panic!(
                "invariant violation: {} cursor opened while already open",
                self.kind
            ),
            // Leftovers of a failed run are released before starting over.
            CursorState::Failed => self.execution.close(),
            CursorState::Idle | CursorState::Closed => {}
        }

        self.rows = 0;
        match self.execution.open(self.ctx, bindings) {
            Ok(()) => {
                self.state = CursorState::Open;
                self.ctx.trace(TraceEvent::Open {
                    operator: self.kind,
                });
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Next row, or `None` once the stream is exhausted or closed.
    pub fn next(&mut self) -> Result<Option<Row>, InternalError> {
        match self.state {
            CursorState::Open => {}
            CursorState::Closed => return Ok(None),
            CursorState::Idle => panic!(
                "invariant violation: next on a {} cursor that was never opened",
                self.kind
            ),
            CursorState::Failed => panic!(
                "invariant violation: next on a failed {} cursor before reopening",
                self.kind
            ),
        }

        match self.execution.next(self.ctx) {
            Ok(Some(row)) => {
                self.rows += 1;
                Ok(Some(row))
            }
            Ok(None) => {
                self.ctx.trace(TraceEvent::Exhausted {
                    operator: self.kind,
                    rows: self.rows,
                });
                self.close();
                Ok(None)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Release inputs and streams. Safe to call any number of times.
    pub fn close(&mut self) {
        match self.state {
            CursorState::Open | CursorState::Failed => {
                self.execution.close();
                self.state = CursorState::Closed;
                self.ctx.trace(TraceEvent::Close {
                    operator: self.kind,
                    rows: self.rows,
                });
            }
            CursorState::Idle | CursorState::Closed => {}
        }
    }

    fn fail(&mut self, err: InternalError) -> InternalError {
        self.state = CursorState::Failed;
        self.ctx.trace(TraceEvent::error(self.kind, &err));

        err
    }
}

impl Drop for Cursor<'_> {
    fn drop(&mut self) {
        self.close();
    }
}
