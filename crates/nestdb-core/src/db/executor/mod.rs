//! Module: db::executor
//! Responsibility: turning physical operator trees into lazy row pipelines.
//! Does not own: planning, storage, or key derivation.
//! Boundary: callers build a `PhysicalOperator`, get a `Cursor` from an
//! `ExecutionContext`, and pull rows; nothing is computed ahead of `next`.

mod context;
mod cursor;
mod explain;
mod operator;
mod ops;
mod trace;

#[cfg(test)]
mod tests;

pub use context::ExecutionContext;
pub use cursor::{Cursor, CursorState};
pub use explain::PlanFingerprint;
pub use operator::PhysicalOperator;
pub use ops::{
    AncestorLookupPlan, CutPlan, ExtractPlan, GroupScanPlan, IndexScanPlan, LimitPlan, ValuesPlan,
};
pub use trace::{ExecutionTraceSink, OperatorKind, TraceEvent};
