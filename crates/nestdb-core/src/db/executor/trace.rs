//! Executor tracing boundary.
//!
//! Tracing is optional, injected by the caller, and must not affect execution
//! semantics.

use crate::{
    db::executor::explain::PlanFingerprint,
    error::{ErrorClass, ErrorOrigin, InternalError},
};
use std::fmt::{self, Display};

///
/// ExecutionTraceSink
///

pub trait ExecutionTraceSink {
    fn on_event(&self, event: TraceEvent);
}

///
/// OperatorKind
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum OperatorKind {
    Values,
    GroupScan,
    IndexScan,
    Cut,
    Extract,
    Limit,
    AncestorLookup,
}

impl OperatorKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Values => "Values",
            Self::GroupScan => "GroupScan",
            Self::IndexScan => "IndexScan",
            Self::Cut => "Cut",
            Self::Extract => "Extract",
            Self::Limit => "Limit",
            Self::AncestorLookup => "AncestorLookup",
        }
    }

    pub(crate) const fn tag(self) -> u8 {
        match self {
            Self::Values => 0x01,
            Self::GroupScan => 0x02,
            Self::IndexScan => 0x03,
            Self::Cut => 0x04,
            Self::Extract => 0x05,
            Self::Limit => 0x06,
            Self::AncestorLookup => 0x07,
        }
    }
}

impl Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

///
/// TraceEvent
///
/// `rows` counts rows the cursor handed to its consumer since its last open.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TraceEvent {
    Open {
        operator: OperatorKind,
    },
    Exhausted {
        operator: OperatorKind,
        rows: u64,
    },
    Close {
        operator: OperatorKind,
        rows: u64,
    },
    Error {
        operator: OperatorKind,
        class: ErrorClass,
        origin: ErrorOrigin,
    },
    PlanStart {
        fingerprint: PlanFingerprint,
    },
    PlanFinish {
        fingerprint: PlanFingerprint,
        rows: u64,
    },
}

impl TraceEvent {
    pub(crate) const fn error(operator: OperatorKind, err: &InternalError) -> Self {
        Self::Error {
            operator,
            class: err.class,
            origin: err.origin,
        }
    }
}

///
/// PlanTrace
///
/// Start/finish bracket around one whole-plan execution.
///

pub(crate) struct PlanTrace<'a> {
    sink: &'a dyn ExecutionTraceSink,
    fingerprint: PlanFingerprint,
}

impl<'a> PlanTrace<'a> {
    pub(crate) fn start(
        sink: Option<&'a dyn ExecutionTraceSink>,
        fingerprint: impl FnOnce() -> PlanFingerprint,
    ) -> Option<Self> {
        let sink = sink?;
        let fingerprint = fingerprint();
        sink.on_event(TraceEvent::PlanStart { fingerprint });

        Some(Self { sink, fingerprint })
    }

    pub(crate) fn finish(self, rows: u64) {
        self.sink.on_event(TraceEvent::PlanFinish {
            fingerprint: self.fingerprint,
            rows,
        });
    }
}
