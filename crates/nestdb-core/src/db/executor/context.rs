use crate::{
    config::ExecutionConfig,
    db::{
        executor::{
            cursor::Cursor,
            operator::PhysicalOperator,
            trace::{ExecutionTraceSink, PlanTrace, TraceEvent},
        },
        hkey::HKeyCache,
        row::Row,
        store::{Bindings, StoreAdapter},
    },
    error::InternalError,
    model::Schema,
};
use std::cell::{RefCell, RefMut};

///
/// ExecutionContext
///
/// One execution session: the schema plans were built against, the store
/// adapter leaf cursors read from, and the scratch HKey cache every cursor of
/// the session shares. Single-threaded; the cache is not reentrant.
///

pub struct ExecutionContext<'a> {
    schema: &'a Schema,
    adapter: &'a dyn StoreAdapter,
    hkeys: RefCell<HKeyCache>,
    trace: Option<&'a dyn ExecutionTraceSink>,
    config: ExecutionConfig,
}

impl<'a> ExecutionContext<'a> {
    #[must_use]
    pub fn new(schema: &'a Schema, adapter: &'a dyn StoreAdapter) -> Self {
        Self::with_config(schema, adapter, ExecutionConfig::default())
    }

    #[must_use]
    pub fn with_config(
        schema: &'a Schema,
        adapter: &'a dyn StoreAdapter,
        config: ExecutionConfig,
    ) -> Self {
        Self {
            schema,
            adapter,
            hkeys: RefCell::new(HKeyCache::new(schema.len(), config.hkey_segment_reserve)),
            trace: None,
            config,
        }
    }

    /// Attach a trace sink for every cursor of this session.
    #[must_use]
    pub fn with_trace(mut self, sink: &'a dyn ExecutionTraceSink) -> Self {
        self.trace = Some(sink);
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn schema(&self) -> &'a Schema {
        self.schema
    }

    #[must_use]
    pub fn adapter(&self) -> &'a dyn StoreAdapter {
        self.adapter
    }

    #[must_use]
    pub const fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    // Panics if a derivation is already in progress (the cache is not reentrant).
    pub(crate) fn hkeys(&self) -> RefMut<'_, HKeyCache> {
        self.hkeys.borrow_mut()
    }

    pub(crate) fn trace(&self, event: TraceEvent) {
        if let Some(sink) = self.trace {
            sink.on_event(event);
        }
    }

    // ------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------

    /// Unopened cursor for `plan`.
    #[must_use]
    pub fn cursor<'c>(&'c self, plan: &'c PhysicalOperator) -> Cursor<'c> {
        Cursor::new(self, plan)
    }

    /// Open `plan`, pull every row, and close it.
    pub fn execute(
        &self,
        plan: &PhysicalOperator,
        bindings: &Bindings,
    ) -> Result<Vec<Row>, InternalError> {
        let sink = if self.config.trace_plan {
            self.trace
        } else {
            None
        };
        let trace = PlanTrace::start(sink, || plan.fingerprint());

        // Phase 1: drain; an early error drops the cursor, which closes it.
        let mut cursor = self.cursor(plan);
        cursor.open(bindings)?;
        let mut rows = Vec::new();
        while let Some(row) = cursor.next()? {
            rows.push(row);
        }
        cursor.close();

        // Phase 2: finish the plan trace.
        if let Some(trace) = trace {
            trace.finish(u64::try_from(rows.len()).unwrap_or(u64::MAX));
        }

        Ok(rows)
    }
}
