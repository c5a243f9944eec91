use crate::{
    db::{
        hkey::HKey,
        row::Row,
        store::{Bindings, MemoryStore, RowStream, RowStreamBox, StoreAdapter},
    },
    error::InternalError,
    model::{RowType, TableIndex},
};
use std::{cell::Cell, rc::Rc, sync::Arc};

///
/// Probe
///
/// Shared counters observing how the executor drives leaf streams.
///

#[derive(Clone, Debug, Default)]
pub(crate) struct Probe {
    pub(crate) opens: Rc<Cell<usize>>,
    pub(crate) pulls: Rc<Cell<usize>>,
    pub(crate) releases: Rc<Cell<usize>>,
    pub(crate) bindings: Rc<Cell<usize>>,
}

impl Probe {
    pub(crate) fn opens(&self) -> usize {
        self.opens.get()
    }

    pub(crate) fn pulls(&self) -> usize {
        self.pulls.get()
    }

    pub(crate) fn releases(&self) -> usize {
        self.releases.get()
    }

    /// Width of the bindings seen by the most recent scan.
    pub(crate) fn bindings_seen(&self) -> usize {
        self.bindings.get()
    }

    fn bump(counter: &Cell<usize>) {
        counter.set(counter.get() + 1);
    }
}

///
/// ScriptedAdapter
///
/// Store adapter whose scans replay a fixed row script regardless of root or
/// index, optionally failing at a given pull. Lookups go to `lookups`.
///

pub(crate) struct ScriptedAdapter {
    script: Vec<Row>,
    fail_at: Option<usize>,
    lookups: MemoryStore,
    probe: Probe,
}

impl ScriptedAdapter {
    pub(crate) fn new(script: Vec<Row>) -> Self {
        Self {
            script,
            fail_at: None,
            lookups: MemoryStore::new(),
            probe: Probe::default(),
        }
    }

    /// Fail the pull with this zero-based position instead of yielding a row.
    pub(crate) fn failing_at(mut self, position: usize) -> Self {
        self.fail_at = Some(position);
        self
    }

    pub(crate) fn with_lookups(mut self, lookups: MemoryStore) -> Self {
        self.lookups = lookups;
        self
    }

    pub(crate) fn probe(&self) -> Probe {
        self.probe.clone()
    }

    fn stream(&self, bindings: &Bindings) -> RowStreamBox<'_> {
        Probe::bump(&self.probe.opens);
        self.probe.bindings.set(bindings.len());

        Box::new(ScriptedStream {
            rows: self.script.iter(),
            position: 0,
            fail_at: self.fail_at,
            probe: self.probe.clone(),
            released: false,
        })
    }
}

impl StoreAdapter for ScriptedAdapter {
    fn group_scan(
        &self,
        _root: &RowType,
        bindings: &Bindings,
    ) -> Result<RowStreamBox<'_>, InternalError> {
        Ok(self.stream(bindings))
    }

    fn index_scan(
        &self,
        _index: &Arc<TableIndex>,
        bindings: &Bindings,
    ) -> Result<RowStreamBox<'_>, InternalError> {
        Ok(self.stream(bindings))
    }

    fn lookup(&self, hkey: &HKey) -> Result<Option<Row>, InternalError> {
        self.lookups.lookup(hkey)
    }
}

struct ScriptedStream<'a> {
    rows: std::slice::Iter<'a, Row>,
    position: usize,
    fail_at: Option<usize>,
    probe: Probe,
    released: bool,
}

impl RowStream for ScriptedStream<'_> {
    fn next_row(&mut self) -> Result<Option<Row>, InternalError> {
        assert!(!self.released, "stream polled after release");
        Probe::bump(&self.probe.pulls);

        let position = self.position;
        self.position += 1;
        if self.fail_at == Some(position) {
            return Err(InternalError::store_internal(format!(
                "scripted failure at pull {position}"
            )));
        }

        Ok(self.rows.next().cloned())
    }

    fn release(&mut self) {
        assert!(!self.released, "stream released twice");
        self.released = true;
        Probe::bump(&self.probe.releases);
    }
}
