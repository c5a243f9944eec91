//! Module: db::store
//! Responsibility: the boundary between cursors and the ordered storage layer.
//! Does not own: transactions, IO, or page formats.
//! Boundary: leaf cursors obtain `RowStream`s from a `StoreAdapter`; every
//! storage failure crosses this boundary as an `InternalError` with
//! `ErrorOrigin::Store` and is propagated unchanged by the executor.

mod memory;
mod stream;


use crate::{
    db::{hkey::HKey, row::Row},
    error::InternalError,
    model::{RowType, TableIndex},
    value::Value,
};
use derive_more::{Deref, IntoIterator};
use std::sync::Arc;

pub use memory::{MemoryStore, MemoryStoreError};
pub use stream::VecRowStream;

///
/// Bindings
///
/// Query parameters forwarded unchanged from a cursor to its children and
/// finally to the leaf streams. The executor never interprets them.
///

#[derive(Clone, Debug, Default, Deref, Eq, IntoIterator, PartialEq)]
#[into_iterator(owned, ref)]
pub struct Bindings(Vec<Value>);

impl Bindings {
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }
}

impl From<Vec<Value>> for Bindings {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

///
/// RowStream
///
/// Pull-based row source handed out by a `StoreAdapter`.
/// `release` is called exactly once by the owning cursor, after which the
/// stream is never polled again.
///

pub trait RowStream {
    fn next_row(&mut self) -> Result<Option<Row>, InternalError>;

    fn release(&mut self) {}
}

pub type RowStreamBox<'a> = Box<dyn RowStream + 'a>;

impl<T> RowStream for Box<T>
where
    T: RowStream + ?Sized,
{
    fn next_row(&mut self) -> Result<Option<Row>, InternalError> {
        self.as_mut().next_row()
    }

    fn release(&mut self) {
        self.as_mut().release();
    }
}

///
/// StoreAdapter
///
/// Storage access used by leaf cursors and ancestor lookups.
///

pub trait StoreAdapter {
    /// Rows of every group rooted at `root`, in HKey (nested) order.
    fn group_scan(
        &self,
        root: &RowType,
        bindings: &Bindings,
    ) -> Result<RowStreamBox<'_>, InternalError>;

    /// Entries of `index`, in index order.
    fn index_scan(
        &self,
        index: &Arc<TableIndex>,
        bindings: &Bindings,
    ) -> Result<RowStreamBox<'_>, InternalError>;

    /// The stored row with exactly this HKey, if any.
    fn lookup(&self, hkey: &HKey) -> Result<Option<Row>, InternalError>;
}
