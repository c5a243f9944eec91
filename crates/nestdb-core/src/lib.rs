//! Core runtime for nestdb: the row-type hierarchy, hierarchical keys, and
//! the pull-based cursor pipeline that streams nested-table rows.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Domain vocabulary plus the handful of types needed to run a plan.
/// No errors, stores, or trace plumbing are re-exported here.
///

pub mod prelude {
    pub use crate::{
        db::{
            executor::{Cursor, ExecutionContext, PhysicalOperator},
            hkey::HKey,
            row::Row,
            store::Bindings,
        },
        model::{RowTypeId, RowTypeRef, Schema},
        value::Value,
    };
}
