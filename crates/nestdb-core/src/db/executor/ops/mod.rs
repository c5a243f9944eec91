//! Per-operator plan descriptions and cursor state.
//!
//! Every cursor here holds operator logic only; lifecycle checks live in
//! `executor::cursor::Cursor`, which wraps each of them.

pub(crate) mod ancestor_lookup;
pub(crate) mod cut;
pub(crate) mod extract;
pub(crate) mod limit;
pub(crate) mod scan;
pub(crate) mod values;

pub use ancestor_lookup::AncestorLookupPlan;
pub use cut::CutPlan;
pub use extract::ExtractPlan;
pub use limit::LimitPlan;
pub use scan::{GroupScanPlan, IndexScanPlan};
pub use values::ValuesPlan;
