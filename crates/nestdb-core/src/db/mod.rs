//! Execution-side runtime: hierarchical keys, rows, the store boundary, and
//! the cursor pipeline built on top of them.

pub mod executor;
pub mod hkey;
pub mod row;
pub mod store;
