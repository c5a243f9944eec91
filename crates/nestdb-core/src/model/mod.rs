//! Runtime data model definitions.
//!
//! Static, per-query metadata: the nested-table row types, their positions in
//! the hierarchy, and the table indexes whose entries can be turned back into
//! hierarchical keys. Everything here is built once by `SchemaBuilder` and is
//! immutable while cursors run.

pub mod index;
pub mod row_type;
pub mod schema;


pub use index::{HKeySegmentSource, IndexId, IndexToHKey, TableIndex};
pub use row_type::{RowType, RowTypeId, RowTypeRef, RowTypeSet};
pub use schema::{Schema, SchemaBuilder, SchemaError};
