//! Module: model::schema
//! Responsibility: the per-query set of row types and their hierarchy.
//! Does not own: table column metadata or value types.
//! Boundary: built once per query compilation; read-only afterwards.
//!
//! Invariants:
//! - A parent is declared before any of its children, so the hierarchy is
//!   acyclic by construction.
//! - `depth(child) = depth(parent) + 1`; parentless types have depth 0.
//! - Pre-order numbers and subtree lengths make `ancestor_of` a single
//!   range comparison.

use crate::{
    config::SchemaConfig,
    error::{ErrorClass, ErrorOrigin, InternalError},
    model::{
        index::{IndexId, IndexToHKey, TableIndex},
        row_type::{RowType, RowTypeId, RowTypeSet},
    },
};
use std::{collections::BTreeMap, sync::Arc};
use thiserror::Error as ThisError;

///
/// SchemaError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum SchemaError {
    #[error("row type '{name}' is declared twice")]
    DuplicateRowType { name: String },

    #[error("parent {parent} of row type '{name}' is not declared")]
    UnknownParent { name: String, parent: RowTypeId },

    #[error("row type '{name}' has depth {depth} (max {max})")]
    DepthExceeded { name: String, depth: u32, max: u32 },

    #[error("schema exceeds {max} row types")]
    TooManyRowTypes { max: u32 },

    #[error("row type '{name}' declares no key columns")]
    EmptyKey { name: String },

    #[error("index '{name}' is declared twice")]
    DuplicateIndex { name: String },

    #[error("index '{index}' targets undeclared table {table}")]
    UnknownTable { index: String, table: RowTypeId },

    #[error("index '{index}' maps {found} hkey segments, table needs {expected}")]
    IndexSegmentCount {
        index: String,
        expected: usize,
        found: usize,
    },

    #[error("index '{index}' segment {position} names {found}, expected '{expected}'")]
    IndexSegmentTable {
        index: String,
        position: usize,
        expected: String,
        found: RowTypeId,
    },

    #[error("index '{index}' supplies {found} key columns for '{table}', expected {expected}")]
    IndexSegmentKeyLen {
        index: String,
        table: String,
        expected: usize,
        found: usize,
    },

    #[error("index '{index}' references field {field} but entries have {field_count} fields")]
    IndexFieldOutOfRange {
        index: String,
        field: usize,
        field_count: usize,
    },
}

impl From<SchemaError> for InternalError {
    fn from(err: SchemaError) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Schema, err.to_string())
    }
}

///
/// Schema
///

#[derive(Clone, Debug)]
pub struct Schema {
    row_types: Vec<RowType>,
    by_name: BTreeMap<String, RowTypeId>,
    indexes: Vec<Arc<TableIndex>>,
}

impl Schema {
    // ------------------------------------------------------------------
    // Row types
    // ------------------------------------------------------------------

    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Number of table row types.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.row_types.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.row_types.is_empty()
    }

    /// All table row types in declaration (id) order.
    pub fn row_types(&self) -> impl Iterator<Item = &RowType> {
        self.row_types.iter()
    }

    /// Whether `id` falls inside this schema's id range.
    ///
    /// Ids are dense positions handed out by the builder and carry no schema
    /// identity: an id issued by another schema is only caught when it lies
    /// past the end of this one.
    #[must_use]
    pub fn contains(&self, id: RowTypeId) -> bool {
        id.slot() < self.row_types.len()
    }

    /// Resolve one row type; an id past the end is a contract violation.
    #[must_use]
    pub fn row_type(&self, id: RowTypeId) -> &RowType {
        self.row_types.get(id.slot()).unwrap_or_else(|| {
            panic!("invariant violation: row type {id} is not part of this schema")
        })
    }

    #[must_use]
    pub fn row_type_by_name(&self, name: &str) -> Option<&RowType> {
        self.by_name.get(name).map(|id| self.row_type(*id))
    }

    #[must_use]
    pub fn depth(&self, id: RowTypeId) -> u32 {
        self.row_type(id).depth
    }

    #[must_use]
    pub fn name(&self, id: RowTypeId) -> &str {
        &self.row_type(id).name
    }

    // ------------------------------------------------------------------
    // Hierarchy
    // ------------------------------------------------------------------

    /// Whether `ancestor` is `descendant` or one of its ancestors.
    #[must_use]
    pub fn ancestor_of(&self, ancestor: RowTypeId, descendant: RowTypeId) -> bool {
        self.row_type(ancestor)
            .ancestor_of(self.row_type(descendant))
    }

    /// Whether `ancestor` is a proper ancestor of `descendant`.
    #[must_use]
    pub fn is_strict_ancestor(&self, ancestor: RowTypeId, descendant: RowTypeId) -> bool {
        ancestor != descendant && self.ancestor_of(ancestor, descendant)
    }

    /// Parent-pointer walk equivalent of `ancestor_of`, O(depth).
    #[must_use]
    pub fn ancestor_of_by_walk(&self, ancestor: RowTypeId, descendant: RowTypeId) -> bool {
        let mut current = Some(descendant);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.row_type(id).parent;
        }

        false
    }

    /// Ancestry of `id` from the root down to `id` itself.
    #[must_use]
    pub fn lineage(&self, id: RowTypeId) -> Vec<RowTypeId> {
        let mut lineage = Vec::with_capacity(self.row_type(id).hkey_segments());
        let mut current = Some(id);
        while let Some(next) = current {
            lineage.push(next);
            current = self.row_type(next).parent;
        }
        lineage.reverse();

        lineage
    }

    /// Every proper descendant of `id`.
    #[must_use]
    pub fn strict_descendants(&self, id: RowTypeId) -> RowTypeSet {
        let mut set = RowTypeSet::with_capacity(self.len());
        for row_type in self.row_types() {
            if self.is_strict_ancestor(id, row_type.id) {
                set.insert(row_type.id);
            }
        }

        set
    }

    // ------------------------------------------------------------------
    // Indexes
    // ------------------------------------------------------------------

    pub fn indexes(&self) -> impl Iterator<Item = &Arc<TableIndex>> {
        self.indexes.iter()
    }

    /// Resolve one index; an id past the end is a contract violation.
    #[must_use]
    pub fn index(&self, id: IndexId) -> &Arc<TableIndex> {
        self.indexes.get(id.get() as usize).unwrap_or_else(|| {
            panic!("invariant violation: index {id} is not part of this schema")
        })
    }

    #[must_use]
    pub fn index_by_name(&self, name: &str) -> Option<&Arc<TableIndex>> {
        self.indexes.iter().find(|index| index.name == name)
    }
}

///
/// SchemaBuilder
///

#[derive(Debug, Default)]
pub struct SchemaBuilder {
    config: SchemaConfig,
    row_types: Vec<RowType>,
    by_name: BTreeMap<String, RowTypeId>,
    indexes: Vec<Arc<TableIndex>>,
}

impl SchemaBuilder {
    #[must_use]
    pub fn with_config(config: SchemaConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Declare one table. `parent` must already be declared.
    pub fn table(
        &mut self,
        name: impl Into<String>,
        parent: Option<RowTypeId>,
        key_len: usize,
    ) -> Result<RowTypeId, SchemaError> {
        let name = name.into();

        // Phase 1: validate name, parent, and limits.
        if self.by_name.contains_key(&name) {
            return Err(SchemaError::DuplicateRowType { name });
        }
        if key_len == 0 {
            return Err(SchemaError::EmptyKey { name });
        }
        let depth = match parent {
            None => 0,
            Some(parent) => match self.row_types.get(parent.slot()) {
                Some(parent) => parent.depth + 1,
                None => return Err(SchemaError::UnknownParent { name, parent }),
            },
        };
        if depth >= self.config.max_depth {
            return Err(SchemaError::DepthExceeded {
                name,
                depth,
                max: self.config.max_depth,
            });
        }
        let raw_id = u32::try_from(self.row_types.len())
            .ok()
            .filter(|raw| *raw < self.config.max_row_types)
            .ok_or(SchemaError::TooManyRowTypes {
                max: self.config.max_row_types,
            })?;

        // Phase 2: register; pre-order placement is assigned in `build`.
        let id = RowTypeId::new(raw_id);
        self.by_name.insert(name.clone(), id);
        self.row_types.push(RowType {
            id,
            name,
            parent,
            depth,
            key_len,
            preorder: 0,
            subtree_len: 1,
        });

        Ok(id)
    }

    /// Register one table index whose entries are `field_count` values wide.
    pub fn index(
        &mut self,
        name: impl Into<String>,
        table: RowTypeId,
        field_count: usize,
        index_to_hkey: IndexToHKey,
    ) -> Result<IndexId, SchemaError> {
        let name = name.into();
        if self.indexes.iter().any(|index| index.name == name) {
            return Err(SchemaError::DuplicateIndex { name });
        }
        if table.slot() >= self.row_types.len() {
            return Err(SchemaError::UnknownTable { index: name, table });
        }

        self.validate_index_to_hkey(&name, table, field_count, &index_to_hkey)?;

        let id = IndexId::new(u32::try_from(self.indexes.len()).unwrap_or(u32::MAX));
        self.indexes.push(Arc::new(TableIndex {
            id,
            name,
            table,
            field_count,
            index_to_hkey,
        }));

        Ok(id)
    }

    /// Freeze the hierarchy and assign pre-order placement.
    #[must_use]
    pub fn build(mut self) -> Schema {
        self.assign_preorder();

        Schema {
            row_types: self.row_types,
            by_name: self.by_name,
            indexes: self.indexes,
        }
    }

    // Walk the declared forest depth-first, roots and siblings in id order.
    fn assign_preorder(&mut self) {
        let mut children: Vec<Vec<RowTypeId>> = vec![Vec::new(); self.row_types.len()];
        let mut roots = Vec::new();
        for row_type in &self.row_types {
            match row_type.parent {
                Some(parent) => children[parent.slot()].push(row_type.id),
                None => roots.push(row_type.id),
            }
        }

        let mut next_preorder = 0u32;
        let mut stack: Vec<(RowTypeId, bool)> =
            roots.iter().rev().map(|root| (*root, false)).collect();

        while let Some((id, finished)) = stack.pop() {
            if finished {
                let row_type = &mut self.row_types[id.slot()];
                row_type.subtree_len = next_preorder - row_type.preorder;
                continue;
            }

            self.row_types[id.slot()].preorder = next_preorder;
            next_preorder += 1;

            stack.push((id, true));
            for child in children[id.slot()].iter().rev() {
                stack.push((*child, false));
            }
        }
    }

    fn validate_index_to_hkey(
        &self,
        name: &str,
        table: RowTypeId,
        field_count: usize,
        index_to_hkey: &IndexToHKey,
    ) -> Result<(), SchemaError> {
        // Root-to-leaf lineage of the indexed table.
        let mut lineage = Vec::new();
        let mut current = Some(table);
        while let Some(id) = current {
            lineage.push(id);
            current = self.row_types[id.slot()].parent;
        }
        lineage.reverse();

        if index_to_hkey.len() != lineage.len() {
            return Err(SchemaError::IndexSegmentCount {
                index: name.to_string(),
                expected: lineage.len(),
                found: index_to_hkey.len(),
            });
        }

        for (position, (source, expected)) in
            index_to_hkey.segments().iter().zip(&lineage).enumerate()
        {
            let expected = &self.row_types[expected.slot()];
            if source.table != expected.id {
                return Err(SchemaError::IndexSegmentTable {
                    index: name.to_string(),
                    position,
                    expected: expected.name.clone(),
                    found: source.table,
                });
            }
            if source.fields.len() != expected.key_len {
                return Err(SchemaError::IndexSegmentKeyLen {
                    index: name.to_string(),
                    table: expected.name.clone(),
                    expected: expected.key_len,
                    found: source.fields.len(),
                });
            }
            if let Some(field) = source.fields.iter().find(|field| **field >= field_count) {
                return Err(SchemaError::IndexFieldOutOfRange {
                    index: name.to_string(),
                    field: *field,
                    field_count,
                });
            }
        }

        Ok(())
    }
}
