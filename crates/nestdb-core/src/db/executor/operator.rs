use crate::{
    db::{
        executor::{
            ops::{
                AncestorLookupPlan, CutPlan, ExtractPlan, GroupScanPlan, IndexScanPlan, LimitPlan,
                ValuesPlan,
            },
            trace::OperatorKind,
        },
        row::Row,
    },
    model::{IndexId, RowTypeId, RowTypeRef, Schema},
};

///
/// PhysicalOperator
///
/// Closed set of executable operators. Plans are immutable once built and
/// can be executed any number of times; every constructor checks its
/// arguments against the schema the plan will run under.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PhysicalOperator {
    Values(ValuesPlan),
    GroupScan(GroupScanPlan),
    IndexScan(IndexScanPlan),
    Cut(CutPlan),
    Extract(ExtractPlan),
    Limit(LimitPlan),
    AncestorLookup(AncestorLookupPlan),
}

impl PhysicalOperator {
    // ------------------------------------------------------------------
    // Constructors
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn values(rows: Vec<Row>) -> Self {
        Self::Values(ValuesPlan::new(rows))
    }

    /// Scan the groups rooted at `root`, which must be a parentless type.
    #[must_use]
    pub fn group_scan(schema: &Schema, root: RowTypeId) -> Self {
        Self::GroupScan(GroupScanPlan::new(schema, root))
    }

    #[must_use]
    pub fn index_scan(schema: &Schema, index: IndexId) -> Self {
        Self::IndexScan(IndexScanPlan::new(schema, index))
    }

    /// Drop every row whose type lies strictly below `boundary`.
    #[must_use]
    pub fn cut(schema: &Schema, input: Self, boundary: RowTypeId) -> Self {
        Self::Cut(CutPlan::new(schema, input, boundary))
    }

    /// Keep only rows of `types` and their descendants.
    #[must_use]
    pub fn extract(schema: &Schema, input: Self, types: &[RowTypeId]) -> Self {
        Self::Extract(ExtractPlan::new(schema, input, types))
    }

    #[must_use]
    pub fn limit(input: Self, limit: usize) -> Self {
        Self::Limit(LimitPlan::new(input, limit))
    }

    #[must_use]
    pub fn ancestor_lookup(
        schema: &Schema,
        input: Self,
        input_type: RowTypeRef,
        ancestors: &[RowTypeId],
        keep_input: bool,
    ) -> Self {
        Self::AncestorLookup(AncestorLookupPlan::new(
            schema, input, input_type, ancestors, keep_input,
        ))
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn kind(&self) -> OperatorKind {
        match self {
            Self::Values(_) => OperatorKind::Values,
            Self::GroupScan(_) => OperatorKind::GroupScan,
            Self::IndexScan(_) => OperatorKind::IndexScan,
            Self::Cut(_) => OperatorKind::Cut,
            Self::Extract(_) => OperatorKind::Extract,
            Self::Limit(_) => OperatorKind::Limit,
            Self::AncestorLookup(_) => OperatorKind::AncestorLookup,
        }
    }

    /// Direct inputs, left to right.
    #[must_use]
    pub fn input_operators(&self) -> Vec<&Self> {
        match self {
            Self::Values(_) | Self::GroupScan(_) | Self::IndexScan(_) => Vec::new(),
            Self::Cut(plan) => vec![&*plan.input],
            Self::Extract(plan) => vec![&*plan.input],
            Self::Limit(plan) => vec![&*plan.input],
            Self::AncestorLookup(plan) => vec![&*plan.input],
        }
    }
}
