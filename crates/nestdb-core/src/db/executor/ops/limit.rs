use crate::{
    db::{
        executor::{cursor::Cursor, operator::PhysicalOperator},
        row::Row,
    },
    error::InternalError,
};

///
/// LimitPlan
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LimitPlan {
    pub(crate) input: Box<PhysicalOperator>,
    limit: usize,
}

impl LimitPlan {
    pub(crate) fn new(input: PhysicalOperator, limit: usize) -> Self {
        Self {
            input: Box::new(input),
            limit,
        }
    }

    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }
}

///
/// LimitCursor
///
/// Once the budget is spent it never polls its input again; the wrapper's
/// auto-close then releases the input early.
///

pub(crate) struct LimitCursor<'c> {
    limit: usize,
    remaining: usize,
    pub(crate) input: Box<Cursor<'c>>,
}

impl<'c> LimitCursor<'c> {
    pub(crate) const fn new(plan: &LimitPlan, input: Box<Cursor<'c>>) -> Self {
        Self {
            limit: plan.limit,
            remaining: 0,
            input,
        }
    }

    pub(crate) const fn reset(&mut self) {
        self.remaining = self.limit;
    }

    pub(crate) fn next(&mut self) -> Result<Option<Row>, InternalError> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let row = self.input.next()?;
        if row.is_some() {
            self.remaining -= 1;
        }

        Ok(row)
    }
}
