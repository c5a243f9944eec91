use crate::db::row::Row;

///
/// ValuesPlan
///
/// Literal rows emitted in the given order.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValuesPlan {
    rows: Vec<Row>,
}

impl ValuesPlan {
    pub(crate) const fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

pub(crate) struct ValuesCursor<'c> {
    rows: &'c [Row],
    position: usize,
}

impl<'c> ValuesCursor<'c> {
    pub(crate) fn new(plan: &'c ValuesPlan) -> Self {
        Self {
            rows: &plan.rows,
            position: plan.rows.len(),
        }
    }

    pub(crate) const fn open(&mut self) {
        self.position = 0;
    }

    pub(crate) fn next(&mut self) -> Option<Row> {
        let row = self.rows.get(self.position)?;
        self.position += 1;

        Some(row.clone())
    }

    pub(crate) const fn close(&mut self) {
        self.position = self.rows.len();
    }
}
