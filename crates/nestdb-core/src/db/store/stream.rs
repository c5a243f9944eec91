use crate::{
    db::{row::Row, store::RowStream},
    error::InternalError,
};

///
/// VecRowStream
///
/// Exposes one materialized row vector through the `RowStream` interface.
///

#[derive(Debug)]
pub struct VecRowStream {
    rows: std::vec::IntoIter<Row>,
}

impl VecRowStream {
    #[must_use]
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: rows.into_iter(),
        }
    }
}

impl RowStream for VecRowStream {
    fn next_row(&mut self) -> Result<Option<Row>, InternalError> {
        Ok(self.rows.next())
    }

    fn release(&mut self) {
        // Drop whatever was not pulled.
        self.rows = Vec::new().into_iter();
    }
}
