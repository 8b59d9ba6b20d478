//! Forward-only cursor over the rows of a query.

use std::vec::IntoIter;

use serde_json::Value;

use crate::client::QueryResult;

/// Rows returned by a statement, one at a time.
#[derive(Debug)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: IntoIter<Vec<Value>>,
    row: Option<Vec<Value>>,
    exhausted: bool,
    shard: Option<i32>,
    millis: Option<i64>,
}

impl ResultSet {
    pub(crate) fn new(result: QueryResult) -> Self {
        let QueryResult {
            columns,
            rows,
            shard,
            millis,
        } = result;

        Self {
            columns,
            rows: rows.into_iter(),
            row: None,
            exhausted: false,
            shard,
            millis,
        }
    }

    /// Move to the next row. Returns `false` once there are no more rows.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        self.row = self.rows.next();
        self.exhausted = self.row.is_none();
        !self.exhausted
    }

    /// Cursor moved past the last row.
    pub fn exhausted(&self) -> bool {
        self.exhausted
    }

    /// Column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Zero-based position of a column, names compared case-insensitively.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }

    /// Current row, if the cursor is on one.
    pub fn row(&self) -> Option<&[Value]> {
        self.row.as_deref()
    }

    /// Value at zero-based `index` in the current row.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.row.as_ref().and_then(|row| row.get(index))
    }

    /// Value of the named column in the current row.
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.column(name).and_then(|index| self.get(index))
    }

    /// Partition that answered the query.
    pub fn shard(&self) -> Option<i32> {
        self.shard
    }

    /// Time the query took on the service.
    pub fn millis(&self) -> Option<i64> {
        self.millis
    }
}
