//! Query status returned by the query service.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{Error, QueryResult};

/// Body of `/api/query/<tablespace>` responses.
#[derive(Debug, Deserialize, Default)]
pub struct QueryStatus {
    #[serde(default)]
    pub result: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    pub shard: Option<i32>,
    #[serde(default)]
    pub millis: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
}

impl QueryStatus {
    /// Turn into rows and columns, or the error the service reported.
    ///
    /// Columns are taken from the first row, in the order the service
    /// sent them.
    pub fn into_result(self, status: u16) -> Result<QueryResult, Error> {
        if let Some(message) = self.error {
            return Err(Error::RemoteService { status, message });
        }

        let rows = self.result.unwrap_or_default();
        let columns = rows
            .first()
            .map(|row| row.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();

        let rows = rows
            .into_iter()
            .map(|mut row| {
                columns
                    .iter()
                    .map(|column| row.remove(column).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Ok(QueryResult {
            columns,
            rows,
            shard: self.shard,
            millis: self.millis,
        })
    }
}
