//! Query service the driver sends routed queries to.

pub mod error;
pub mod http;
pub mod status;

pub use error::{Error, TransportError};
pub use http::SploutClient;
pub use status::QueryStatus;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::router::RoutedQuery;

/// Rows returned by the query service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// Column names, in order.
    pub columns: Vec<String>,
    /// Rows; cells are in column order.
    pub rows: Vec<Vec<Value>>,
    /// Partition that answered the query.
    pub shard: Option<i32>,
    /// Time it took the service to run the query.
    pub millis: Option<i64>,
}

/// Runs a query on a single partition of a tablespace.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Send the query and wait for all of its rows.
    async fn query(&self, query: &RoutedQuery) -> Result<QueryResult, Error>;
}

/// Query service client settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    pub connect_timeout: Duration,
    pub query_timeout: Duration,
}

impl ClientConfig {
    /// How long to wait for the TCP connection.
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// How long to wait for the whole response, connecting included.
    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            query_timeout: Duration::from_secs(60),
        }
    }
}
