//! Driver errors.

use thiserror::Error;

/// Driver error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed connection string")]
    MalformedConnectionString,

    #[error("connection string is not for this driver")]
    SchemeMismatch,

    #[error("no 'key' parameter provided in the connection string; at least one key column is needed to detect the partitioning column of queries")]
    NoKeyProvided,

    #[error("a tablespace must be provided using the 'tablespace' parameter")]
    NoTablespaceProvided,

    #[error("query has no equality predicate on any of the key columns: {0}")]
    KeyNotFoundInQuery(String),

    #[error("statement is closed")]
    StatementClosed,

    #[error("{0} is not supported")]
    Unsupported(&'static str),

    #[error("no suitable driver found for \"{0}\"")]
    NoSuitableDriver(String),

    #[error("{0}")]
    Regex(#[from] regex::Error),

    #[error("{0}")]
    Client(#[from] crate::client::Error),
}

impl Error {
    /// The URL belongs to another driver.
    pub fn scheme_mismatch(&self) -> bool {
        matches!(self, Error::SchemeMismatch)
    }
}
