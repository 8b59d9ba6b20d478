//! Query service errors.

use thiserror::Error;

/// Query service error.
#[derive(Debug, Error)]
pub enum Error {
    /// Service couldn't be reached or the exchange failed half way.
    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    /// Service answered with an error.
    #[error("query service error ({status}): {message}")]
    RemoteService { status: u16, message: String },

    /// Service answered with something we can't read.
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

/// Why the exchange with the service failed.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Http(#[from] hyper::Error),

    #[error("{0}")]
    Request(#[from] hyper::http::Error),

    #[error("timed out")]
    Timeout(#[from] tokio::time::error::Elapsed),

    #[error("invalid endpoint \"{0}\"")]
    Endpoint(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Transport(err.into())
    }
}

impl From<hyper::Error> for Error {
    fn from(err: hyper::Error) -> Self {
        Error::Transport(err.into())
    }
}

impl From<hyper::http::Error> for Error {
    fn from(err: hyper::http::Error) -> Self {
        Error::Transport(err.into())
    }
}

impl From<tokio::time::error::Elapsed> for Error {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        Error::Transport(err.into())
    }
}
