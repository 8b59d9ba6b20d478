//! Configuration errors.

use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Deser(#[from] toml::de::Error),

    #[error("{0}, line {1}")]
    MissingField(String, usize),

    #[error("no database named \"{0}\" in the configuration")]
    NoDatabase(String),
}

impl Error {
    /// Point at the line of the config that failed to parse.
    pub fn config(source: &str, err: toml::de::Error) -> Self {
        let message = err.message().to_string();

        match err.span() {
            Some(span) => {
                let end = span.start.min(source.len());
                let line = source
                    .char_indices()
                    .take_while(|(i, _)| *i < end)
                    .filter(|(_, c)| *c == '\n')
                    .count()
                    + 1;
                Self::MissingField(message, line)
            }
            None => Self::MissingField(message, 0),
        }
    }
}
