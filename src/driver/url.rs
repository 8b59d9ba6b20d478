//! Parse the connection string and convert it to a connection target.
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::Error;

/// Every connection string starts with this.
pub const PREFIX: &str = "jdbc:";

/// URI scheme handled by this driver.
pub const SCHEME: &str = "splout";

static KEY: Lazy<Regex> = Lazy::new(|| param("key"));
static TABLESPACE: Lazy<Regex> = Lazy::new(|| param("tablespace"));

fn param(name: &str) -> Regex {
    Regex::new(&format!(r#"{}=['"]([^'"]*)['"]"#, name)).unwrap()
}

/// Extract every value of a quoted query parameter, in order.
fn values(query: &str, pattern: &Regex) -> Vec<String> {
    pattern
        .captures_iter(query)
        .filter_map(|cap| cap.get(1))
        .map(|value| value.as_str().to_string())
        .collect()
}

/// Strip the prefix and parse what's left as a URI.
///
/// Returns [`Error::SchemeMismatch`] if the string belongs
/// to some other driver.
fn uri(raw: &str) -> Result<(Url, &str), Error> {
    if raw.len() < PREFIX.len() {
        return Err(Error::MalformedConnectionString);
    }

    let Some(rest) = raw.strip_prefix(PREFIX) else {
        return Err(Error::SchemeMismatch);
    };

    let url = Url::parse(rest).map_err(|_| Error::MalformedConnectionString)?;

    if url.scheme() != SCHEME {
        return Err(Error::SchemeMismatch);
    }

    Ok((url, rest))
}

/// Query component as typed by the user.
///
/// [`Url::query`] percent-encodes double quotes, so the raw text
/// is scanned instead.
fn raw_query(rest: &str) -> Option<&str> {
    let rest = rest.split('#').next().unwrap_or(rest);
    rest.split_once('?').map(|(_, query)| query)
}

/// Does this connection string belong to us?
pub fn accepts(raw: &str) -> bool {
    uri(raw).is_ok()
}

/// Where and what to query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    /// Query service, e.g. `http://localhost:4412`.
    pub endpoint: String,
    /// Partitioned dataset.
    pub tablespace: String,
    /// Candidate partitioning columns, in priority order.
    pub keys: Vec<String>,
}

impl ConnectionTarget {
    /// Parse a connection string, e.g.
    ///
    /// ```text
    /// jdbc:splout://localhost:4412?key='country_code'&tablespace='city_pby_country_code'
    /// ```
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let (url, rest) = uri(raw)?;

        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host,
            _ => return Err(Error::MalformedConnectionString),
        };

        let endpoint = match url.port() {
            Some(port) => format!("http://{}:{}", host, port),
            None => format!("http://{}", host),
        };

        let query = raw_query(rest).ok_or(Error::NoKeyProvided)?;

        let keys = values(query, &KEY);
        if keys.is_empty() {
            return Err(Error::NoKeyProvided);
        }

        // Last one wins.
        let tablespace = values(query, &TABLESPACE)
            .pop()
            .ok_or(Error::NoTablespaceProvided)?;

        Ok(Self {
            endpoint,
            tablespace,
            keys,
        })
    }
}
