//! Driver that hands out connections for `jdbc:splout://` URLs.

pub mod error;
pub mod registry;
pub mod url;

pub use error::Error;
pub use registry::Drivers;
pub use self::url::ConnectionTarget;

use std::collections::HashMap;

use tracing::debug;

use crate::client::ClientConfig;
use crate::connection::Connection;

/// Connection properties passed alongside the URL.
pub type Properties = HashMap<String, String>;

/// Connection property a driver understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInfo {
    pub name: String,
    pub value: Option<String>,
    pub required: bool,
    pub description: String,
    pub choices: Vec<String>,
}

/// A database driver.
pub trait Driver: Send + Sync {
    /// Driver name.
    fn name(&self) -> &'static str;

    /// The driver can open a connection to this URL.
    fn accepts_url(&self, url: &str) -> bool;

    /// Open a connection.
    ///
    /// Returns `Ok(None)` if the URL is meant for another driver.
    fn connect(&self, url: &str, properties: &Properties) -> Result<Option<Connection>, Error>;

    /// Properties the driver needs to connect, besides the URL.
    fn property_info(&self, url: &str, properties: &Properties) -> Vec<PropertyInfo>;

    fn major_version(&self) -> u32;

    fn minor_version(&self) -> u32;

    /// The driver passes the standard compliance tests.
    fn compliant(&self) -> bool;

    /// Name of the logger all the driver's logging goes through.
    fn parent_logger(&self) -> Result<&'static str, Error> {
        Err(Error::Unsupported("parent logger"))
    }
}

/// Splout SQL driver.
#[derive(Debug, Clone, Default)]
pub struct SploutDriver {
    config: ClientConfig,
}

impl SploutDriver {
    /// Create new driver; connections use these client settings.
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

impl Driver for SploutDriver {
    fn name(&self) -> &'static str {
        "splout"
    }

    fn accepts_url(&self, url: &str) -> bool {
        self::url::accepts(url)
    }

    fn connect(&self, url: &str, _properties: &Properties) -> Result<Option<Connection>, Error> {
        let target = match ConnectionTarget::parse(url) {
            Ok(target) => target,
            Err(Error::SchemeMismatch) => return Ok(None),
            Err(err) => return Err(err),
        };

        debug!(
            "connecting to {} [tablespace: {}, keys: {}]",
            target.endpoint,
            target.tablespace,
            target.keys.join(", ")
        );

        Ok(Some(Connection::open(target, self.config)?))
    }

    fn property_info(&self, _url: &str, _properties: &Properties) -> Vec<PropertyInfo> {
        vec![]
    }

    fn major_version(&self) -> u32 {
        1
    }

    fn minor_version(&self) -> u32 {
        0
    }

    fn compliant(&self) -> bool {
        false
    }
}
