//! Configuration.

pub mod error;

pub use error::Error;

use std::fs::read_to_string;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::client::ClientConfig;

/// splout.toml
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// General configuration.
    #[serde(default)]
    pub general: General,
    /// Named connection strings.
    #[serde(default)]
    pub databases: Vec<Database>,
}

impl Config {
    /// Load configuration from disk or use defaults.
    pub fn load(path: &Path) -> Result<Self, Error> {
        match read_to_string(path) {
            Ok(source) => {
                let config = Self::from_str(&source)?;
                info!("loaded \"{}\"", path.display());
                Ok(config)
            }

            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!(
                    "\"{}\" doesn't exist, loading defaults instead",
                    path.display()
                );
                Ok(Config::default())
            }

            Err(err) => Err(err.into()),
        }
    }

    /// Parse configuration from TOML.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(source: &str) -> Result<Self, Error> {
        toml::from_str(source).map_err(|err| Error::config(source, err))
    }

    /// Get a database by name.
    pub fn database(&self, name: &str) -> Result<&Database, Error> {
        self.databases
            .iter()
            .find(|database| database.name == name)
            .ok_or_else(|| Error::NoDatabase(name.to_string()))
    }

    /// Query service client settings.
    pub fn client(&self) -> ClientConfig {
        ClientConfig {
            connect_timeout: self.general.connect_timeout(),
            query_timeout: self.general.query_timeout(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct General {
    /// How long to wait for a connection to the query service, in ms.
    #[serde(default = "General::connect_timeout_default")]
    pub connect_timeout: u64,
    /// How long to wait for a query to return, in ms.
    #[serde(default = "General::query_timeout_default")]
    pub query_timeout: u64,
}

impl Default for General {
    fn default() -> Self {
        Self {
            connect_timeout: Self::connect_timeout_default(),
            query_timeout: Self::query_timeout_default(),
        }
    }
}

impl General {
    fn connect_timeout_default() -> u64 {
        5_000
    }

    fn query_timeout_default() -> u64 {
        60_000
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout)
    }
}

/// Connection string with a name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Database {
    /// Name used on the command line.
    pub name: String,
    /// Connection string, e.g. `jdbc:splout://localhost:4412?key='id'&tablespace='users'`.
    pub url: String,
}
