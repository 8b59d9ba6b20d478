//! Drivers available to the application.

use std::sync::Arc;

use tracing::debug;

use super::{Driver, Error, Properties};
use crate::connection::Connection;

/// Set of drivers, tried in the order they were registered.
#[derive(Clone, Default)]
pub struct Drivers {
    drivers: Vec<Arc<dyn Driver>>,
}

impl std::fmt::Debug for Drivers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.drivers.iter().map(|driver| driver.name()))
            .finish()
    }
}

impl Drivers {
    /// No drivers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a driver.
    pub fn register(&mut self, driver: impl Driver + 'static) -> &mut Self {
        self.drivers.push(Arc::new(driver));
        self
    }

    /// Remove a driver by name.
    pub fn deregister(&mut self, name: &str) {
        self.drivers.retain(|driver| driver.name() != name);
    }

    /// All registered drivers.
    pub fn all(&self) -> &[Arc<dyn Driver>] {
        &self.drivers
    }

    /// First driver that accepts this URL.
    pub fn driver(&self, url: &str) -> Result<Arc<dyn Driver>, Error> {
        self.drivers
            .iter()
            .find(|driver| driver.accepts_url(url))
            .cloned()
            .ok_or_else(|| Error::NoSuitableDriver(url.to_string()))
    }

    /// Connect using the first driver that claims the URL.
    ///
    /// Drivers that don't recognize the URL are skipped. A driver that
    /// does but fails to connect stops the search.
    pub fn connect(&self, url: &str, properties: &Properties) -> Result<Connection, Error> {
        for driver in &self.drivers {
            if let Some(connection) = driver.connect(url, properties)? {
                debug!("\"{}\" driver connected", driver.name());
                return Ok(connection);
            }
        }

        Err(Error::NoSuitableDriver(url.to_string()))
    }
}
