//! Splout SQL driver.
//!
//! Connects to a Splout SQL query service with a connection string like
//!
//! ```text
//! jdbc:splout://localhost:4412?key='country_code'&tablespace='city_pby_country_code'
//! ```
//!
//! and sends every query to the partition holding the key it filters on,
//! e.g. `select * from city where country_code = 'AFG'` goes to the
//! partition of `AFG`.

pub mod cli;
pub mod client;
pub mod config;
pub mod connection;
pub mod driver;
pub mod router;
pub mod state;
pub mod statement;

pub use client::{ClientConfig, QueryResult, QueryService, SploutClient};
pub use connection::Connection;
pub use driver::{ConnectionTarget, Driver, Drivers, Error, Properties, SploutDriver};
pub use router::RoutedQuery;
pub use statement::{ResultSet, Statement};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use std::io::IsTerminal;

/// Setup the logger, so `info!`, `debug!`
/// and other macros actually output something.
///
/// Using try_init and ignoring errors to allow
/// for use in tests (setting up multiple times).
pub fn logger() {
    let format = fmt::layer()
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .with_file(false);
    #[cfg(not(debug_assertions))]
    let format = format.with_target(false);

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let _ = tracing_subscriber::registry()
        .with(format)
        .with(filter)
        .try_init();
}
