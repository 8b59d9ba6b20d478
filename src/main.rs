//! Splout SQL command-line client.

use clap::Parser;
use splout_driver::cli::{self, Cli, Commands};
use splout_driver::config::Config;
use splout_driver::logger;
use tokio::runtime::Builder;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    logger();

    info!("splout-driver {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load(&args.config)?;

    match args.command {
        Commands::Accepts { url } => {
            if !cli::accepts(&config, &url) {
                std::process::exit(1);
            }
        }

        Commands::Route { target, sql } => cli::route(&config, &target, &sql)?,

        Commands::Query { target, sql } => {
            let runtime = Builder::new_current_thread().enable_all().build()?;
            runtime.block_on(async move { cli::query(&config, &target, &sql).await })?;
        }
    }

    Ok(())
}
