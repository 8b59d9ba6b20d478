use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use crate::config::Config;
use crate::driver::{Driver, Drivers, Properties, SploutDriver};

/// Query Splout SQL tablespaces, routing each query
/// to the partition of its key.
#[derive(Parser, Debug)]
pub struct Cli {
    /// Path to the configuration file. Default: "splout.toml"
    #[arg(short, long, default_value = "splout.toml")]
    pub config: PathBuf,
    /// Subcommand.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a query and print the rows.
    Query {
        #[command(flatten)]
        target: Target,
        /// SQL query.
        sql: String,
    },

    /// Show where a query would be sent, without running it.
    Route {
        #[command(flatten)]
        target: Target,
        /// SQL query.
        sql: String,
    },

    /// Check whether the driver accepts a connection string.
    Accepts {
        /// Connection string.
        url: String,
    },
}

/// Connection string, given directly or by name.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct Target {
    /// Connection string, e.g. "jdbc:splout://localhost:4412?key='id'&tablespace='users'".
    #[arg(short, long)]
    pub url: Option<String>,
    /// Name of a database in the configuration file.
    #[arg(short, long)]
    pub database: Option<String>,
}

impl Target {
    /// Connection string to use.
    pub fn url(&self, config: &Config) -> Result<String, crate::config::Error> {
        match (&self.url, &self.database) {
            (Some(url), _) => Ok(url.clone()),
            (None, Some(name)) => Ok(config.database(name)?.url.clone()),
            (None, None) => Err(crate::config::Error::NoDatabase(String::new())),
        }
    }
}

fn drivers(config: &Config) -> Drivers {
    let mut drivers = Drivers::new();
    drivers.register(SploutDriver::new(config.client()));
    drivers
}

/// Print a cell the way a SQL client would.
pub fn cell(value: &Value) -> String {
    match value {
        Value::Null => "NULL".into(),
        Value::String(s) => s.clone(),
        value => value.to_string(),
    }
}

/// Run a query and print the rows, tab-separated.
pub async fn query(
    config: &Config,
    target: &Target,
    sql: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = target.url(config)?;
    let conn = drivers(config).connect(&url, &Properties::new())?;
    let mut stmt = conn.create_statement()?;

    let rs = stmt.execute(sql).await?;
    println!("{}", rs.columns().join("\t"));
    let mut rows = 0;
    while rs.next() {
        let row = rs
            .row()
            .map(|row| row.iter().map(cell).collect::<Vec<_>>().join("\t"))
            .unwrap_or_default();
        println!("{}", row);
        rows += 1;
    }

    tracing::info!(
        "{} rows from shard {} [{}ms]",
        rows,
        rs.shard().map(|s| s.to_string()).unwrap_or("?".into()),
        rs.millis().unwrap_or(0)
    );

    stmt.close();
    conn.close();

    Ok(())
}

/// Print where a query would go.
pub fn route(
    config: &Config,
    target: &Target,
    sql: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = target.url(config)?;
    let conn = drivers(config).connect(&url, &Properties::new())?;
    let query = conn.create_statement()?.route(sql)?;

    println!("endpoint: {}", conn.target().endpoint);
    println!("tablespace: {}", query.tablespace());
    println!("key: {}", query.key());

    conn.close();

    Ok(())
}

/// Print whether the connection string is ours.
pub fn accepts(config: &Config, url: &str) -> bool {
    let accepted = SploutDriver::new(config.client()).accepts_url(url);
    println!("{}", accepted);
    accepted
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_cli() {
        let cli = Cli::parse_from([
            "splout",
            "route",
            "--database",
            "cities",
            "select * from city where country_code = 'AFG'",
        ]);
        match cli.command {
            Commands::Route { target, sql } => {
                assert_eq!(target.database.as_deref(), Some("cities"));
                assert!(target.url.is_none());
                assert!(sql.ends_with("'AFG'"));
            }
            other => panic!("{:?}", other),
        }

        assert!(Cli::try_parse_from(["splout", "query", "select 1"]).is_err());
        assert!(Cli::try_parse_from(["splout", "query", "-u", "a", "-d", "b", "select 1"]).is_err());
    }

    #[test]
    fn test_target_url() {
        let config = Config::from_str(
            r#"
[[databases]]
name = "cities"
url = "jdbc:splout://localhost:4412?key='country_code'&tablespace='city_pby_country_code'"
"#,
        )
        .unwrap();

        let target = Target {
            url: None,
            database: Some("cities".into()),
        };
        assert!(target.url(&config).unwrap().contains("city_pby_country_code"));

        let target = Target {
            url: Some("jdbc:splout://h?key='a'&tablespace='t'".into()),
            database: None,
        };
        assert_eq!(
            target.url(&config).unwrap(),
            "jdbc:splout://h?key='a'&tablespace='t'"
        );
    }

    #[test]
    fn test_route() {
        let target = Target {
            url: Some("jdbc:splout://localhost:4412?key='a'&tablespace='t'".into()),
            database: None,
        };
        assert!(route(&Config::default(), &target, "select * from t where a = 1").is_ok());
        assert!(route(&Config::default(), &target, "select * from t").is_err());
    }

    #[test]
    fn test_cell() {
        assert_eq!(cell(&Value::Null), "NULL");
        assert_eq!(cell(&json!("Kabul")), "Kabul");
        assert_eq!(cell(&json!(1780000)), "1780000");
        assert_eq!(cell(&json!(1.5)), "1.5");
    }
}
