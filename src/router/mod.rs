//! Query router.

pub mod key;

pub use key::{KeyMatch, KeyScanner, Scan};

use std::time::Instant;

use tracing::debug;

use crate::driver::{ConnectionTarget, Error};

/// Query routed to one partition of a tablespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedQuery {
    tablespace: String,
    key: String,
    sql: String,
    partition: Option<i32>,
}

impl RoutedQuery {
    /// Route a query on a key found in it.
    ///
    /// There is nothing to route on if the key is empty.
    pub fn new(tablespace: &str, key: KeyMatch, sql: &str) -> Option<Self> {
        if key.value.is_empty() {
            return None;
        }

        Some(Self {
            tablespace: tablespace.to_string(),
            key: key.value,
            sql: sql.to_string(),
            partition: None,
        })
    }

    pub fn tablespace(&self) -> &str {
        &self.tablespace
    }

    /// Partitioning key value.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Ask the service to use this partition instead of
    /// the one the key maps to.
    pub fn partition(&self) -> Option<i32> {
        self.partition
    }
}

/// Routes queries using the key columns of a connection.
#[derive(Debug, Clone)]
pub struct Router {
    tablespace: String,
    scanner: KeyScanner,
}

impl Router {
    /// Create new router.
    pub fn new(target: &ConnectionTarget) -> Result<Self, Error> {
        Ok(Self {
            tablespace: target.tablespace.clone(),
            scanner: KeyScanner::new(&target.keys)?,
        })
    }

    /// Route a query to the partition holding its key.
    pub fn route(&self, sql: &str) -> Result<RoutedQuery, Error> {
        let now = Instant::now();

        let not_found =
            || Error::KeyNotFoundInQuery(self.scanner.keys().collect::<Vec<_>>().join(", "));

        match self.scanner.scan(sql) {
            Scan::Matched(key) => {
                debug!(
                    "routing on {} = \"{}\" [{}, {:.3}ms]",
                    key.column,
                    key.value,
                    self.tablespace,
                    now.elapsed().as_secs_f64() * 1000.0,
                );

                RoutedQuery::new(&self.tablespace, key, sql).ok_or_else(not_found)
            }

            Scan::NotFound => Err(not_found()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn router(keys: &[&str]) -> Router {
        Router::new(&ConnectionTarget {
            endpoint: "http://localhost:4412".into(),
            tablespace: "city_pby_country_code".into(),
            keys: keys.iter().map(|k| k.to_string()).collect(),
        })
        .unwrap()
    }

    #[test]
    fn test_route() {
        let sql = "select * from city where country_code = 'AFG';";
        let query = router(&["country_code"]).route(sql).unwrap();
        assert_eq!(query.tablespace(), "city_pby_country_code");
        assert_eq!(query.key(), "AFG");
        assert_eq!(query.sql(), sql);
        assert_eq!(query.partition(), None);
    }

    #[test]
    fn test_empty_key() {
        let key = KeyMatch {
            column: "a".into(),
            value: "".into(),
            span: 0..0,
        };
        assert!(RoutedQuery::new("t", key.clone(), "select 1").is_none());

        let key = KeyMatch {
            value: "1".into(),
            ..key
        };
        let query = RoutedQuery::new("t", key, "select 1").unwrap();
        assert_eq!(query.key(), "1");
    }

    #[test]
    fn test_no_key() {
        let err = router(&["a", "b"])
            .route("select * from city order by id desc")
            .unwrap_err();
        assert!(matches!(err, Error::KeyNotFoundInQuery(ref keys) if keys == "a, b"));
    }
}
