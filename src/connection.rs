//! Connection to a tablespace.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::{pin, select, sync::Notify};
use tracing::debug;

use crate::client::{ClientConfig, QueryResult, QueryService, SploutClient};
use crate::driver::{ConnectionTarget, Error};
use crate::router::{RoutedQuery, Router};
use crate::statement::Statement;

/// Product name reported in connection metadata.
pub const PRODUCT_NAME: &str = "Splout SQL";

/// Fixed facts about the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub product_name: &'static str,
    pub driver_name: &'static str,
    pub driver_version: &'static str,
    pub endpoint: String,
    pub tablespace: String,
}

struct Inner {
    target: ConnectionTarget,
    router: Router,
    service: Arc<dyn QueryService>,
    closed: AtomicBool,
    shutdown: Notify,
}

/// Connection to one tablespace of a query service.
///
/// Cloning is cheap and clones share the same state: closing one
/// closes them all, and every statement created from them.
///
/// Statements are meant to be used by one task at a time.
#[derive(Clone)]
pub struct Connection {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("target", &self.inner.target)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Connection {
    /// Connection sending queries to `service`.
    pub fn new(target: ConnectionTarget, service: Arc<dyn QueryService>) -> Result<Self, Error> {
        let router = Router::new(&target)?;

        Ok(Self {
            inner: Arc::new(Inner {
                target,
                router,
                service,
                closed: AtomicBool::new(false),
                shutdown: Notify::new(),
            }),
        })
    }

    /// Connection to the query service at the target's endpoint.
    pub fn open(target: ConnectionTarget, config: ClientConfig) -> Result<Self, Error> {
        let client = SploutClient::new(&target.endpoint, config)?;
        Self::new(target, Arc::new(client))
    }

    /// Where queries go.
    pub fn target(&self) -> &ConnectionTarget {
        &self.inner.target
    }

    /// Create a statement.
    pub fn create_statement(&self) -> Result<Statement, Error> {
        self.check()?;
        Ok(Statement::new(self.clone()))
    }

    /// Close the connection. Queries in flight are abandoned.
    pub fn close(&self) {
        if !self.inner.closed.swap(true, Ordering::SeqCst) {
            self.inner.shutdown.notify_waiters();
            debug!(
                "connection to {} [{}] closed",
                self.inner.target.endpoint, self.inner.target.tablespace
            );
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    pub(crate) fn check(&self) -> Result<(), Error> {
        if self.is_closed() {
            Err(Error::StatementClosed)
        } else {
            Ok(())
        }
    }

    pub(crate) fn router(&self) -> &Router {
        &self.inner.router
    }

    /// Send the query to the service, unless the connection
    /// gets closed first.
    pub(crate) async fn query(&self, query: &RoutedQuery) -> Result<QueryResult, Error> {
        let shutdown = self.inner.shutdown.notified();
        pin!(shutdown);
        shutdown.as_mut().enable();

        self.check()?;

        select! {
            result = self.inner.service.query(query) => Ok(result?),
            _ = &mut shutdown => Err(Error::StatementClosed),
        }
    }

    /// Every statement commits on its own.
    pub fn auto_commit(&self) -> Result<bool, Error> {
        self.check()?;
        Ok(true)
    }

    /// Only auto-commit is supported.
    pub fn set_auto_commit(&self, auto_commit: bool) -> Result<(), Error> {
        self.check()?;
        if auto_commit {
            Ok(())
        } else {
            Err(Error::Unsupported("disabling auto-commit"))
        }
    }

    pub fn commit(&self) -> Result<(), Error> {
        self.check()?;
        Err(Error::Unsupported("commit"))
    }

    pub fn rollback(&self) -> Result<(), Error> {
        self.check()?;
        Err(Error::Unsupported("rollback"))
    }

    /// Query service is read-only.
    pub fn is_read_only(&self) -> Result<bool, Error> {
        self.check()?;
        Ok(true)
    }

    pub fn metadata(&self) -> Result<Metadata, Error> {
        self.check()?;
        Ok(Metadata {
            product_name: PRODUCT_NAME,
            driver_name: env!("CARGO_PKG_NAME"),
            driver_version: env!("CARGO_PKG_VERSION"),
            endpoint: self.inner.target.endpoint.clone(),
            tablespace: self.inner.target.tablespace.clone(),
        })
    }
}

#[cfg(test)]
pub(crate) mod test {
    use std::future::pending;
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;
    use tokio::{spawn, time::sleep};

    use super::*;
    use crate::client;

    /// Query service that records queries and returns canned rows.
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub(crate) queries: Mutex<Vec<RoutedQuery>>,
        pub(crate) error: Option<u16>,
    }

    #[async_trait]
    impl QueryService for Recorder {
        async fn query(&self, query: &RoutedQuery) -> Result<QueryResult, client::Error> {
            self.queries.lock().push(query.clone());

            if let Some(status) = self.error {
                return Err(client::Error::RemoteService {
                    status,
                    message: "no such table: city".into(),
                });
            }

            Ok(QueryResult {
                columns: vec!["id".into(), "name".into()],
                rows: vec![
                    vec![json!(1), json!("Kabul")],
                    vec![json!(2), json!("Qandahar")],
                ],
                shard: Some(0),
                millis: Some(1),
            })
        }
    }

    /// Query service that never answers.
    struct Hang;

    #[async_trait]
    impl QueryService for Hang {
        async fn query(&self, _: &RoutedQuery) -> Result<QueryResult, client::Error> {
            pending().await
        }
    }

    pub(crate) fn target(keys: &[&str]) -> ConnectionTarget {
        ConnectionTarget {
            endpoint: "http://localhost:4412".into(),
            tablespace: "city_pby_country_code".into(),
            keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn test_close() {
        let conn = Connection::new(target(&["country_code"]), Arc::new(Recorder::default())).unwrap();
        let stmt = conn.create_statement().unwrap();
        let other = conn.clone();

        assert!(!conn.is_closed());
        conn.close();
        conn.close();

        assert!(other.is_closed());
        assert!(matches!(conn.create_statement(), Err(Error::StatementClosed)));
        assert!(matches!(other.metadata(), Err(Error::StatementClosed)));
        assert!(matches!(conn.commit(), Err(Error::StatementClosed)));
        assert_eq!(stmt.state(), crate::state::State::Closed);
    }

    #[test]
    fn test_plumbing() {
        let conn = Connection::new(target(&["country_code"]), Arc::new(Recorder::default())).unwrap();
        assert!(conn.auto_commit().unwrap());
        assert!(conn.set_auto_commit(true).is_ok());
        assert!(matches!(conn.set_auto_commit(false), Err(Error::Unsupported(_))));
        assert!(matches!(conn.rollback(), Err(Error::Unsupported(_))));
        assert!(conn.is_read_only().unwrap());

        let metadata = conn.metadata().unwrap();
        assert_eq!(metadata.product_name, PRODUCT_NAME);
        assert_eq!(metadata.endpoint, "http://localhost:4412");
        assert_eq!(metadata.tablespace, "city_pby_country_code");
    }

    #[tokio::test]
    async fn test_close_aborts_query() {
        let conn = Connection::new(target(&["country_code"]), Arc::new(Hang)).unwrap();
        let mut stmt = conn.create_statement().unwrap();

        let closer = conn.clone();
        let handle = spawn(async move {
            sleep(Duration::from_millis(10)).await;
            closer.close();
        });

        let err = stmt
            .execute("select * from city where country_code = 'AFG'")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::StatementClosed));
        handle.await.unwrap();
    }
}
