//! Statement that routes each query on its key.

pub mod result_set;

pub use result_set::ResultSet;

use crate::connection::Connection;
use crate::driver::Error;
use crate::router::RoutedQuery;
use crate::state::State;

/// Executes queries on the partition their key maps to.
///
/// The result set borrows the statement, so it can't outlive
/// a `close()` or the next `execute()`.
#[derive(Debug)]
pub struct Statement {
    connection: Connection,
    state: State,
    results: Option<ResultSet>,
}

impl Statement {
    pub(crate) fn new(connection: Connection) -> Self {
        Self {
            connection,
            state: State::Idle,
            results: None,
        }
    }

    /// Statement state.
    pub fn state(&self) -> State {
        if self.connection.is_closed() {
            return State::Closed;
        }

        match (self.state, &self.results) {
            (State::Open, Some(results)) if results.exhausted() => State::Exhausted,
            (state, _) => state,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state() == State::Closed
    }

    fn check(&self) -> Result<(), Error> {
        if self.is_closed() {
            Err(Error::StatementClosed)
        } else {
            Ok(())
        }
    }

    /// Find the key in the query and build the request,
    /// without sending it.
    pub fn route(&self, sql: &str) -> Result<RoutedQuery, Error> {
        self.check()?;
        self.connection.router().route(sql)
    }

    /// Run a query and return its rows.
    ///
    /// The previous result set, if any, is released first.
    pub async fn execute(&mut self, sql: &str) -> Result<&mut ResultSet, Error> {
        self.check()?;
        self.results = None;

        let query = match self.connection.router().route(sql) {
            Ok(query) => query,
            Err(err) => {
                self.state = State::Failed;
                return Err(err);
            }
        };

        self.state = State::Executing;

        match self.connection.query(&query).await {
            Ok(result) => {
                self.state = State::Open;
                Ok(self.results.insert(ResultSet::new(result)))
            }

            Err(err) => {
                self.state = if self.connection.is_closed() {
                    State::Closed
                } else {
                    State::Failed
                };
                Err(err)
            }
        }
    }

    /// Result set of the last successful execution.
    pub fn results(&mut self) -> Result<Option<&mut ResultSet>, Error> {
        self.check()?;
        Ok(self.results.as_mut())
    }

    /// Close the statement and release its result set.
    pub fn close(&mut self) {
        self.results = None;
        self.state = State::Closed;
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::client;
    use crate::connection::test::{target, Recorder};

    fn statement(keys: &[&str], service: Arc<Recorder>) -> Statement {
        Connection::new(target(keys), service)
            .unwrap()
            .create_statement()
            .unwrap()
    }

    #[tokio::test]
    async fn test_execute() {
        let service = Arc::new(Recorder::default());
        let mut stmt = statement(&["country_code"], service.clone());
        assert_eq!(stmt.state(), State::Idle);

        let sql = "select * from city where country_code = 'AFG';";
        let rs = stmt.execute(sql).await.unwrap();
        assert_eq!(rs.columns(), &["id".to_string(), "name".to_string()]);
        assert!(rs.next());
        assert_eq!(rs.get_by_name("name"), Some(&json!("Kabul")));
        assert_eq!(stmt.state(), State::Open);

        let rs = stmt.results().unwrap().unwrap();
        assert!(rs.next());
        assert!(!rs.next());
        assert_eq!(stmt.state(), State::Exhausted);

        let queries = service.queries.lock();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].tablespace(), "city_pby_country_code");
        assert_eq!(queries[0].key(), "AFG");
        assert_eq!(queries[0].sql(), sql);
        assert_eq!(queries[0].partition(), None);
    }

    #[tokio::test]
    async fn test_key_priority() {
        let service = Arc::new(Recorder::default());
        let mut stmt = statement(&["a", "b"], service.clone());

        stmt.execute("select * from t where b = 'second'").await.unwrap();
        stmt.execute("select * from t where b = 'second' and a = 'first'")
            .await
            .unwrap();

        let queries = service.queries.lock();
        assert_eq!(queries[0].key(), "second");
        assert_eq!(queries[1].key(), "first");
    }

    #[tokio::test]
    async fn test_key_not_found() {
        let service = Arc::new(Recorder::default());
        let mut stmt = statement(&["country_code"], service.clone());

        let err = stmt
            .execute("select * from city order by id desc")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::KeyNotFoundInQuery(_)));
        assert_eq!(stmt.state(), State::Failed);
        assert!(service.queries.lock().is_empty());
    }

    #[tokio::test]
    async fn test_remote_error() {
        let service = Arc::new(Recorder {
            error: Some(500),
            ..Default::default()
        });
        let mut stmt = statement(&["country_code"], service);

        let err = stmt
            .execute("select * from city where country_code = 'AFG'")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Client(client::Error::RemoteService { status: 500, .. })
        ));
        assert_eq!(stmt.state(), State::Failed);
        assert!(stmt.results().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reexecute_releases_cursor() {
        let mut stmt = statement(&["country_code"], Arc::new(Recorder::default()));

        let rs = stmt
            .execute("select * from city where country_code = 'AFG'")
            .await
            .unwrap();
        assert!(rs.next());

        let _ = stmt.execute("select * from city").await;
        assert!(stmt.results().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_closed() {
        let mut stmt = statement(&["country_code"], Arc::new(Recorder::default()));
        stmt.execute("select * from city where country_code = 'AFG'")
            .await
            .unwrap();

        stmt.close();
        assert_eq!(stmt.state(), State::Closed);
        assert!(matches!(
            stmt.execute("select * from city where country_code = 'AFG'").await,
            Err(Error::StatementClosed)
        ));
        assert!(matches!(stmt.results(), Err(Error::StatementClosed)));
        assert!(matches!(
            stmt.route("select * from city where country_code = 'AFG'"),
            Err(Error::StatementClosed)
        ));

        // Closing the connection closes its statements.
        let mut stmt = statement(&["country_code"], Arc::new(Recorder::default()));
        stmt.connection().close();
        assert!(matches!(
            stmt.execute("select * from city where country_code = 'AFG'").await,
            Err(Error::StatementClosed)
        ));
    }

    #[test]
    fn test_route() {
        let stmt = statement(&["country_code"], Arc::new(Recorder::default()));
        let query = stmt
            .route("select * from city where country_code = \"DEU\"")
            .unwrap();
        assert_eq!(query.key(), "DEU");
        assert_eq!(stmt.state(), State::Idle);
    }
}
