//! HTTP client for the query service REST API.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::client::conn::http1;
use hyper::header::{ACCEPT, HOST};
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tokio::spawn;
use tokio::time::timeout;
use tracing::debug;
use url::{Host, Url};

use super::{ClientConfig, Error, QueryResult, QueryService, QueryStatus, TransportError};
use crate::router::RoutedQuery;

/// Talks to a query node over HTTP/1.
///
/// Each query opens its own TCP connection; nothing is pooled.
#[derive(Debug, Clone)]
pub struct SploutClient {
    endpoint: Url,
    config: ClientConfig,
}

impl SploutClient {
    /// Create a client for the query node at `endpoint`, e.g. `http://localhost:4412`.
    pub fn new(endpoint: &str, config: ClientConfig) -> Result<Self, Error> {
        let endpoint = Url::parse(endpoint)
            .map_err(|err| TransportError::Endpoint(format!("{}: {}", endpoint, err)))?;

        Ok(Self { endpoint, config })
    }

    /// Service endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// URL of the query API for this query.
    pub fn url(&self, query: &RoutedQuery) -> Result<Url, Error> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::Endpoint(self.endpoint.to_string()))?
            .pop_if_empty()
            .extend(["api", "query", query.tablespace()]);

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("sql", query.sql());
            pairs.append_pair("key", query.key());
            if let Some(partition) = query.partition() {
                pairs.append_pair("partition", &partition.to_string());
            }
        }

        Ok(url)
    }

    async fn get(&self, url: &Url) -> Result<(u16, Bytes), Error> {
        let (Some(host), Some(authority)) = (url.host(), url.host_str()) else {
            return Err(TransportError::Endpoint(url.to_string()).into());
        };
        let port = url.port_or_known_default().unwrap_or(80);

        // IP literals are connected to directly; only names are resolved.
        // The authority keeps IPv6 brackets, which the resolver won't take.
        let stream = timeout(self.config.connect_timeout(), async {
            match host {
                Host::Domain(domain) => TcpStream::connect((domain, port)).await,
                Host::Ipv4(ip) => TcpStream::connect((ip, port)).await,
                Host::Ipv6(ip) => TcpStream::connect((ip, port)).await,
            }
        })
        .await??;

        let (mut sender, conn) = http1::handshake(TokioIo::new(stream)).await?;

        // Drives the connection until the response is read
        // or the request is dropped.
        spawn(async move {
            if let Err(err) = conn.await {
                debug!("query service connection error: {}", err);
            }
        });

        let path = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        let authority = match url.port() {
            Some(port) => format!("{}:{}", authority, port),
            None => authority.to_string(),
        };

        let request = Request::get(path)
            .header(HOST, authority)
            .header(ACCEPT, "application/json")
            .body(Empty::<Bytes>::new())?;

        let response = sender.send_request(request).await?;
        let status = response.status().as_u16();
        let body = response.into_body().collect().await?.to_bytes();

        Ok((status, body))
    }
}

#[async_trait]
impl QueryService for SploutClient {
    async fn query(&self, query: &RoutedQuery) -> Result<QueryResult, Error> {
        let url = self.url(query)?;

        debug!("GET {}", url);

        let (status, body) = timeout(self.config.query_timeout(), self.get(&url)).await??;

        if !(200..300).contains(&status) {
            return Err(Error::RemoteService {
                status,
                message: String::from_utf8_lossy(&body).trim().to_string(),
            });
        }

        let status_body: QueryStatus = serde_json::from_slice(&body)?;
        status_body.into_result(status)
    }
}
