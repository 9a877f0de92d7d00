//! Query dispatch to the CRS search endpoint.
//!
//! Every outbound query carries a [`RequestSeq`]. The dispatcher only moves
//! bytes; deciding whether a response is still current is the widget's job
//! (see [`crate::widget::PickerWidget::on_response`]).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method, Url};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use projpicker_common::PickerError;
use projpicker_protocol::{decode_results, DecodedResults, ProtocolError, Query};

/// Monotonic tag of an outbound query, in trigger order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestSeq(pub u64);

impl RequestSeq {
    pub fn next(self) -> Self {
        RequestSeq(self.0 + 1)
    }
}

/// A query waiting to be sent, with its sequence tag.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingQuery {
    pub seq: RequestSeq,
    pub query: Query,
}

/// A transport-level request.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub path: String,
    pub content_type: &'static str,
    pub body: Option<Vec<u8>>,
}

impl QueryRequest {
    /// `POST` when there is a body, `GET` otherwise.
    pub fn method(&self) -> Method {
        if self.body.is_some() {
            Method::POST
        } else {
            Method::GET
        }
    }
}

/// Raw response as seen by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Request/response transport to the search server.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: QueryRequest) -> Result<TransportResponse, DispatchError>;
}

/// Errors from a single dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid endpoint URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl From<DispatchError> for PickerError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Protocol(ProtocolError::Encode(message)) => {
                PickerError::TransportFailure(format!("could not encode query: {}", message))
            }
            DispatchError::Protocol(protocol) => protocol.into(),
            other => PickerError::TransportFailure(other.to_string()),
        }
    }
}

/// HTTP transport built on `reqwest`.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport for the server at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        // Query paths resolve under the base path, with or without a leading slash.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| DispatchError::InvalidUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(path = %request.path))]
    async fn send(&self, request: QueryRequest) -> Result<TransportResponse, DispatchError> {
        let url = self
            .base_url
            .join(request.path.trim_start_matches('/'))
            .map_err(|e| DispatchError::InvalidUrl {
                url: format!("{}{}", self.base_url, request.path),
                message: e.to_string(),
            })?;

        let method = request.method();
        let mut builder = self.client.request(method.clone(), url.clone());
        if let Some(body) = request.body {
            builder = builder
                .header(header::CONTENT_TYPE, request.content_type)
                .body(body);
        }

        debug!(%method, %url, "Sending query");
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(TransportResponse { status, body })
    }
}

/// Sends queries over a transport and decodes the results.
///
/// There is no retry: the next user action issues a fresh query.
pub struct QueryDispatcher<T: Transport> {
    transport: T,
    query_path: String,
}

impl<T: Transport> QueryDispatcher<T> {
    pub fn new(transport: T, query_path: impl Into<String>) -> Self {
        Self {
            transport,
            query_path: query_path.into(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send one query and decode its response.
    #[instrument(skip(self, pending), fields(seq = pending.seq.0, mode = %pending.query.mode()))]
    pub async fn dispatch(&self, pending: &PendingQuery) -> Result<DecodedResults, DispatchError> {
        let request = QueryRequest {
            path: self.query_path.clone(),
            content_type: pending.query.content_type(),
            body: Some(pending.query.to_body()?),
        };

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            let body = String::from_utf8_lossy(&response.body).into_owned();
            warn!(status = response.status, "Search endpoint returned an error status");
            return Err(DispatchError::Status {
                status: response.status,
                body,
            });
        }

        let results = decode_results(&response.body)?;
        debug!(count = results.len(), shape = ?results.shape, "Decoded query results");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projpicker_protocol::{serialize, FeatureCollection, LogicalOperator, SerializationMode};
    use std::sync::Mutex;

    /// Answers every request with a fixed response and records what it got.
    struct CannedTransport {
        response: TransportResponse,
        seen: Mutex<Vec<QueryRequest>>,
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn send(&self, request: QueryRequest) -> Result<TransportResponse, DispatchError> {
            self.seen.lock().unwrap().push(request);
            Ok(self.response.clone())
        }
    }

    fn canned(status: u16, body: &str) -> QueryDispatcher<CannedTransport> {
        QueryDispatcher::new(
            CannedTransport {
                response: TransportResponse {
                    status,
                    body: body.as_bytes().to_vec(),
                },
                seen: Mutex::new(Vec::new()),
            },
            "/query",
        )
    }

    fn pending(mode: SerializationMode) -> PendingQuery {
        PendingQuery {
            seq: RequestSeq(1),
            query: serialize(&FeatureCollection::new(), LogicalOperator::Or, mode),
        }
    }

    #[test]
    fn test_request_method() {
        let mut request = QueryRequest {
            path: "/query".into(),
            content_type: "text/plain",
            body: Some(b"or\n".to_vec()),
        };
        assert_eq!(request.method(), Method::POST);
        request.body = None;
        assert_eq!(request.method(), Method::GET);
    }

    #[test]
    fn test_http_transport_normalises_base_url() {
        let transport =
            HttpTransport::new("http://localhost:8000/projpicker", Duration::from_secs(5)).unwrap();
        assert_eq!(transport.base_url().as_str(), "http://localhost:8000/projpicker/");
        assert!(format!("{:?}", transport).contains("localhost:8000"));
    }

    #[test]
    fn test_dispatch_sends_line_protocol_body() {
        let dispatcher = canned(200, "{}");
        let results =
            tokio_test::block_on(dispatcher.dispatch(&pending(SerializationMode::LineProtocol)))
                .unwrap();
        assert!(results.is_empty());

        let seen = dispatcher.transport().seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].path, "/query");
        assert_eq!(seen[0].body.as_deref(), Some(&b"or\n"[..]));
    }

    #[test]
    fn test_error_status_is_transport_failure() {
        let dispatcher = canned(503, "busy");
        let err =
            tokio_test::block_on(dispatcher.dispatch(&pending(SerializationMode::Structured)))
                .unwrap_err();
        assert!(matches!(err, DispatchError::Status { status: 503, .. }));
        assert_eq!(PickerError::from(err).kind(), "TransportFailure");
    }

    #[test]
    fn test_bad_body_is_malformed_response() {
        let dispatcher = canned(200, "not json");
        let err =
            tokio_test::block_on(dispatcher.dispatch(&pending(SerializationMode::Structured)))
                .unwrap_err();
        assert_eq!(PickerError::from(err).kind(), "MalformedResponse");
    }
}
