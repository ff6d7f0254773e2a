//! Delivery of a buffered body to the engine's local endpoint.

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, Method, Request, Response, Uri},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a single delivery attempt.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The engine is not accepting connections yet.
    #[error("engine not accepting connections: {0}")]
    ConnectionNotReady(#[source] BoxError),

    /// The connection was made but the exchange failed.
    #[error("engine request failed: {0}")]
    Request(#[source] BoxError),
}

impl TransportError {
    /// Only connection-level failures mean "not ready yet".
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::ConnectionNotReady(_))
    }
}

/// A way of sending one request body to the engine.
#[async_trait]
pub trait EngineTransport: Send + Sync + 'static {
    async fn send(&self, body: Bytes) -> Result<Response<Body>, TransportError>;
}

#[async_trait]
impl<T: EngineTransport + ?Sized> EngineTransport for Box<T> {
    async fn send(&self, body: Bytes) -> Result<Response<Body>, TransportError> {
        (**self).send(body).await
    }
}

/// Posts bodies to the engine over loopback HTTP.
#[derive(Clone)]
pub struct HttpEngineTransport {
    client: Client<HttpConnector, Body>,
    endpoint: Uri,
}

impl HttpEngineTransport {
    pub fn new(endpoint: Uri) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client, endpoint }
    }
}

#[async_trait]
impl EngineTransport for HttpEngineTransport {
    async fn send(&self, body: Bytes) -> Result<Response<Body>, TransportError> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(self.endpoint.clone())
            .header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(Body::from(body))
            .map_err(|e| TransportError::Request(e.into()))?;

        match self.client.request(request).await {
            Ok(response) => Ok(response.map(Body::new)),
            Err(e) if e.is_connect() => Err(TransportError::ConnectionNotReady(e.into())),
            Err(e) => Err(TransportError::Request(e.into())),
        }
    }
}
