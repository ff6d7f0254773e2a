//! HTTP ingress setup.
//!
//! # Responsibilities
//! - Create the Axum Router with the relay handler on every path
//! - Wire up middleware (request ID, tracing)
//! - Serve standalone connections with graceful shutdown
//!
//! The same Router is handed to the serverless runtime in embedded mode.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http::request::{
    make_request_span, propagate_request_id_layer, request_id, set_request_id_layer,
};
use crate::lifecycle::signals::shutdown_signal;
use crate::proxy::{EngineTransport, HttpEngineTransport, ProxyError, ReadinessProxy};

/// Proxy type shared by all handlers.
pub type SharedProxy = Arc<ReadinessProxy<Box<dyn EngineTransport>>>;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub proxy: SharedProxy,
    pub max_body_bytes: usize,
}

/// HTTP front door for the engine.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(proxy: SharedProxy, max_body_bytes: usize) -> Self {
        let state = AppState {
            proxy,
            max_body_bytes,
        };
        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the server from configuration, talking to the engine over HTTP.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let endpoint: Uri = config
            .engine
            .endpoint
            .parse()
            .map_err(|e: axum::http::uri::InvalidUri| GatewayError::InvalidEndpoint {
                endpoint: config.engine.endpoint.clone(),
                reason: e.to_string(),
            })?;

        let transport: Box<dyn EngineTransport> = Box::new(HttpEngineTransport::new(endpoint));
        let proxy = ReadinessProxy::new(transport, config.retry.policy())
            .with_max_body_bytes(config.proxy.max_body_bytes);

        Ok(Self::new(Arc::new(proxy), config.proxy.max_body_bytes))
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", any(relay_handler))
            .route("/{*path}", any(relay_handler))
            .with_state(state)
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(set_request_id_layer())
    }

    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serve connections from `listener` until Ctrl+C/SIGTERM or `shutdown`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {}
                    _ = shutdown.recv() => {
                        tracing::info!("Shutdown requested");
                    }
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Relay handler.
/// Buffers the body, forwards it to the engine, and returns the engine's answer.
async fn relay_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request_id(&request).to_string();

    let body = match axum::body::to_bytes(request.into_body(), state.max_body_bytes).await {
        Ok(body) => body,
        Err(e) => {
            let err = ProxyError::ReadFailure(e.to_string());
            tracing::warn!(request_id = %request_id, error = %err, "Failed to read request body");
            metrics::counter!("gateway_requests_total", "outcome" => err.kind()).increment(1);
            return err.into_response();
        }
    };

    match state.proxy.forward(body).await {
        Ok(forwarded) => {
            tracing::debug!(
                request_id = %request_id,
                status = %forwarded.status,
                retries = forwarded.retries,
                "Relaying router response"
            );
            metrics::counter!("gateway_requests_total", "outcome" => "relayed").increment(1);
            forwarded.into_response()
        }
        Err(err) => {
            tracing::error!(request_id = %request_id, error = %err, "Request failed");
            metrics::counter!("gateway_requests_total", "outcome" => err.kind()).increment(1);
            err.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::TransportError;
    use crate::resilience::RetryPolicy;
    use async_trait::async_trait;
    use axum::body::Bytes;
    use axum::http::{header, StatusCode};
    use std::time::Duration;
    use tower::ServiceExt;

    /// Echoes the body back as the engine response.
    struct EchoEngine;

    #[async_trait]
    impl EngineTransport for EchoEngine {
        async fn send(&self, body: Bytes) -> Result<axum::http::Response<Body>, TransportError> {
            Ok(axum::http::Response::builder()
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap())
        }
    }

    struct DeadEngine;

    #[async_trait]
    impl EngineTransport for DeadEngine {
        async fn send(&self, _body: Bytes) -> Result<axum::http::Response<Body>, TransportError> {
            Err(TransportError::ConnectionNotReady("connection refused".into()))
        }
    }

    fn server(transport: Box<dyn EngineTransport>, max_body_bytes: usize) -> Router {
        let proxy = ReadinessProxy::new(transport, RetryPolicy::new(5, Duration::ZERO));
        HttpServer::new(Arc::new(proxy), max_body_bytes).into_router()
    }

    #[tokio::test]
    async fn test_relays_on_any_path() {
        for path in ["/", "/graphql", "/2015-03-31/functions/fn/invocations"] {
            let response = server(Box::new(EchoEngine), 1024)
                .oneshot(
                    Request::post(path)
                        .body(Body::from(r#"{"query":"{ me { id } }"}"#))
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK, "path {path}");
            assert!(response.headers().contains_key("x-request-id"));
            let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&body[..], br#"{"query":"{ me { id } }"}"#);
        }
    }

    #[tokio::test]
    async fn test_dead_engine_is_server_error() {
        let response = server(Box::new(DeadEngine), 1024)
            .oneshot(Request::post("/").body(Body::from("{}")).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_oversized_request_is_read_failure() {
        let response = server(Box::new(EchoEngine), 4)
            .oneshot(Request::post("/").body(Body::from(r#"{"query":"{}"}"#)).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["errors"][0]["extensions"]["code"], "read_failure");
    }

    #[tokio::test]
    async fn test_caller_request_id_is_echoed() {
        let response = server(Box::new(EchoEngine), 1024)
            .oneshot(
                Request::post("/")
                    .header("x-request-id", "req-42")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "req-42");
    }
}
