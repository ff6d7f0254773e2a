//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::any,
    Router,
};
use router_gateway::config::GatewayConfig;
use router_gateway::{HttpServer, Shutdown};
use tokio::net::TcpListener;

/// Reserve a loopback address that nothing is listening on yet.
#[allow(dead_code)]
pub async fn free_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

type Handler = Arc<dyn Fn(HeaderMap, Bytes) -> std::pin::Pin<Box<dyn Future<Output = (u16, String)> + Send>> + Send + Sync>;

async fn answer(State(f): State<Handler>, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let (status, body) = f(headers, body).await;
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::OK),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}

/// Serve a programmable mock on `listener`; `f` maps each request to a status and body.
pub fn serve_programmable<F, Fut>(listener: TcpListener, f: F)
where
    F: Fn(HeaderMap, Bytes) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let handler: Handler = Arc::new(move |headers, body| Box::pin(f(headers, body)));
    let app = Router::new()
        .route("/", any(answer))
        .route("/{*path}", any(answer))
        .with_state(handler);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
}

/// Start a programmable mock on an ephemeral port.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(HeaderMap, Bytes) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    serve_programmable(listener, f);
    addr
}

/// Start an engine on `addr` only after `delay`, like a router still booting.
#[allow(dead_code)]
pub fn start_engine_after<F, Fut>(addr: SocketAddr, delay: Duration, f: F)
where
    F: Fn(HeaderMap, Bytes) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let listener = TcpListener::bind(addr).await.unwrap();
        serve_programmable(listener, f);
    });
}

/// Gateway config pointed at an engine on `engine_addr`.
#[allow(dead_code)]
pub fn gateway_config(engine_addr: SocketAddr, max_attempts: u32, delay_ms: u64) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.engine.endpoint = format!("http://{}/graphql", engine_addr);
    config.retry.max_attempts = max_attempts;
    config.retry.delay_ms = delay_ms;
    config
}

/// Run a standalone gateway on an ephemeral port.
#[allow(dead_code)]
pub async fn start_gateway(server: HttpServer) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
