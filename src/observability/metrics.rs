//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): inbound requests by `outcome`
//! - `gateway_engine_attempts_total` (counter): delivery attempts to the engine
//! - `gateway_engine_wait_seconds` (histogram): retry wait before the engine answered
//! - `gateway_origin_overrides_total` (counter): subgraph URL overrides by `subgraph`
//! - `gateway_engine_running` (gauge): 1 while the engine task is alive
//!
//! Without an installed recorder every update is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::GatewayError;

/// Install the Prometheus recorder and its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), GatewayError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| GatewayError::Metrics(e.to_string()))?;

    describe_metrics();
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

fn describe_metrics() {
    metrics::describe_counter!("gateway_requests_total", "Inbound requests by outcome");
    metrics::describe_counter!(
        "gateway_engine_attempts_total",
        "Delivery attempts made to the engine"
    );
    metrics::describe_histogram!(
        "gateway_engine_wait_seconds",
        metrics::Unit::Seconds,
        "Time spent waiting for the engine to accept a connection"
    );
    metrics::describe_gauge!(
        "gateway_engine_running",
        "Whether the engine task is still running"
    );
    metrics::describe_counter!(
        "gateway_origin_overrides_total",
        "Subgraph requests redirected by an environment override"
    );
}
