//! Startup orchestration.
//!
//! # Order
//! 1. Resolve and validate configuration
//! 2. Logging, then metrics (standalone only)
//! 3. Freeze the origin hook registry
//! 4. Launch the engine under supervision
//! 5. Serve on the selected transport
//!
//! Any error before step 5 is fatal. The registry is complete before the
//! first request can arrive.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::{resolve_config, GatewayArgs, GatewayConfig};
use crate::engine::{EngineContext, EngineSupervisor, ProcessEngine};
use crate::error::GatewayError;
use crate::hooks::{builtin_modules, OriginDispatcher};
use crate::http::HttpServer;
use crate::ingress::{self, IngressMode};
use crate::lifecycle::Shutdown;
use crate::observability::{init_logging, init_metrics};

/// Run the gateway until the transport stops.
pub async fn run(args: GatewayArgs) -> Result<(), GatewayError> {
    let config = resolve_config(&args)?;
    let mode = IngressMode::from_config(&config.listener);

    init_logging(&config.observability, mode.is_embedded())?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        mode = ?mode,
        engine = %config.engine.binary,
        endpoint = %config.engine.endpoint,
        max_attempts = config.retry.max_attempts,
        delay_ms = config.retry.delay_ms,
        "router-gateway starting"
    );

    if !mode.is_embedded() && config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|e: std::net::AddrParseError| GatewayError::Metrics(e.to_string()))?;
        init_metrics(addr)?;
    }

    let supervisor = launch_engine(&config)?;

    let server = HttpServer::from_config(&config)?;
    let shutdown = Shutdown::new();
    ingress::serve(mode, server, shutdown.subscribe()).await?;

    tracing::info!(engine = ?supervisor.status(), "Shutdown complete");
    Ok(())
}

/// Freeze the hook registry and start the engine under supervision.
///
/// The registry reaches the engine through [`EngineContext::origin`]. Only
/// in-process engines dispatch through it; [`ProcessEngine`] runs an external
/// router that applies its own overrides from the inherited environment.
pub fn launch_engine(config: &GatewayConfig) -> Result<EngineSupervisor, GatewayError> {
    let modules = Arc::new(builtin_modules()?);
    tracing::info!(modules = ?modules, "Origin modules registered");

    let origin = OriginDispatcher::new(modules).with_max_body_bytes(config.proxy.max_body_bytes);
    let engine = ProcessEngine::from_config(&config.engine);

    Ok(EngineSupervisor::spawn(
        Box::new(engine),
        EngineContext::new(origin),
        config.engine.failure_policy,
    ))
}
