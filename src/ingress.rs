//! Transport selection.
//!
//! One switch, read once at startup: a configured port (`HTTP_PORT`) means a
//! local listener on `127.0.0.1:<port>`; no port means the process is driven
//! by the serverless runtime, one invocation at a time.

use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::ListenerConfig;
use crate::error::GatewayError;
use crate::http::HttpServer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngressMode {
    /// Serverless invocations translated by `lambda_http`.
    Embedded,
    /// Persistent local listener.
    Standalone { addr: String },
}

impl IngressMode {
    pub fn from_config(listener: &ListenerConfig) -> Self {
        match listener.bind_address() {
            Some(addr) => IngressMode::Standalone { addr },
            None => IngressMode::Embedded,
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, IngressMode::Embedded)
    }
}

/// Serve `server` over the selected transport until it stops.
///
/// A standalone bind failure is returned as [`GatewayError::Bind`]; callers
/// treat it as fatal.
pub async fn serve(
    mode: IngressMode,
    server: HttpServer,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), GatewayError> {
    match mode {
        IngressMode::Standalone { addr } => {
            tracing::info!(address = %addr, "Starting HTTP server");
            let listener = TcpListener::bind(&addr)
                .await
                .map_err(|source| GatewayError::Bind { addr: addr.clone(), source })?;
            server.run(listener, shutdown).await.map_err(GatewayError::Serve)
        }
        IngressMode::Embedded => {
            tracing::info!("Starting serverless handler");
            lambda_http::run(server.into_router())
                .await
                .map_err(GatewayError::Lambda)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_selects_standalone() {
        let mut listener = ListenerConfig::default();
        assert_eq!(IngressMode::from_config(&listener), IngressMode::Embedded);

        listener.port = Some(3002);
        assert_eq!(
            IngressMode::from_config(&listener),
            IngressMode::Standalone {
                addr: "127.0.0.1:3002".into()
            }
        );
        assert!(!IngressMode::from_config(&listener).is_embedded());
    }
}
