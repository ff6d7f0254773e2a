//! Process-level errors.
//!
//! Only startup problems and a failed standalone listener end up here.
//! Per-request failures are [`crate::proxy::ProxyError`].

use crate::config::ConfigError;
use crate::hooks::RegistryError;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("module registration failed: {0}")]
    Registry(#[from] RegistryError),

    #[error("invalid engine endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server failed: {0}")]
    Serve(#[source] std::io::Error),

    #[error("serverless runtime failed: {0}")]
    Lambda(lambda_http::Error),

    #[error("failed to initialize logging: {0}")]
    Logging(String),

    #[error("failed to initialize metrics: {0}")]
    Metrics(String),
}
