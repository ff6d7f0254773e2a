//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::resilience::retries::RetryPolicy;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Local listener settings (standalone mode only).
    pub listener: ListenerConfig,

    /// Embedded engine process and endpoint.
    pub engine: EngineConfig,

    /// Readiness retry settings.
    pub retry: RetryConfig,

    /// Request relay limits.
    pub proxy: ProxySettings,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
///
/// A configured port selects standalone mode; without one the gateway serves
/// serverless invocations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Loopback host the standalone listener binds to.
    pub host: String,

    /// Port for the standalone listener.
    pub port: Option<u16>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: None,
        }
    }
}

impl ListenerConfig {
    /// `host:port` when a port is configured.
    pub fn bind_address(&self) -> Option<String> {
        self.port.map(|port| match self.host.parse::<IpAddr>() {
            Ok(ip) => SocketAddr::new(ip, port).to_string(),
            Err(_) => format!("{}:{}", self.host, port),
        })
    }
}

/// What happens to the process when the engine task ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EngineFailurePolicy {
    /// Terminate the process so the host runtime replaces it.
    #[default]
    Exit,
    /// Record the failure and keep serving; requests fail once retries run out.
    Isolate,
}

/// Engine process configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Path to the router binary.
    pub binary: String,

    /// Extra arguments passed to the router binary.
    pub args: Vec<String>,

    /// Local endpoint the engine listens on once ready.
    pub endpoint: String,

    /// Router execution config path, forwarded as `CONFIG_PATH`.
    pub config_path: String,

    /// Composed supergraph path, forwarded as `ROUTER_CONFIG_PATH`.
    pub router_config_path: String,

    /// Graph API token, forwarded as `GRAPH_API_TOKEN`.
    pub graph_api_token: String,

    /// Supervisor behaviour when the engine stops.
    pub failure_policy: EngineFailurePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary: "./bin/router".to_string(),
            args: Vec::new(),
            endpoint: "http://127.0.0.1:4000/graphql".to_string(),
            config_path: "./cosmo.yaml".to_string(),
            router_config_path: "./supergraph.json".to_string(),
            graph_api_token: "fake".to_string(),
            failure_policy: EngineFailurePolicy::Exit,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of delivery attempts per request.
    pub max_attempts: u32,

    /// Fixed delay between attempts in milliseconds.
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 500,
            delay_ms: 10,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.delay_ms))
    }
}

/// Relay limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxySettings {
    /// Largest request or response body the gateway buffers, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            max_body_bytes: 6 * 1024 * 1024, // 6MB, the synchronous invocation payload cap
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format: `pretty` or `json`.
    pub log_format: String,

    /// Enable the Prometheus scrape endpoint (standalone mode only).
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
