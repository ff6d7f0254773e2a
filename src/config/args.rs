//! Command-line flags and environment overrides.
//!
//! Every flag can also be supplied through the environment variable named
//! next to it. These are the variables the serverless deployment sets.

use std::path::PathBuf;

use clap::Parser;

use crate::config::schema::GatewayConfig;

#[derive(Parser, Debug, Default, Clone)]
#[command(name = "router-gateway")]
#[command(about = "Front door that holds requests until the embedded GraphQL router is ready", long_about = None)]
pub struct GatewayArgs {
    /// Optional TOML configuration file.
    #[arg(long, env = "GATEWAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Serve on 127.0.0.1:<port> instead of handling serverless invocations.
    #[arg(long, env = "HTTP_PORT")]
    pub http_port: Option<u16>,

    /// Router binary to launch.
    #[arg(long, env = "PATH_ROUTER")]
    pub router_binary: Option<String>,

    /// Local endpoint of the router once it is listening.
    #[arg(long, env = "ENGINE_ENDPOINT")]
    pub engine_endpoint: Option<String>,

    /// Router execution config, forwarded to the router process.
    #[arg(long, env = "CONFIG_PATH")]
    pub config_path: Option<String>,

    /// Supergraph config, forwarded to the router process.
    #[arg(long, env = "ROUTER_CONFIG_PATH")]
    pub router_config_path: Option<String>,

    /// Graph API token, forwarded to the router process.
    #[arg(long, env = "GRAPH_API_TOKEN", hide_env_values = true)]
    pub graph_api_token: Option<String>,

    /// Maximum delivery attempts while the router starts.
    #[arg(long, env = "RETRY_MAX_ATTEMPTS")]
    pub retry_max_attempts: Option<u32>,

    /// Delay between delivery attempts, in milliseconds.
    #[arg(long, env = "RETRY_DELAY_MS")]
    pub retry_delay_ms: Option<u64>,

    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// `pretty` or `json`.
    #[arg(long, env = "LOG_FORMAT")]
    pub log_format: Option<String>,
}

impl GatewayArgs {
    /// Overlay every supplied value onto `config`.
    pub fn apply(&self, config: &mut GatewayConfig) {
        if let Some(port) = self.http_port {
            config.listener.port = Some(port);
        }
        if let Some(binary) = &self.router_binary {
            config.engine.binary = binary.clone();
        }
        if let Some(endpoint) = &self.engine_endpoint {
            config.engine.endpoint = endpoint.clone();
        }
        if let Some(path) = &self.config_path {
            config.engine.config_path = path.clone();
        }
        if let Some(path) = &self.router_config_path {
            config.engine.router_config_path = path.clone();
        }
        if let Some(token) = &self.graph_api_token {
            config.engine.graph_api_token = token.clone();
        }
        if let Some(attempts) = self.retry_max_attempts {
            config.retry.max_attempts = attempts;
        }
        if let Some(delay) = self.retry_delay_ms {
            config.retry.delay_ms = delay;
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.observability.log_format = format.clone();
        }
    }
}
