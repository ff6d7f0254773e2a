//! Structured logging.
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies to this
//! crate and tower-http. In embedded mode timestamps, targets and colours
//! are dropped since the platform log collector adds its own.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::error::GatewayError;

/// Filter directives used when `RUST_LOG` is absent.
pub fn default_directives(level: &str) -> String {
    format!("router_gateway={0},tower_http={0}", level)
}

/// Install the global subscriber.
pub fn init_logging(config: &ObservabilityConfig, embedded: bool) -> Result<(), GatewayError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(&config.log_level)))
        .map_err(|e| GatewayError::Logging(e.to_string()))?;

    let fmt = tracing_subscriber::fmt::layer()
        .with_target(!embedded)
        .with_ansi(!embedded);
    let registry = tracing_subscriber::registry().with(filter);

    let result = match (config.log_format.as_str(), embedded) {
        ("json", _) => registry.with(fmt.json().flatten_event(true)).try_init(),
        (_, true) => registry.with(fmt.without_time()).try_init(),
        _ => registry.with(fmt).try_init(),
    };

    result.map_err(|e| GatewayError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        let directives = default_directives("debug");
        assert_eq!(directives, "router_gateway=debug,tower_http=debug");
        assert!(EnvFilter::try_new(directives).is_ok());
    }
}
