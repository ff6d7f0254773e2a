//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. All problems are
//! collected and returned together.

use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a configuration, returning every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == Some(0) {
        errors.push(ValidationError::new("listener.port", "must be non-zero"));
    }

    match config.listener.host.parse::<std::net::IpAddr>() {
        Ok(ip) if ip.is_loopback() => {}
        _ => {
            errors.push(ValidationError::new(
                "listener.host",
                format!("must be a loopback address, got '{}'", config.listener.host),
            ));
        }
    }

    if config.engine.binary.trim().is_empty() {
        errors.push(ValidationError::new("engine.binary", "must not be empty"));
    }

    match Url::parse(&config.engine.endpoint) {
        Ok(url) if url.scheme() != "http" => {
            errors.push(ValidationError::new(
                "engine.endpoint",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        Ok(url) if url.host_str().is_none() => {
            errors.push(ValidationError::new("engine.endpoint", "missing host"));
        }
        Ok(_) => {}
        Err(e) => {
            errors.push(ValidationError::new("engine.endpoint", e.to_string()));
        }
    }

    if config.retry.max_attempts == 0 {
        errors.push(ValidationError::new("retry.max_attempts", "must be at least 1"));
    }

    if config.proxy.max_body_bytes == 0 {
        errors.push(ValidationError::new("proxy.max_body_bytes", "must be greater than 0"));
    }

    if !matches!(config.observability.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::new(
            "observability.log_format",
            format!("expected 'pretty' or 'json', got '{}'", config.observability.log_format),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<std::net::SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "must be a socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.listener.port = Some(0);
        config.engine.endpoint = "https://127.0.0.1:4000/graphql".into();
        config.retry.max_attempts = 0;
        config.observability.log_format = "xml".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.port",
                "engine.endpoint",
                "retry.max_attempts",
                "observability.log_format"
            ]
        );
    }

    #[test]
    fn test_listener_host_must_be_loopback() {
        for host in ["0.0.0.0", "10.0.0.7", "localhost", ""] {
            let mut config = GatewayConfig::default();
            config.listener.host = host.into();
            let errors = validate_config(&config).unwrap_err();
            assert_eq!(errors[0].field, "listener.host", "host {host:?}");
        }

        for host in ["127.0.0.1", "::1"] {
            let mut config = GatewayConfig::default();
            config.listener.host = host.into();
            assert!(validate_config(&config).is_ok(), "host {host:?}");
        }
    }

    #[test]
    fn test_relative_endpoint_rejected() {
        let mut config = GatewayConfig::default();
        config.engine.endpoint = "/graphql".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "engine.endpoint");
    }
}
