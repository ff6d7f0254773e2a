//! Per-request failures of the relay path.

use std::time::Duration;

use axum::http::StatusCode;

/// Everything that can end a relayed request without an engine response.
///
/// Errors are local to one inbound request.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The inbound body could not be read.
    #[error("Error reading request body: {0}")]
    ReadFailure(String),

    /// The engine never accepted a connection within the retry bound.
    #[error("Router unavailable after {attempts} attempts, waited a total {}ms", .waited.as_millis())]
    UpstreamUnavailable { attempts: u32, waited: Duration },

    /// The engine answered, but with an unreadable or empty body.
    #[error("Error reading router response: {0}")]
    InvalidUpstreamResponse(String),

    /// The engine accepted the connection but the exchange failed.
    #[error("Error handling request: {0}")]
    UpstreamRequest(String),
}

impl ProxyError {
    /// Server-error status surfaced to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::ReadFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::UpstreamUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ProxyError::InvalidUpstreamResponse(_) | ProxyError::UpstreamRequest(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    /// Stable label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::ReadFailure(_) => "read_failure",
            ProxyError::UpstreamUnavailable { .. } => "upstream_unavailable",
            ProxyError::InvalidUpstreamResponse(_) => "invalid_upstream_response",
            ProxyError::UpstreamRequest(_) => "upstream_request",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_is_a_server_error() {
        let errors = [
            ProxyError::ReadFailure("eof".into()),
            ProxyError::UpstreamUnavailable { attempts: 500, waited: Duration::from_millis(4990) },
            ProxyError::InvalidUpstreamResponse("empty body".into()),
            ProxyError::UpstreamRequest("reset".into()),
        ];
        for err in errors {
            assert!(err.status().is_server_error(), "{} -> {}", err.kind(), err.status());
        }
    }

    #[test]
    fn test_unavailable_message_reports_wait() {
        let err = ProxyError::UpstreamUnavailable { attempts: 500, waited: Duration::from_millis(4990) };
        assert_eq!(
            err.to_string(),
            "Router unavailable after 500 attempts, waited a total 4990ms"
        );
    }
}
