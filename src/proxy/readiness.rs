//! Readiness-retry forwarding.
//!
//! # Responsibilities
//! - Deliver an inbound body to the engine, unchanged
//! - Retry while the engine refuses connections, up to the policy bound
//! - Read the engine response to completion before handing it back
//!
//! Attempts for one request are strictly sequential. The delay suspends only
//! the task forwarding that request.

use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, Response, StatusCode},
};

use crate::proxy::error::ProxyError;
use crate::proxy::transport::{EngineTransport, HttpEngineTransport};
use crate::resilience::retries::{RetryPolicy, RetryState};

/// Default cap on a buffered engine response.
pub const DEFAULT_MAX_BODY_BYTES: usize = 6 * 1024 * 1024;

/// A fully buffered engine response plus how long it took to get it.
#[derive(Debug, Clone)]
pub struct Forwarded {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
    /// Connection attempts that failed before this response arrived.
    pub retries: u32,
    /// Time spent sleeping between those attempts.
    pub waited: Duration,
}

/// Forwards request bodies to the engine, retrying through its startup window.
pub struct ReadinessProxy<T = HttpEngineTransport> {
    transport: T,
    policy: RetryPolicy,
    max_body_bytes: usize,
}

impl<T: EngineTransport> ReadinessProxy<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self {
            transport,
            policy,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Forward `body` to the engine and return its buffered response.
    pub async fn forward(&self, body: Bytes) -> Result<Forwarded, ProxyError> {
        let mut state = self.policy.start();

        tracing::debug!(bytes = body.len(), "Proxying request to router");

        while let Some(attempt) = state.next_attempt() {
            metrics::counter!("gateway_engine_attempts_total").increment(1);

            match self.transport.send(body.clone()).await {
                Ok(response) => return self.relay(response, &state).await,
                Err(e) if e.is_retryable() => {
                    tracing::debug!(
                        attempt,
                        max_attempts = state.max_attempts(),
                        waited_ms = state.waited().as_millis() as u64,
                        error = %e,
                        "Router not accepting connections yet"
                    );
                    if !state.is_exhausted() {
                        tokio::time::sleep(state.delay()).await;
                    }
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "Router request failed");
                    return Err(ProxyError::UpstreamRequest(e.to_string()));
                }
            }
        }

        let waited = state.waited();
        tracing::error!(
            attempts = state.attempt_count(),
            waited_ms = waited.as_millis() as u64,
            "Router never accepted a connection"
        );
        Err(ProxyError::UpstreamUnavailable {
            attempts: state.attempt_count(),
            waited,
        })
    }

    async fn relay(&self, response: Response<Body>, state: &RetryState) -> Result<Forwarded, ProxyError> {
        let (parts, body) = response.into_parts();
        let retries = state.retries();
        let waited = state.waited();

        tracing::info!(
            retries,
            waited_ms = waited.as_millis() as u64,
            status = %parts.status,
            "Router responded"
        );
        metrics::histogram!("gateway_engine_wait_seconds").record(waited.as_secs_f64());

        let body = axum::body::to_bytes(body, self.max_body_bytes)
            .await
            .map_err(|e| ProxyError::InvalidUpstreamResponse(e.to_string()))?;
        if body.is_empty() {
            return Err(ProxyError::InvalidUpstreamResponse("empty body".to_string()));
        }

        Ok(Forwarded {
            status: parts.status,
            content_type: parts.headers.get(header::CONTENT_TYPE).cloned(),
            body,
            retries,
            waited,
        })
    }
}
