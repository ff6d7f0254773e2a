//! Subgraph URL overrides from the environment.
//!
//! For a subgraph named `users` the module reads `SUBGRAPH_USERS_URL`. When
//! set to an absolute URL, both the outgoing request and the subgraph's
//! recorded URL are pointed at it. The variable is read on every request.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Uri};
use url::Url;

use crate::hooks::{OriginContext, OriginRequest, OriginResponse, PreOriginHandler};

pub const MODULE_ID: &str = "overrideSubgraphUrl";

/// A malformed override. The request continues unmodified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to parse URL '{value}' from environment variable '{env_var}': {reason}")]
pub struct OverrideError {
    pub env_var: String,
    pub value: String,
    pub reason: String,
}

/// Environment variable consulted for `subgraph_name`.
pub fn override_env_var(subgraph_name: &str) -> String {
    format!("SUBGRAPH_{}_URL", subgraph_name.to_uppercase())
}

/// Parse an override value into an absolute URL with a host.
pub fn parse_override(env_var: &str, value: &str) -> Result<Url, OverrideError> {
    let invalid = |reason: String| OverrideError {
        env_var: env_var.to_string(),
        value: value.to_string(),
        reason,
    };

    let url = Url::parse(value.trim()).map_err(|e| invalid(e.to_string()))?;
    if !url.has_host() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Rewrites subgraph targets from `SUBGRAPH_<NAME>_URL` variables.
#[derive(Clone)]
pub struct OverrideSubgraphUrl {
    lookup: EnvLookup,
}

impl OverrideSubgraphUrl {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::with_lookup(|name| std::env::var(name).ok())
    }

    /// Read overrides through `lookup` instead of the process environment.
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Arc::new(lookup),
        }
    }

    fn resolve(&self, subgraph_name: &str) -> Option<(String, Result<Url, OverrideError>)> {
        let env_var = override_env_var(subgraph_name);
        let value = (self.lookup)(&env_var)?;
        let parsed = parse_override(&env_var, &value);
        Some((env_var, parsed))
    }
}

impl Default for OverrideSubgraphUrl {
    fn default() -> Self {
        Self::from_env()
    }
}

impl std::fmt::Debug for OverrideSubgraphUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideSubgraphUrl").finish_non_exhaustive()
    }
}

impl PreOriginHandler for OverrideSubgraphUrl {
    fn id(&self) -> &'static str {
        MODULE_ID
    }

    fn on_origin_request(
        &self,
        request: &mut OriginRequest,
        ctx: &mut OriginContext,
    ) -> Option<OriginResponse> {
        let name = ctx.active_subgraph().name.clone();
        let (env_var, parsed) = self.resolve(&name)?;

        let url = match parsed.and_then(|url| to_uri(&env_var, &url).map(|uri| (url, uri))) {
            Ok((url, uri)) => {
                *request.uri_mut() = uri;
                url
            }
            Err(e) => {
                tracing::error!(subgraph = %name, env_var = %env_var, error = %e, "Ignoring subgraph URL override");
                ctx.record_diagnostic(e.to_string());
                return None;
            }
        };

        tracing::info!(subgraph = %name, url = %url, "Setting subgraph URL from environment");

        if let Some(host) = request
            .uri()
            .authority()
            .and_then(|authority| HeaderValue::from_str(authority.as_str()).ok())
        {
            request.headers_mut().insert(header::HOST, host);
        }
        ctx.active_subgraph_mut().url = url;
        metrics::counter!("gateway_origin_overrides_total", "subgraph" => name).increment(1);

        None
    }
}

fn to_uri(env_var: &str, url: &Url) -> Result<Uri, OverrideError> {
    url.as_str().parse::<Uri>().map_err(|e| OverrideError {
        env_var: env_var.to_string(),
        value: url.to_string(),
        reason: e.to_string(),
    })
}
