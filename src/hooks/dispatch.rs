//! Host side of the origin hook contract.
//!
//! An in-process engine hands every subgraph request to
//! [`OriginDispatcher::dispatch`], which runs the registered hooks and then
//! sends whatever request they leave behind.

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::hooks::{
    ModuleRegistry, OriginContext, OriginRequest, OriginResponse, Subgraph,
};
use crate::proxy::readiness::DEFAULT_MAX_BODY_BYTES;

#[derive(Debug, thiserror::Error)]
pub enum OriginError {
    #[error("origin request to subgraph '{subgraph}' failed: {source}")]
    Request {
        subgraph: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    #[error("failed to read response from subgraph '{subgraph}': {reason}")]
    Body { subgraph: String, reason: String },
}

/// Result of one origin dispatch.
#[derive(Debug)]
pub struct OriginOutcome {
    pub response: OriginResponse,
    /// The subgraph as the hooks left it.
    pub subgraph: Subgraph,
    pub diagnostics: Vec<String>,
    /// True when a hook answered and no network request was made.
    pub short_circuited: bool,
}

/// Runs origin hooks and sends requests to subgraphs.
#[derive(Clone)]
pub struct OriginDispatcher {
    modules: Arc<ModuleRegistry>,
    client: Client<HttpConnector, Body>,
    max_body_bytes: usize,
}

impl OriginDispatcher {
    pub fn new(modules: Arc<ModuleRegistry>) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            modules,
            client,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub async fn dispatch(
        &self,
        mut request: OriginRequest,
        subgraph: Subgraph,
    ) -> Result<OriginOutcome, OriginError> {
        let mut ctx = OriginContext::new(subgraph);

        if let Some(response) = self.modules.run_pre_origin(&mut request, &mut ctx) {
            let (subgraph, diagnostics) = ctx.into_parts();
            return Ok(OriginOutcome {
                response,
                subgraph,
                diagnostics,
                short_circuited: true,
            });
        }

        let (subgraph, diagnostics) = ctx.into_parts();
        tracing::debug!(
            subgraph = %subgraph.name,
            uri = %request.uri(),
            "Dispatching origin request"
        );

        let (parts, body) = request.into_parts();
        let response = self
            .client
            .request(Request::from_parts(parts, Body::from(body)))
            .await
            .map_err(|source| OriginError::Request {
                subgraph: subgraph.name.clone(),
                source,
            })?;

        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(Body::new(body), self.max_body_bytes)
            .await
            .map_err(|e| OriginError::Body {
                subgraph: subgraph.name.clone(),
                reason: e.to_string(),
            })?;

        Ok(OriginOutcome {
            response: OriginResponse::from_parts(parts, body),
            subgraph,
            diagnostics,
            short_circuited: false,
        })
    }
}

impl std::fmt::Debug for OriginDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OriginDispatcher")
            .field("modules", &self.modules)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}
