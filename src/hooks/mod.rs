//! Origin request hooks.
//!
//! # Data Flow
//! ```text
//! engine about to call a subgraph
//!     → dispatch.rs (OriginDispatcher builds an OriginContext)
//!     → registry.rs (each PreOriginHandler, in registration order)
//!         handler returns a response → dispatch skipped, response used
//!         otherwise the (possibly rewritten) request continues
//!     → hyper client → subgraph
//! ```
//!
//! The registry is assembled once during startup and is read-only afterwards.

pub mod dispatch;
pub mod override_subgraph_url;
pub mod registry;

use axum::{
    body::Bytes,
    http::{Request, Response},
};
use url::Url;

pub use dispatch::{OriginDispatcher, OriginError, OriginOutcome};
pub use override_subgraph_url::{OverrideError, OverrideSubgraphUrl};
pub use registry::{ModuleRegistry, ModuleRegistryBuilder, RegistryError};

/// Outbound request to a subgraph, as seen by hooks.
pub type OriginRequest = Request<Bytes>;

/// Response a hook may return instead of contacting the subgraph.
pub type OriginResponse = Response<Bytes>;

/// A named backend service the engine dispatches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subgraph {
    pub id: String,
    pub name: String,
    pub url: Url,
}

impl Subgraph {
    pub fn new(id: impl Into<String>, name: impl Into<String>, url: Url) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url,
        }
    }
}

/// Per-dispatch state shared by the hooks of one origin request.
#[derive(Debug)]
pub struct OriginContext {
    subgraph: Subgraph,
    diagnostics: Vec<String>,
}

impl OriginContext {
    pub fn new(subgraph: Subgraph) -> Self {
        Self {
            subgraph,
            diagnostics: Vec::new(),
        }
    }

    /// The subgraph this request is addressed to.
    pub fn active_subgraph(&self) -> &Subgraph {
        &self.subgraph
    }

    /// Mutable access, so later stages observe changes made by a hook.
    pub fn active_subgraph_mut(&mut self) -> &mut Subgraph {
        &mut self.subgraph
    }

    /// Note a recoverable problem for this request.
    pub fn record_diagnostic(&mut self, message: impl Into<String>) {
        self.diagnostics.push(message.into());
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (Subgraph, Vec<String>) {
        (self.subgraph, self.diagnostics)
    }
}

/// Capability invoked right before a request is sent to a subgraph.
pub trait PreOriginHandler: Send + Sync {
    /// Unique module identifier.
    fn id(&self) -> &'static str;

    /// Inspect or rewrite `request`.
    ///
    /// Returning `Some(response)` skips dispatch; the engine uses that
    /// response instead.
    fn on_origin_request(
        &self,
        request: &mut OriginRequest,
        ctx: &mut OriginContext,
    ) -> Option<OriginResponse>;
}

/// Registry with the modules bundled in this crate.
pub fn builtin_modules() -> Result<ModuleRegistry, RegistryError> {
    let mut builder = ModuleRegistryBuilder::new();
    builder.register(OverrideSubgraphUrl::from_env())?;
    Ok(builder.build())
}
