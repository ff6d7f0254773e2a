//! Embedded engine subsystem.
//!
//! # Data Flow
//! ```text
//! startup
//!     → supervisor.rs spawns the Engine on its own task
//!     → engine starts listening on its loopback endpoint (black box)
//!     → supervisor watches the task; when it ends, the failure policy decides
//!       between exiting the process and carrying on
//! ```
//!
//! Nothing here knows when the engine is ready. The readiness proxy learns
//! that by connecting to it.

pub mod process;
pub mod supervisor;

use async_trait::async_trait;

use crate::hooks::OriginDispatcher;

pub use process::ProcessEngine;
pub use supervisor::{EngineStatus, EngineSupervisor};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to spawn router '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting on router: {0}")]
    Wait(#[source] std::io::Error),

    #[error("router exited with {0}")]
    Exited(std::process::ExitStatus),

    #[error("{0}")]
    Other(String),
}

/// What the engine receives from the gateway at launch.
#[derive(Debug, Clone)]
pub struct EngineContext {
    /// Origin dispatch with the registered hooks applied.
    pub origin: OriginDispatcher,
}

impl EngineContext {
    pub fn new(origin: OriginDispatcher) -> Self {
        Self { origin }
    }
}

/// A routing engine that serves on a local endpoint once started.
///
/// `run` resolves only when the engine stops.
#[async_trait]
pub trait Engine: Send + 'static {
    fn name(&self) -> &str;

    async fn run(self: Box<Self>, ctx: EngineContext) -> Result<(), EngineError>;
}
