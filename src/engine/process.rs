//! Router binary launched as a child process.

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::EngineConfig;
use crate::engine::{Engine, EngineContext, EngineError};

/// Runs the router binary until it exits.
///
/// The child inherits the gateway's environment, so `SUBGRAPH_<NAME>_URL`
/// overrides reach a router that carries its own override module. Origin
/// requests made by the child never pass through [`EngineContext::origin`].
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    binary: String,
    args: Vec<String>,
    env: Vec<(String, String)>,
}

impl ProcessEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let mut engine = Self::new(config.binary.clone())
            .env("GRAPH_API_TOKEN", &config.graph_api_token)
            .env("CONFIG_PATH", &config.config_path)
            .env("ROUTER_CONFIG_PATH", &config.router_config_path);
        engine.args = config.args.clone();
        engine
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl Engine for ProcessEngine {
    fn name(&self) -> &str {
        &self.binary
    }

    async fn run(self: Box<Self>, _ctx: EngineContext) -> Result<(), EngineError> {
        let mut child = self.command().spawn().map_err(|source| EngineError::Spawn {
            binary: self.binary.clone(),
            source,
        })?;

        tracing::info!(binary = %self.binary, pid = ?child.id(), "Router process started");

        let status = child.wait().await.map_err(EngineError::Wait)?;
        if status.success() {
            tracing::warn!(binary = %self.binary, "Router process exited");
            Ok(())
        } else {
            Err(EngineError::Exited(status))
        }
    }
}
