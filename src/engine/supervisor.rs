//! Engine task supervision.
//!
//! The engine runs for the lifetime of the process and is never joined by
//! the serving path. The supervisor is the only thing that notices when it
//! stops, and applies the configured [`EngineFailurePolicy`].

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::EngineFailurePolicy;
use crate::engine::{Engine, EngineContext};

/// Last known engine state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    /// Launched; may or may not be listening yet.
    Starting,
    /// The engine task has ended.
    Exited { reason: String },
}

pub struct EngineSupervisor {
    status: watch::Receiver<EngineStatus>,
    watcher: JoinHandle<()>,
}

impl EngineSupervisor {
    /// Launch `engine` on its own task and watch it.
    pub fn spawn(engine: Box<dyn Engine>, ctx: EngineContext, policy: EngineFailurePolicy) -> Self {
        let (status_tx, status) = watch::channel(EngineStatus::Starting);
        let name = engine.name().to_string();

        tracing::info!(engine = %name, policy = ?policy, "Starting engine");
        metrics::gauge!("gateway_engine_running").set(1.0);
        let task = tokio::spawn(engine.run(ctx));

        let watcher = tokio::spawn(async move {
            let reason = match task.await {
                Ok(Ok(())) => "engine returned".to_string(),
                Ok(Err(e)) => e.to_string(),
                Err(e) if e.is_panic() => "engine task panicked".to_string(),
                Err(e) => format!("engine task cancelled: {}", e),
            };

            tracing::error!(engine = %name, reason = %reason, "Engine stopped");
            metrics::gauge!("gateway_engine_running").set(0.0);
            status_tx.send_replace(EngineStatus::Exited { reason });

            match policy {
                EngineFailurePolicy::Exit => {
                    tracing::error!("Exiting: engine is required to serve requests");
                    std::process::exit(1);
                }
                EngineFailurePolicy::Isolate => {
                    tracing::warn!("Engine failure isolated; requests will fail once retries run out");
                }
            }
        });

        Self { status, watcher }
    }

    /// Last state published by the watcher.
    pub fn status(&self) -> EngineStatus {
        self.status.borrow().clone()
    }
}

impl Drop for EngineSupervisor {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineError;
    use crate::hooks::{ModuleRegistry, OriginDispatcher};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::oneshot;

    struct ScriptedEngine {
        stop: oneshot::Receiver<Result<(), String>>,
    }

    #[async_trait]
    impl Engine for ScriptedEngine {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn run(self: Box<Self>, _ctx: EngineContext) -> Result<(), EngineError> {
            match self.stop.await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(reason)) => Err(EngineError::Other(reason)),
                Err(_) => std::future::pending().await,
            }
        }
    }

    struct PanickingEngine;

    #[async_trait]
    impl Engine for PanickingEngine {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn run(self: Box<Self>, _ctx: EngineContext) -> Result<(), EngineError> {
            panic!("engine bug");
        }
    }

    async fn wait_exited(supervisor: &EngineSupervisor) -> EngineStatus {
        loop {
            let status = supervisor.status();
            if matches!(status, EngineStatus::Exited { .. }) {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    fn ctx() -> EngineContext {
        EngineContext::new(OriginDispatcher::new(Arc::new(ModuleRegistry::default())))
    }

    #[tokio::test]
    async fn test_running_engine_stays_starting() {
        let (_tx, stop) = oneshot::channel();
        let supervisor = EngineSupervisor::spawn(
            Box::new(ScriptedEngine { stop }),
            ctx(),
            EngineFailurePolicy::Isolate,
        );

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(supervisor.status(), EngineStatus::Starting);
    }

    #[tokio::test]
    async fn test_failure_is_published_when_isolated() {
        let (tx, stop) = oneshot::channel();
        let supervisor = EngineSupervisor::spawn(
            Box::new(ScriptedEngine { stop }),
            ctx(),
            EngineFailurePolicy::Isolate,
        );

        tx.send(Err("schema composition failed".into())).unwrap();
        let status = tokio::time::timeout(Duration::from_secs(2), wait_exited(&supervisor))
            .await
            .unwrap();
        assert_eq!(
            status,
            EngineStatus::Exited {
                reason: "schema composition failed".into()
            }
        );
    }

    #[tokio::test]
    async fn test_panic_is_detected() {
        let supervisor =
            EngineSupervisor::spawn(Box::new(PanickingEngine), ctx(), EngineFailurePolicy::Isolate);
        let status = tokio::time::timeout(Duration::from_secs(2), wait_exited(&supervisor))
            .await
            .unwrap();
        assert_eq!(
            status,
            EngineStatus::Exited {
                reason: "engine task panicked".into()
            }
        );
    }
}
