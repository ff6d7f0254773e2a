//! Shutdown coordination for the standalone listener.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// The standalone server subscribes before it starts serving; triggering
/// stops it from accepting new connections and lets in-flight requests
/// finish their retry loops.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every subscriber. Returns how many were listening.
    pub fn trigger(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
