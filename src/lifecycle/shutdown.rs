//! Shutdown coordination for the gateway.

use tokio::sync::broadcast;

use crate::lifecycle::signals::wait_for_termination;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that the server and any background task can
/// subscribe to.
#[derive(Clone)]
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

    /// Trigger the shutdown signal. Safe to call more than once.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Wait for SIGINT/SIGTERM, then trigger.
    pub async fn trigger_on_signal(self) {
        wait_for_termination().await;
        tracing::info!(subscribers = self.tx.receiver_count(), "Shutting down");
        self.trigger();
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
