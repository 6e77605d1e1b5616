//! Graceful shutdown for the dashboard daemon.
//!
//! The tracker service, the live feed and the periodic refresh tasks each
//! hold a receiver and `select!` on it next to their main loop.

use tokio::signal;
use tokio::sync::broadcast;

/// One-shot stop signal for the dashboard's background tasks.
///
/// `run` subscribes the tracker service, the feed client, the peer refresh
/// loop, the stale-chain pruner, the notification logger and the optional
/// status server. The feed client answers the signal with a `close` frame
/// before it disconnects. One-shot transaction commands use their own
/// controller to stop the short-lived tracker they run through.
pub struct ShutdownController {
    tx: broadcast::Sender<()>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// A receiver that resolves once shutdown is triggered.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn shutdown(&self) {
        let _ = self.tx.send(());
    }

    /// Wait for Ctrl-C (or SIGTERM on unix), then trigger shutdown.
    pub async fn wait_for_signal(&self) {
        let ctrl_c = signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "SIGTERM handler unavailable");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => { tracing::info!("received SIGINT, shutting down"); }
            _ = terminate => { tracing::info!("received SIGTERM, shutting down"); }
        }

        self.shutdown();
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}
