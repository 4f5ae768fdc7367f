//! Periodic removal of expired sessions.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use pos_core::result::AppResult;

use super::store::SessionStore;

/// Sweeps expired sessions out of a [`SessionStore`].
///
/// Never called on the login or validation paths.
#[derive(Debug, Clone)]
pub struct SessionCleanup {
    store: Arc<dyn SessionStore>,
}

impl SessionCleanup {
    /// Creates a cleanup handler for the given store.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Runs one sweep and returns the number of sessions removed.
    pub async fn run_cleanup(&self) -> AppResult<u64> {
        let removed = self.store.delete_expired().await?;
        if removed > 0 {
            info!(removed, "Expired sessions cleaned up");
        }
        Ok(removed)
    }

    /// Sweep every `interval` until `shutdown` flips to `true`.
    pub fn spawn(self, interval: Duration, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = self.run_cleanup().await {
                            error!(error = %e, "Session cleanup failed");
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            info!("Session cleanup stopped");
                            break;
                        }
                    }
                }
            }
        })
    }
}
