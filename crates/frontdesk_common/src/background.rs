// --- File: crates/frontdesk_common/src/background.rs ---
//! Fire-and-forget work that must not hold up an HTTP response.
//!
//! Tasks are spawned immediately; a semaphore caps how many run at once. The
//! permit is taken inside the task so submitting never blocks the caller.
//! Outcomes go to the log and nowhere else.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, info_span, Instrument};

#[derive(Clone)]
pub struct BackgroundTasks {
    permits: Arc<Semaphore>,
}

impl BackgroundTasks {
    pub const DEFAULT_LIMIT: usize = 64;

    pub fn new(limit: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(limit.max(1))),
        }
    }

    /// Runs `task` in the background under the name `name`.
    ///
    /// The returned handle may be dropped; it exists so tests can wait.
    pub fn spawn<F, E>(&self, name: &'static str, task: F) -> JoinHandle<()>
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let permits = self.permits.clone();
        let span = info_span!("background", task = name);
        tokio::spawn(
            async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    error!("🚨 Background pool closed, dropping {}", name);
                    return;
                };
                match task.await {
                    Ok(()) => debug!("✅ {} finished", name),
                    Err(e) => error!("🚨 {} failed: {}", name, e),
                }
            }
            .instrument(span),
        )
    }

    /// Number of tasks that could start right now without waiting.
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT)
    }
}
