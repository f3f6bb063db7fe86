//! Periodic background save.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::TallyService;

/// Running autosave task. Dropping the handle without [`stop`](Self::stop)
/// also ends the task at its next wake-up.
#[derive(Debug)]
pub struct AutosaveHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl AutosaveHandle {
    /// Spawns a task saving `service` every `period`. The first save happens
    /// one period after spawning.
    #[must_use]
    pub fn spawn(service: Arc<TallyService>, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::debug!(?period, "autosave started");

            loop {
                tokio::select! {
                    biased;
                    _ = stop_rx.changed() => break,
                    _ = ticker.tick() => service.save_now().await,
                }
            }
            tracing::debug!("autosave stopped");
        });

        Self { stop_tx, task }
    }

    /// Signals the task and waits for it to finish. No save starts after
    /// this returns.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "autosave task ended abnormally");
        }
    }
}
