//! Background learning tick: flush feedback, apply queued batches, run
//! the rollback check. One task per engine; aborted when the handle
//! drops.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::warn;

use crate::collector::FeedbackCollector;
use crate::weight_store::WeightStore;

/// Owns the background updater task; aborts it on drop.
pub struct LearningTick {
    handle: JoinHandle<()>,
}

impl LearningTick {
    /// Spawn the updater, waking every `interval`.
    pub fn spawn(
        collector: Arc<FeedbackCollector>,
        store: Arc<WeightStore>,
        interval: Duration,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately; skip it so the first
            // real update happens one full interval after startup.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if let Err(e) = collector.flush().await {
                    warn!(error = %e, "feedback flush failed; batch retained");
                }
                store.apply_pending();
            }
        });
        Self { handle }
    }
}

impl Drop for LearningTick {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
