//! Per-intent adaptive weight store.
//!
//! Readers copy the current vector; the background updater is the only
//! writer. Each intent keeps a bounded history of published vectors and
//! a windowed top-3 CTR per vector generation; a measured regression
//! beyond the configured threshold swaps the previous vector back and
//! pins it for a cooldown.

use std::collections::{HashMap, VecDeque};

use parking_lot::RwLock;
use tracing::{info, warn};

use quarry_core::config::{LearningConfig, RankingConfig};
use quarry_core::constants::{ROLLBACK_COOLDOWN_QUERIES, WEIGHT_HISTORY_LEN};
use quarry_core::models::{FeedbackOutcome, WeightVector, FACTOR_COUNT};
use quarry_core::Intent;

use crate::update::{self, FeedbackEvent, UpdateParams};

/// Top-3 click-through over the last `rollback_window` feedback events
/// for one vector generation. Older outcomes age out of the ring, so a
/// long-lived generation is judged on its recent quality, not its
/// lifetime average.
#[derive(Debug, Clone, Default)]
struct CtrWindow {
    outcomes: VecDeque<bool>,
}

impl CtrWindow {
    fn push(&mut self, success: bool, window: usize) {
        self.outcomes.push_back(success);
        while self.outcomes.len() > window {
            self.outcomes.pop_front();
        }
    }

    fn trials(&self) -> usize {
        self.outcomes.len()
    }

    fn ctr(&self) -> Option<f64> {
        if self.outcomes.is_empty() {
            return None;
        }
        let successes = self.outcomes.iter().filter(|s| **s).count();
        Some(successes as f64 / self.outcomes.len() as f64)
    }
}

#[derive(Debug, Clone)]
struct IntentState {
    current: WeightVector,
    /// Previously published vectors, most recent last.
    history: VecDeque<WeightVector>,
    pending: Vec<FeedbackEvent>,
    current_window: CtrWindow,
    previous_window: CtrWindow,
    /// Feedback events to ignore for updates after a rollback.
    pinned_for: u64,
}

impl IntentState {
    fn new(current: WeightVector) -> Self {
        Self {
            current,
            history: VecDeque::new(),
            pending: Vec::new(),
            current_window: CtrWindow::default(),
            previous_window: CtrWindow::default(),
            pinned_for: 0,
        }
    }
}

/// The adaptive weight store.
pub struct WeightStore {
    states: RwLock<HashMap<Intent, IntentState>>,
    params: UpdateParams,
    min_batch: usize,
    /// Feedback events per generation the CTR measurement looks back on.
    rollback_window: usize,
    rollback_drop_threshold: f64,
}

impl WeightStore {
    /// Build with the built-in per-intent defaults, or the configured
    /// startup weights when `ranking.default_weights` is set.
    pub fn new(ranking: &RankingConfig, learning: &LearningConfig) -> Self {
        let (weight_min, weight_max) = ranking.weight_bounds;
        let params = UpdateParams {
            eta: learning.eta,
            delta_cap: ranking.per_update_delta_cap,
            weight_min,
            weight_max,
        };

        let mut states = HashMap::new();
        for intent in Intent::ALL {
            let start = match &ranking.default_weights {
                Some(values) if values.len() == FACTOR_COUNT => {
                    let mut array = [0.0f64; FACTOR_COUNT];
                    array.copy_from_slice(values);
                    WeightVector::from_array(array).normalized(weight_min, weight_max)
                }
                _ => WeightVector::default_for(intent),
            };
            states.insert(intent, IntentState::new(start));
        }

        Self {
            states: RwLock::new(states),
            params,
            min_batch: learning.min_batch,
            rollback_window: learning.rollback_window,
            rollback_drop_threshold: learning.rollback_drop_threshold,
        }
    }

    /// Snapshot of the current vector for an intent. Cheap copy; the
    /// caller's ranking never sees a concurrent update.
    pub fn weights_for(&self, intent: Intent) -> WeightVector {
        self.states
            .read()
            .get(&intent)
            .map(|state| state.current)
            .unwrap_or_else(|| WeightVector::default_for(intent))
    }

    /// Queue a batch of feedback events and update CTR accounting.
    pub fn observe(&self, events: Vec<FeedbackEvent>) {
        let mut states = self.states.write();
        for event in events {
            let state = states
                .entry(event.record.intent)
                .or_insert_with(|| IntentState::new(WeightVector::default_for(event.record.intent)));

            let success = event.record.rank <= 3
                && matches!(
                    event.record.outcome,
                    FeedbackOutcome::Click
                        | FeedbackOutcome::Copy
                        | FeedbackOutcome::ExplicitPositive
                );
            state.current_window.push(success, self.rollback_window);

            if state.pinned_for > 0 {
                state.pinned_for -= 1;
            } else {
                state.pending.push(event);
            }
        }
    }

    /// Apply every intent's queued batch (if large enough), then run the
    /// rollback check. Called from the background tick.
    pub fn apply_pending(&self) {
        let mut states = self.states.write();
        for (intent, state) in states.iter_mut() {
            self.rollback_check(*intent, state);

            if state.pinned_for > 0 || state.pending.len() < self.min_batch {
                continue;
            }

            let batch = std::mem::take(&mut state.pending);
            let updated = update::apply_batch(&state.current, &batch, &self.params);
            if updated == state.current {
                continue;
            }

            state.history.push_back(state.current);
            while state.history.len() > WEIGHT_HISTORY_LEN {
                state.history.pop_front();
            }
            state.previous_window = std::mem::take(&mut state.current_window);
            state.current = updated;

            info!(
                intent = %intent,
                batch = batch.len(),
                "published updated weight vector"
            );
        }
    }

    /// Roll back to the previous vector when windowed top-3 CTR under
    /// the current vector dropped more than the threshold below the
    /// previous generation's window.
    fn rollback_check(&self, intent: Intent, state: &mut IntentState) {
        let (Some(current_ctr), Some(previous_ctr)) =
            (state.current_window.ctr(), state.previous_window.ctr())
        else {
            return;
        };
        // Don't judge a vector on a handful of trials.
        if state.current_window.trials() < self.min_batch {
            return;
        }
        if previous_ctr - current_ctr <= self.rollback_drop_threshold {
            return;
        }
        let Some(previous) = state.history.pop_back() else {
            return;
        };

        warn!(
            intent = %intent,
            current_ctr,
            previous_ctr,
            "quality regression, rolling back weight vector"
        );
        state.current = previous;
        state.current_window = std::mem::take(&mut state.previous_window);
        state.pending.clear();
        state.pinned_for = ROLLBACK_COOLDOWN_QUERIES;
    }

    /// Number of queued events for an intent (test and telemetry hook).
    pub fn pending_len(&self, intent: Intent) -> usize {
        self.states
            .read()
            .get(&intent)
            .map(|s| s.pending.len())
            .unwrap_or(0)
    }
}
