//! The weight update rule.
//!
//! Rewards are apportioned across factors in proportion to the factor
//! values of the result the feedback refers to; a factor that contributed
//! more to the result's rank receives a larger share. One batch produces
//! one EMA step per factor, with the change clamped to the per-update cap
//! even after renormalization.

use quarry_core::models::{FactorVector, FeedbackRecord, WeightVector, FACTOR_COUNT};
use quarry_core::models::weight_vector::SUM_TOLERANCE;
use quarry_core::models::FeedbackOutcome;

/// A feedback record paired with the factor values of the result it
/// refers to, when the served-results registry still remembers them.
#[derive(Debug, Clone)]
pub struct FeedbackEvent {
    pub record: FeedbackRecord,
    pub factors: Option<FactorVector>,
}

/// Tuning knobs for one update step, taken from configuration.
#[derive(Debug, Clone, Copy)]
pub struct UpdateParams {
    pub eta: f64,
    pub delta_cap: f64,
    pub weight_min: f64,
    pub weight_max: f64,
}

/// Reward signal for one feedback record.
pub fn reward_for(outcome: FeedbackOutcome, rank: u32) -> f64 {
    match outcome {
        FeedbackOutcome::Click if rank <= 3 => 0.3,
        FeedbackOutcome::Click if rank <= 5 => 0.1,
        FeedbackOutcome::Click => 0.0,
        FeedbackOutcome::Copy => 0.5,
        FeedbackOutcome::NoClick => -0.05,
        FeedbackOutcome::ExplicitPositive => 0.5,
        FeedbackOutcome::ExplicitNegative => -0.5,
    }
}

/// Apply one batch of feedback to a weight vector.
///
/// Returns the current vector unchanged when no event in the batch has
/// factor values to attribute to.
pub fn apply_batch(
    current: &WeightVector,
    events: &[FeedbackEvent],
    params: &UpdateParams,
) -> WeightVector {
    // Mean reward term per factor across the batch.
    let mut terms = [0.0f64; FACTOR_COUNT];
    let mut attributed = 0usize;

    for event in events {
        let Some(factors) = &event.factors else {
            continue;
        };
        let reward = reward_for(event.record.outcome, event.record.rank);
        let values = factors.values();
        let total: f64 = values.iter().sum();

        if total > 0.0 {
            for (term, value) in terms.iter_mut().zip(values) {
                *term += reward * value / total;
            }
        } else {
            // Nothing to attribute to: split evenly.
            for term in &mut terms {
                *term += reward / FACTOR_COUNT as f64;
            }
        }
        attributed += 1;
    }

    if attributed == 0 {
        return *current;
    }
    for term in &mut terms {
        *term /= attributed as f64;
    }

    // One EMA step per factor, pre-capped.
    let original = current.as_array();
    let mut stepped = [0.0f64; FACTOR_COUNT];
    for i in 0..FACTOR_COUNT {
        let delta = (params.eta * (terms[i] - original[i]))
            .clamp(-params.delta_cap, params.delta_cap);
        stepped[i] = original[i] + delta;
    }

    // Renormalize inside both the global bounds and the per-update
    // delta box, so the cap holds even after the sum is restored.
    let mut lo = [0.0f64; FACTOR_COUNT];
    let mut hi = [0.0f64; FACTOR_COUNT];
    for i in 0..FACTOR_COUNT {
        lo[i] = params.weight_min.max(original[i] - params.delta_cap);
        hi[i] = params.weight_max.min(original[i] + params.delta_cap);
    }

    WeightVector::from_array(project(stepped, lo, hi))
}

/// Project onto {Σ = 1} ∩ Π[lo_i, hi_i] by proportional redistribution.
/// Feasible whenever Σlo ≤ 1 ≤ Σhi, which holds for any normalized
/// starting vector and positive delta cap.
fn project(
    mut w: [f64; FACTOR_COUNT],
    lo: [f64; FACTOR_COUNT],
    hi: [f64; FACTOR_COUNT],
) -> [f64; FACTOR_COUNT] {
    for _ in 0..=FACTOR_COUNT {
        for i in 0..FACTOR_COUNT {
            w[i] = w[i].clamp(lo[i], hi[i]);
        }
        let excess: f64 = w.iter().sum::<f64>() - 1.0;
        if excess.abs() <= SUM_TOLERANCE {
            break;
        }
        if excess > 0.0 {
            let headroom: f64 = w.iter().zip(&lo).map(|(v, l)| v - l).sum();
            if headroom <= 0.0 {
                break;
            }
            for i in 0..FACTOR_COUNT {
                w[i] -= excess * (w[i] - lo[i]) / headroom;
            }
        } else {
            let headroom: f64 = w.iter().zip(&hi).map(|(v, h)| h - v).sum();
            if headroom <= 0.0 {
                break;
            }
            for i in 0..FACTOR_COUNT {
                w[i] += (-excess) * (hi[i] - w[i]) / headroom;
            }
        }
    }
    w
}
