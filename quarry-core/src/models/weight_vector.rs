//! Per-intent blend coefficients for the eight ranking factors.
//!
//! Invariants: every weight within the configured bounds (default
//! [0.05, 0.5]) and the vector sums to 1.0. `normalized` projects onto
//! that constraint set and is idempotent.

use serde::{Deserialize, Serialize};

use crate::intent::Intent;
use crate::models::factor_vector::Factor;

/// Number of ranking factors.
pub const FACTOR_COUNT: usize = 8;

/// Tolerance on the sum-to-one invariant.
pub const SUM_TOLERANCE: f64 = 1e-9;

/// Blend weights in canonical factor order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    pub text_relevance: f64,
    pub semantic_similarity: f64,
    pub context_overlap: f64,
    pub import_similarity: f64,
    pub proximity: f64,
    pub recency: f64,
    pub quality: f64,
    pub pattern_match: f64,
}

impl WeightVector {
    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::TextRelevance => self.text_relevance,
            Factor::SemanticSimilarity => self.semantic_similarity,
            Factor::ContextOverlap => self.context_overlap,
            Factor::ImportSimilarity => self.import_similarity,
            Factor::Proximity => self.proximity,
            Factor::Recency => self.recency,
            Factor::Quality => self.quality,
            Factor::PatternMatch => self.pattern_match,
        }
    }

    pub fn set(&mut self, factor: Factor, weight: f64) {
        match factor {
            Factor::TextRelevance => self.text_relevance = weight,
            Factor::SemanticSimilarity => self.semantic_similarity = weight,
            Factor::ContextOverlap => self.context_overlap = weight,
            Factor::ImportSimilarity => self.import_similarity = weight,
            Factor::Proximity => self.proximity = weight,
            Factor::Recency => self.recency = weight,
            Factor::Quality => self.quality = weight,
            Factor::PatternMatch => self.pattern_match = weight,
        }
    }

    /// Weights in canonical factor order.
    pub fn as_array(&self) -> [f64; FACTOR_COUNT] {
        Factor::ALL.map(|f| self.get(f))
    }

    /// Build from canonical factor order.
    pub fn from_array(values: [f64; FACTOR_COUNT]) -> Self {
        let mut w = Self::balanced();
        for (factor, value) in Factor::ALL.into_iter().zip(values) {
            w.set(factor, value);
        }
        w
    }

    /// Equal weight on every factor.
    pub fn balanced() -> Self {
        let v = 1.0 / FACTOR_COUNT as f64;
        Self::from_raw(v)
    }

    fn from_raw(v: f64) -> Self {
        Self {
            text_relevance: v,
            semantic_similarity: v,
            context_overlap: v,
            import_similarity: v,
            proximity: v,
            recency: v,
            quality: v,
            pattern_match: v,
        }
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    /// Built-in starting weights per intent.
    ///
    /// Each row sums to 1.0 and sits inside the default bounds. Intents
    /// that read code lean on semantic signals; intents that change code
    /// lean on exact matches and local context.
    pub fn default_for(intent: Intent) -> Self {
        let row = match intent {
            Intent::Implement => [0.20, 0.20, 0.10, 0.10, 0.05, 0.10, 0.15, 0.10],
            Intent::Debug => [0.25, 0.15, 0.15, 0.10, 0.15, 0.10, 0.05, 0.05],
            Intent::Understand => [0.15, 0.25, 0.10, 0.05, 0.05, 0.10, 0.20, 0.10],
            Intent::Refactor => [0.15, 0.15, 0.15, 0.10, 0.15, 0.05, 0.15, 0.10],
            Intent::Test => [0.20, 0.15, 0.10, 0.15, 0.10, 0.05, 0.15, 0.10],
            Intent::Document => [0.20, 0.20, 0.10, 0.05, 0.05, 0.15, 0.20, 0.05],
        };
        Self::from_array(row)
    }

    /// Project onto the set of valid vectors: every weight in [lo, hi],
    /// sum exactly 1.0 (within `SUM_TOLERANCE`).
    ///
    /// Excess or deficit is redistributed proportionally to each weight's
    /// distance from the bound it would move toward, so a single pass
    /// cannot push any weight out of bounds. Idempotent: a vector already
    /// satisfying the invariants is returned unchanged.
    pub fn normalized(&self, lo: f64, hi: f64) -> Self {
        let mut w = self.as_array();
        for v in &mut w {
            if !v.is_finite() {
                *v = lo;
            }
        }

        for _ in 0..=FACTOR_COUNT {
            for v in &mut w {
                *v = v.clamp(lo, hi);
            }
            let excess: f64 = w.iter().sum::<f64>() - 1.0;
            if excess.abs() <= SUM_TOLERANCE {
                break;
            }
            if excess > 0.0 {
                let headroom: f64 = w.iter().map(|v| v - lo).sum();
                if headroom <= 0.0 {
                    break;
                }
                for v in &mut w {
                    *v -= excess * (*v - lo) / headroom;
                }
            } else {
                let headroom: f64 = w.iter().map(|v| hi - v).sum();
                if headroom <= 0.0 {
                    break;
                }
                for v in &mut w {
                    *v += (-excess) * (hi - *v) / headroom;
                }
            }
        }

        Self::from_array(w)
    }

    /// Check both invariants against the given bounds.
    pub fn is_valid(&self, lo: f64, hi: f64) -> bool {
        let w = self.as_array();
        w.iter().all(|v| v.is_finite() && *v >= lo && *v <= hi)
            && (self.sum() - 1.0).abs() <= SUM_TOLERANCE
    }
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::balanced()
    }
}
