//! RankingPipeline: raw scores → column normalization → blend → sort.
//!
//! Deterministic for a fixed candidate set and weight vector. The weight
//! snapshot is taken by the caller once per request, so a concurrent
//! weight update can never mutate a ranking mid-computation.

pub mod normalize;
pub mod patterns;
pub mod scorer;

use rayon::prelude::*;

use quarry_core::constants::PARALLEL_RANK_THRESHOLD;
use quarry_core::errors::RankingError;
use quarry_core::models::weight_vector::SUM_TOLERANCE;
use quarry_core::models::{EnhancedQuery, RankedResult, RetrievalResult, WeightVector};
use quarry_core::Factor;

use scorer::RawScores;

/// The 8-factor ranking engine.
pub struct RankingPipeline {
    /// Snippet bytes scanned by the pattern-match detectors.
    scan_bytes: usize,
}

impl RankingPipeline {
    pub fn new(scan_bytes: usize) -> Self {
        Self { scan_bytes }
    }

    /// Rank candidates with the given weight snapshot.
    ///
    /// Sort order: blended score desc, text relevance desc, recency desc,
    /// document id asc. Reproducible across runs by construction.
    pub fn rank(
        &self,
        candidates: &[RetrievalResult],
        enhanced: &EnhancedQuery,
        weights: &WeightVector,
    ) -> Result<Vec<RankedResult>, RankingError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        // Factor computation per candidate is independent; parallelize
        // only when the set is large enough to pay for it.
        let raws: Vec<RawScores> = if candidates.len() > PARALLEL_RANK_THRESHOLD {
            candidates
                .par_iter()
                .map(|c| scorer::compute(c, enhanced, self.scan_bytes))
                .collect::<Result<_, _>>()?
        } else {
            candidates
                .iter()
                .map(|c| scorer::compute(c, enhanced, self.scan_bytes))
                .collect::<Result<_, _>>()?
        };

        let factor_vectors = normalize::normalize(&raws);

        let mut ranked: Vec<RankedResult> = Vec::with_capacity(candidates.len());
        for ((candidate, factors), raw) in candidates.iter().zip(factor_vectors).zip(raws) {
            factors.validate(&candidate.id)?;

            let score: f64 = Factor::ALL
                .into_iter()
                .map(|f| weights.get(f) * factors.get(f).value)
                .sum();
            // Weights sum to 1.0 only within SUM_TOLERANCE, so a
            // candidate at the column max on every factor can blend to
            // 1.0 plus dust. Tolerate the dust and clamp; reject only a
            // genuine bound violation.
            if !score.is_finite()
                || score < -SUM_TOLERANCE
                || score > 1.0 + SUM_TOLERANCE
            {
                return Err(RankingError::OutOfBounds {
                    document_id: candidate.id.clone(),
                    factor: "blended",
                    value: score,
                });
            }
            let score = score.clamp(0.0, 1.0);

            ranked.push(RankedResult {
                result: candidate.clone(),
                score: Some(score),
                factors,
                matched_patterns: raw.matched_patterns,
                tie_break_rank: 0,
            });
        }

        ranked.sort_by(|a, b| {
            let a_score = a.score.unwrap_or(0.0);
            let b_score = b.score.unwrap_or(0.0);
            b_score
                .total_cmp(&a_score)
                .then_with(|| {
                    b.factors
                        .text_relevance
                        .value
                        .total_cmp(&a.factors.text_relevance.value)
                })
                .then_with(|| b.factors.recency.value.total_cmp(&a.factors.recency.value))
                .then_with(|| a.result.id.cmp(&b.result.id))
        });

        for (index, result) in ranked.iter_mut().enumerate() {
            result.tie_break_rank = (index + 1) as u32;
        }

        Ok(ranked)
    }

    /// Backend-order fallback used when ranking fails: candidates keep
    /// their fused order and carry no blended score.
    pub fn backend_order(candidates: &[RetrievalResult]) -> Vec<RankedResult> {
        candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| RankedResult {
                result: candidate.clone(),
                score: None,
                factors: Default::default(),
                matched_patterns: Vec::new(),
                tie_break_rank: (index + 1) as u32,
            })
            .collect()
    }
}
