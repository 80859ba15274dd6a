//! Reciprocal Rank Fusion: score = Σ 1/(k + rank_i)
//!
//! Combines the strategies' ranked lists into a single fused ranking
//! without normalizing scores across retrieval methods. Per-channel
//! scores are carried on the merged result separately; fusion only
//! orders candidates.

use std::collections::HashMap;

use quarry_core::models::RetrievalResult;

/// Ranked id lists per strategy, 1-based ranks.
#[derive(Debug, Default)]
pub struct StrategyRankings {
    pub keyword: Option<Vec<(String, usize)>>,
    pub vector: Option<Vec<(String, usize)>>,
    pub semantic: Option<Vec<(String, usize)>>,
    pub dependency: Option<Vec<(String, usize)>>,
}

impl StrategyRankings {
    fn lists(&self) -> [Option<&Vec<(String, usize)>>; 4] {
        [
            self.keyword.as_ref(),
            self.vector.as_ref(),
            self.semantic.as_ref(),
            self.dependency.as_ref(),
        ]
    }
}

/// Fuse strategy rankings over the merged document map.
///
/// `k` is the smoothing constant (default 60). Documents unknown to the
/// map are skipped: a ranking entry without a merged result is a bug in
/// the orchestrator, not something fusion can repair.
///
/// The output is ordered by fused score descending, ties broken by
/// document id ascending so the provisional order is reproducible.
pub fn fuse(
    rankings: &StrategyRankings,
    documents: &HashMap<String, RetrievalResult>,
    k: u32,
) -> Vec<RetrievalResult> {
    let mut scores: HashMap<String, f64> = HashMap::new();

    for list in rankings.lists().into_iter().flatten() {
        for (id, rank) in list {
            let rrf = 1.0 / (k as f64 + *rank as f64);
            *scores.entry(id.clone()).or_default() += rrf;
        }
    }

    let mut fused: Vec<RetrievalResult> = scores
        .into_iter()
        .filter_map(|(id, rrf_score)| {
            documents.get(&id).map(|result| {
                let mut result = result.clone();
                result.rrf_score = rrf_score;
                result
            })
        })
        .collect();

    fused.sort_by(|a, b| {
        b.rrf_score
            .total_cmp(&a.rrf_score)
            .then_with(|| a.id.cmp(&b.id))
    });

    fused
}
