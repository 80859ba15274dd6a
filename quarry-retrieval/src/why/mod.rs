//! Explanation formatting: why did a result rank where it did?
//!
//! Pure function over a ranked result and the weight snapshot that
//! produced it. The contribution sum reproduces the blended score
//! exactly, so explanations can be recomputed from a cached response at
//! any time.

use quarry_core::models::{Explanation, FactorContribution, RankedResult, WeightVector};
use quarry_core::{Factor, Intent};

/// Build the structured explanation for one ranked result.
pub fn explain(ranked: &RankedResult, weights: &WeightVector, intent: Intent) -> Explanation {
    let contributions: Vec<FactorContribution> = Factor::ALL
        .into_iter()
        .map(|factor| {
            let score = ranked.factors.get(factor);
            let weight = weights.get(factor);
            FactorContribution {
                factor,
                value: score.value,
                weight,
                contribution: score.value * weight,
                confidence: score.confidence,
            }
        })
        .collect();

    let final_score: f64 = contributions.iter().map(|c| c.contribution).sum();

    // Dominant two factors by contribution; id-stable on exact ties via
    // canonical factor order.
    let mut by_contribution: Vec<&FactorContribution> = contributions.iter().collect();
    by_contribution.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));
    let dominant: Vec<Factor> = by_contribution.iter().take(2).map(|c| c.factor).collect();

    let summary = summarize(ranked, &dominant, intent);

    Explanation {
        result_id: ranked.result.id.clone(),
        final_score,
        contributions,
        dominant,
        matched_patterns: ranked.matched_patterns.clone(),
        summary,
    }
}

fn summarize(ranked: &RankedResult, dominant: &[Factor], intent: Intent) -> String {
    let leaders = dominant
        .iter()
        .map(Factor::as_str)
        .collect::<Vec<_>>()
        .join(" and ");

    let mut summary = format!(
        "ranked #{} for {} mainly by {}",
        ranked.tie_break_rank, intent, leaders
    );
    if !ranked.matched_patterns.is_empty() {
        summary.push_str(&format!(
            "; matched patterns: {}",
            ranked.matched_patterns.join(", ")
        ));
    }
    summary
}
