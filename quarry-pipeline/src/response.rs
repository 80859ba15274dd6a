//! Response shaping: sealed pipeline output → wire response per detail
//! level, with optional timings and on-demand explanations.

use quarry_core::models::{DetailLevel, Explanation, Query, RankedResult, ResultView,
    SearchResponse, StageTimings};
use quarry_retrieval::why;

use crate::cache::SealedResponse;

/// Shape a sealed response for one request.
///
/// Explanations are recomputed here from the sealed factors and weight
/// snapshot; they are never stored in the cache.
pub fn shape(sealed: &SealedResponse, query: &Query, timings: Option<StageTimings>) -> SearchResponse {
    let shown: Vec<&RankedResult> = sealed.ranked.iter().take(query.max_results).collect();

    let results = shown.iter().map(|r| view(r, query.detail)).collect();

    let explanations: Option<Vec<Explanation>> = (query.include_explanations
        && !sealed.degraded_ranking)
        .then(|| {
            shown
                .iter()
                .map(|r| why::explain(r, &sealed.weights, sealed.intent))
                .collect()
        });

    SearchResponse {
        query_id: sealed.query_id.clone(),
        results,
        no_results_reason: sealed.no_results_reason,
        degraded_ranking: sealed.degraded_ranking,
        timings,
        explanations,
    }
}

fn view(ranked: &RankedResult, detail: DetailLevel) -> ResultView {
    let r = &ranked.result;
    match detail {
        DetailLevel::Full => ResultView::Full {
            id: r.id.clone(),
            repository: r.repository.clone(),
            file_path: r.file_path.clone(),
            language: r.language.clone(),
            function_name: r.function_name.clone(),
            class_name: r.class_name.clone(),
            start_line: r.start_line,
            end_line: r.end_line,
            snippet: r.snippet.clone(),
            score: ranked.score,
            factors: ranked.factors.clone(),
        },
        DetailLevel::Compact => ResultView::Compact {
            id: r.id.clone(),
            file_path: r.file_path.clone(),
            function_name: r.function_name.clone(),
            score: ranked.score,
            snippet: r.snippet.lines().next().unwrap_or("").to_string(),
        },
        DetailLevel::Ultra => ResultView::Ultra(match &r.function_name {
            Some(function) => format!("{}:{}", r.file_path, function),
            None => r.file_path.clone(),
        }),
    }
}
