//! Response shapes for the wire-agnostic query entry point.

use serde::{Deserialize, Serialize};

use crate::models::factor_vector::{Factor, FactorVector};

/// Why a successful search produced an empty result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoResultsReason {
    /// Every strategy ran (or degraded) and nothing matched.
    NoMatches,
    /// Filters excluded everything that matched.
    FilteredOut,
}

impl NoResultsReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoResultsReason::NoMatches => "no_matches",
            NoResultsReason::FilteredOut => "filtered_out",
        }
    }
}

/// Per-stage wall-clock timings in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimings {
    pub classify_ms: f64,
    pub enhance_ms: f64,
    pub retrieve_ms: f64,
    pub rank_ms: f64,
    pub total_ms: f64,
}

/// One result, shaped per the query's detail level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultView {
    Full {
        id: String,
        repository: String,
        file_path: String,
        language: Option<String>,
        function_name: Option<String>,
        class_name: Option<String>,
        start_line: Option<u32>,
        end_line: Option<u32>,
        snippet: String,
        score: Option<f64>,
        factors: FactorVector,
    },
    Compact {
        id: String,
        file_path: String,
        function_name: Option<String>,
        score: Option<f64>,
        snippet: String,
    },
    /// `"file_path:function_name"`.
    Ultra(String),
}

/// One factor's contribution to a final score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorContribution {
    pub factor: Factor,
    /// Normalized factor value in [0,1].
    pub value: f64,
    pub weight: f64,
    /// `value * weight`.
    pub contribution: f64,
    pub confidence: f64,
}

/// Human-readable ranking rationale for one result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub result_id: String,
    pub final_score: f64,
    /// All eight contributions in canonical factor order.
    pub contributions: Vec<FactorContribution>,
    /// The two factors that contributed most.
    pub dominant: Vec<Factor>,
    /// Code patterns the pattern-match factor detected.
    pub matched_patterns: Vec<String>,
    pub summary: String,
}

/// The full response to a search request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Opaque id for this served query; doubles as the feedback
    /// fingerprint.
    pub query_id: String,
    pub results: Vec<ResultView>,
    /// Present only when `results` is empty and the search itself
    /// succeeded.
    pub no_results_reason: Option<NoResultsReason>,
    /// True when ranking fell back to backend order.
    pub degraded_ranking: bool,
    pub timings: Option<StageTimings>,
    pub explanations: Option<Vec<Explanation>>,
}
