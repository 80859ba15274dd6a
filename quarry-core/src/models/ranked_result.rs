//! A retrieval candidate after ranking.

use serde::{Deserialize, Serialize};

use crate::models::factor_vector::FactorVector;
use crate::models::retrieval_result::RetrievalResult;

/// A candidate with its blended score and factor breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    pub result: RetrievalResult,
    /// Blended score in [0,1]. `None` when ranking fell back to backend
    /// order and no blend was computed.
    pub score: Option<f64>,
    pub factors: FactorVector,
    /// Code patterns the pattern_match factor detected.
    pub matched_patterns: Vec<String>,
    /// 1-based position after the deterministic tie-break sort.
    pub tie_break_rank: u32,
}
