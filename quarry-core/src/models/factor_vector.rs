//! The eight ranking factors and their per-result scores.

use serde::{Deserialize, Serialize};

use crate::errors::RankingError;

/// One of the eight ranking factors, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    TextRelevance,
    SemanticSimilarity,
    ContextOverlap,
    ImportSimilarity,
    Proximity,
    Recency,
    Quality,
    PatternMatch,
}

impl Factor {
    /// Canonical factor order. Weight vectors, blending, and the wire
    /// format all follow this order.
    pub const ALL: [Factor; 8] = [
        Factor::TextRelevance,
        Factor::SemanticSimilarity,
        Factor::ContextOverlap,
        Factor::ImportSimilarity,
        Factor::Proximity,
        Factor::Recency,
        Factor::Quality,
        Factor::PatternMatch,
    ];

    /// Stable snake_case name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Factor::TextRelevance => "text_relevance",
            Factor::SemanticSimilarity => "semantic_similarity",
            Factor::ContextOverlap => "context_overlap",
            Factor::ImportSimilarity => "import_similarity",
            Factor::Proximity => "proximity",
            Factor::Recency => "recency",
            Factor::Quality => "quality",
            Factor::PatternMatch => "pattern_match",
        }
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A factor value with the confidence of the signal that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    pub value: f64,
    pub confidence: f64,
}

impl FactorScore {
    pub fn new(value: f64, confidence: f64) -> Self {
        Self { value, confidence }
    }

    /// A zero-value score carrying no signal.
    pub fn absent() -> Self {
        Self {
            value: 0.0,
            confidence: 0.0,
        }
    }
}

impl Default for FactorScore {
    fn default() -> Self {
        Self::absent()
    }
}

/// All eight factor scores for one result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorVector {
    pub text_relevance: FactorScore,
    pub semantic_similarity: FactorScore,
    pub context_overlap: FactorScore,
    pub import_similarity: FactorScore,
    pub proximity: FactorScore,
    pub recency: FactorScore,
    pub quality: FactorScore,
    pub pattern_match: FactorScore,
}

impl FactorVector {
    pub fn get(&self, factor: Factor) -> FactorScore {
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

    pub fn set(&mut self, factor: Factor, score: FactorScore) {
        match factor {
            Factor::TextRelevance => self.text_relevance = score,
            Factor::SemanticSimilarity => self.semantic_similarity = score,
            Factor::ContextOverlap => self.context_overlap = score,
            Factor::ImportSimilarity => self.import_similarity = score,
            Factor::Proximity => self.proximity = score,
            Factor::Recency => self.recency = score,
            Factor::Quality => self.quality = score,
            Factor::PatternMatch => self.pattern_match = score,
        }
    }

    /// Factor values in canonical order.
    pub fn values(&self) -> [f64; 8] {
        Factor::ALL.map(|f| self.get(f).value)
    }

    /// Every value and confidence must be finite and in [0,1].
    /// A violation is a programming error, never silently repaired.
    pub fn validate(&self, document_id: &str) -> Result<(), RankingError> {
        for factor in Factor::ALL {
            let score = self.get(factor);
            for v in [score.value, score.confidence] {
                if !v.is_finite() {
                    return Err(RankingError::NonFinite {
                        document_id: document_id.to_string(),
                        factor: factor.as_str(),
                    });
                }
                if !(0.0..=1.0).contains(&v) {
                    return Err(RankingError::OutOfBounds {
                        document_id: document_id.to_string(),
                        factor: factor.as_str(),
                        value: v,
                    });
                }
            }
        }
        Ok(())
    }
}
