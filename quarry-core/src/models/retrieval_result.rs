//! One candidate returned by the retrieval orchestrator.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::backend::{BackendHit, DocumentPayload};

/// A highlighted span within the snippet, in byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
}

/// Optional code-quality signals the indexer may have attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualitySignals {
    /// Fraction of lines covered by tests, in [0,1].
    pub test_coverage: Option<f64>,
    /// Normalized cyclomatic complexity, in [0,1] (1 = worst).
    pub complexity: Option<f64>,
    pub has_docstring: Option<bool>,
    pub has_tests: Option<bool>,
}

impl QualitySignals {
    /// How many of the four sub-signals are present.
    pub fn present_count(&self) -> usize {
        [
            self.test_coverage.is_some(),
            self.complexity.is_some(),
            self.has_docstring.is_some(),
            self.has_tests.is_some(),
        ]
        .iter()
        .filter(|p| **p)
        .count()
    }
}

/// A merged retrieval candidate. Created by the orchestrator from one or
/// more strategy hits; immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// Stable document id.
    pub id: String,
    pub repository: String,
    pub file_path: String,
    pub function_name: Option<String>,
    pub class_name: Option<String>,
    pub language: Option<String>,
    pub snippet: String,
    pub start_line: Option<u32>,
    pub end_line: Option<u32>,
    pub highlights: Vec<HighlightSpan>,
    /// Best keyword (BM25) score across strategies; 0.0 when never seen
    /// by the keyword strategy.
    pub keyword_score: f64,
    /// Best vector-similarity score, when the vector strategy saw it.
    pub vector_score: Option<f64>,
    /// Best semantic-mode score, when the semantic strategy saw it.
    pub semantic_score: Option<f64>,
    pub last_modified: Option<DateTime<Utc>>,
    pub imports: BTreeSet<String>,
    pub identifiers: BTreeSet<String>,
    pub quality: QualitySignals,
    /// Fused RRF score from the orchestrator; provisional ordering only.
    pub rrf_score: f64,
}

impl RetrievalResult {
    /// Build from a single backend hit; channel scores start empty and the
    /// orchestrator fills them as strategies report.
    pub fn from_payload(id: String, payload: DocumentPayload) -> Self {
        Self {
            id,
            repository: payload.repository,
            file_path: payload.file_path,
            function_name: payload.function_name,
            class_name: payload.class_name,
            language: payload.language,
            snippet: payload.snippet,
            start_line: payload.start_line,
            end_line: payload.end_line,
            highlights: payload.highlights,
            keyword_score: 0.0,
            vector_score: None,
            semantic_score: None,
            last_modified: payload.last_modified,
            imports: payload.imports,
            identifiers: payload.identifiers,
            quality: payload.quality,
            rrf_score: 0.0,
        }
    }

    /// Build from a hit, ignoring the channel the score came from.
    pub fn from_hit(hit: BackendHit) -> Self {
        Self::from_payload(hit.id, hit.fields)
    }
}
