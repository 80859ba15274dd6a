//! Raw factor computation (8 factors).
//!
//! Factors: text relevance, semantic similarity, context overlap, import
//! similarity, file proximity, recency, quality, pattern match. Raw
//! values here are pre-normalization: text relevance and recency carry
//! backend scores and timestamps verbatim, everything else is already in
//! [0,1]. Non-finite inputs raise immediately.

use std::collections::BTreeSet;

use quarry_core::errors::RankingError;
use quarry_core::models::{EnhancedQuery, RetrievalResult};

use crate::ranking::patterns::{self, PatternMatches};

/// Per-factor confidence constants.
pub(crate) mod confidence {
    pub const TEXT: f64 = 1.0;
    pub const SEMANTIC_COSINE: f64 = 1.0;
    pub const SEMANTIC_JACCARD: f64 = 0.6;
    pub const CONTEXT: f64 = 0.9;
    pub const IMPORT: f64 = 0.9;
    pub const PROXIMITY: f64 = 0.8;
    pub const RECENCY: f64 = 0.9;
    pub const PATTERN: f64 = 0.7;
}

/// Raw, pre-normalization scores for one candidate.
#[derive(Debug, Clone)]
pub(crate) struct RawScores {
    pub text: f64,
    pub semantic: f64,
    pub semantic_confidence: f64,
    pub context: f64,
    pub context_confidence: f64,
    pub import: f64,
    pub proximity: f64,
    /// Last-modified as epoch seconds; `None` when unknown.
    pub recency: Option<f64>,
    pub quality: f64,
    pub quality_confidence: f64,
    pub pattern: f64,
    pub matched_patterns: Vec<String>,
}

/// Compute raw scores for one candidate.
pub(crate) fn compute(
    candidate: &RetrievalResult,
    enhanced: &EnhancedQuery,
    scan_bytes: usize,
) -> Result<RawScores, RankingError> {
    // Factor 1: text relevance — the keyword (BM25) channel, normalized
    // against the candidate set later.
    let text = candidate.keyword_score;

    // Factor 2: semantic similarity — backend cosine when the vector
    // strategy saw this document, token Jaccard otherwise.
    let (semantic, semantic_confidence) = match candidate.vector_score {
        Some(cosine) => (cosine, confidence::SEMANTIC_COSINE),
        None => {
            let query_tokens: BTreeSet<&str> =
                enhanced.tokens.iter().map(String::as_str).collect();
            let candidate_tokens: BTreeSet<&str> =
                candidate.identifiers.iter().map(String::as_str).collect();
            (
                jaccard(&query_tokens, &candidate_tokens),
                confidence::SEMANTIC_JACCARD,
            )
        }
    };

    // Factor 3: context overlap — only when file context exists.
    let (context, context_confidence) = if enhanced.context.is_empty() {
        (0.0, 0.0)
    } else {
        (context_overlap(candidate, enhanced), confidence::CONTEXT)
    };

    // Factor 4: import similarity — Jaccard over the imports sets.
    let context_imports: BTreeSet<&str> = enhanced
        .context
        .imports
        .iter()
        .map(String::as_str)
        .collect();
    let candidate_imports: BTreeSet<&str> =
        candidate.imports.iter().map(String::as_str).collect();
    let import = jaccard(&context_imports, &candidate_imports);

    // Factor 5: proximity — discrete scale with logarithmic dampening.
    let proximity = proximity_score(
        enhanced.context.current_file.as_deref(),
        &candidate.file_path,
    );

    // Factor 6: recency — raw timestamp, min-maxed later; unknown stays
    // unknown and normalizes to 0.5.
    let recency = candidate.last_modified.map(|t| t.timestamp() as f64);

    // Factor 7: quality — weighted sub-signals, confidence is the
    // fraction of signals present.
    let (quality, quality_confidence) = quality_score(candidate);

    // Factor 8: pattern match — detector registry over the snippet prefix.
    let PatternMatches {
        score: pattern,
        matched: matched_patterns,
    } = patterns::detect(&enhanced.tokens, &candidate.snippet, scan_bytes);

    let raw = RawScores {
        text,
        semantic,
        semantic_confidence,
        context,
        context_confidence,
        import,
        proximity,
        recency,
        quality,
        quality_confidence,
        pattern,
        matched_patterns,
    };
    validate_finite(&raw, &candidate.id)?;
    Ok(raw)
}

fn validate_finite(raw: &RawScores, document_id: &str) -> Result<(), RankingError> {
    let checks = [
        (raw.text, "text_relevance"),
        (raw.semantic, "semantic_similarity"),
        (raw.context, "context_overlap"),
        (raw.import, "import_similarity"),
        (raw.proximity, "proximity"),
        (raw.recency.unwrap_or(0.0), "recency"),
        (raw.quality, "quality"),
        (raw.pattern, "pattern_match"),
    ];
    for (value, factor) in checks {
        if !value.is_finite() {
            return Err(RankingError::NonFinite {
                document_id: document_id.to_string(),
                factor,
            });
        }
    }
    Ok(())
}

/// Jaccard coefficient; empty-over-empty is 0, not a division by zero.
fn jaccard(a: &BTreeSet<&str>, b: &BTreeSet<&str>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// 0.3·imports + 0.3·function usage + 0.2·framework + 0.2·language.
fn context_overlap(candidate: &RetrievalResult, enhanced: &EnhancedQuery) -> f64 {
    let context = &enhanced.context;

    let context_imports: BTreeSet<&str> =
        context.imports.iter().map(String::as_str).collect();
    let candidate_imports: BTreeSet<&str> =
        candidate.imports.iter().map(String::as_str).collect();
    let imports_overlap = jaccard(&context_imports, &candidate_imports);

    let usage = if context.functions.is_empty() {
        0.0
    } else {
        let matched = context
            .functions
            .iter()
            .filter(|name| {
                candidate.identifiers.contains(*name)
                    || candidate.function_name.as_deref() == Some(name.as_str())
                    || candidate.class_name.as_deref() == Some(name.as_str())
            })
            .count();
        matched as f64 / context.functions.len() as f64
    };

    let framework = if context.frameworks.iter().any(|fw| {
        let fw = fw.to_lowercase();
        candidate
            .imports
            .iter()
            .any(|import| import.to_lowercase().contains(&fw))
    }) {
        1.0
    } else {
        0.0
    };

    let language = match (&context.language, &candidate.language) {
        (Some(a), Some(b)) if a.eq_ignore_ascii_case(b) => 1.0,
        _ => 0.0,
    };

    0.3 * imports_overlap + 0.3 * usage + 0.2 * framework + 0.2 * language
}

/// Discrete proximity then logarithmic dampening: log(1 + s·4)/log(5).
/// Same file 1.0, same directory 0.7, same module 0.5, same top-level
/// tree 0.3, anything else 0.
fn proximity_score(current_file: Option<&str>, candidate_path: &str) -> f64 {
    let Some(current) = current_file else {
        return 0.0;
    };

    let discrete: f64 = if current == candidate_path {
        1.0
    } else if parent(current) == parent(candidate_path) {
        0.7
    } else if components(current, 2) == components(candidate_path, 2) {
        0.5
    } else if components(current, 1) == components(candidate_path, 1) {
        0.3
    } else {
        0.0
    };

    (1.0 + discrete * 4.0).ln() / 5f64.ln()
}

fn parent(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

fn components(path: &str, n: usize) -> Vec<&str> {
    path.split('/').take(n).collect()
}

/// 0.3·coverage + 0.2·(1 − complexity) + 0.2·docstring + 0.1·has_tests.
/// The remaining 0.2 of the scale is reserved; missing signals simply
/// contribute nothing. Confidence is the fraction of signals present.
fn quality_score(candidate: &RetrievalResult) -> (f64, f64) {
    let signals = &candidate.quality;
    let mut score = 0.0;

    if let Some(coverage) = signals.test_coverage {
        score += 0.3 * coverage.clamp(0.0, 1.0);
    }
    if let Some(complexity) = signals.complexity {
        score += 0.2 * (1.0 - complexity.clamp(0.0, 1.0));
    }
    if signals.has_docstring == Some(true) {
        score += 0.2;
    }
    if signals.has_tests == Some(true) {
        score += 0.1;
    }

    (score, signals.present_count() as f64 / 4.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_core::models::{ContextFeatures, DocumentPayload, QualitySignals};

    fn candidate(id: &str) -> RetrievalResult {
        RetrievalResult::from_payload(id.to_string(), DocumentPayload::default())
    }

    fn enhanced(text: &str) -> EnhancedQuery {
        EnhancedQuery::passthrough(text)
    }

    #[test]
    fn jaccard_of_disjoint_sets_is_zero() {
        let a: BTreeSet<&str> = ["x"].into();
        let b: BTreeSet<&str> = ["y"].into();
        assert_eq!(jaccard(&a, &b), 0.0);
        assert_eq!(jaccard(&BTreeSet::new(), &b), 0.0);
    }

    #[test]
    fn semantic_falls_back_to_jaccard_with_lower_confidence() {
        let mut c = candidate("a");
        c.identifiers = ["parse".to_string(), "json".to_string()].into();
        let mut e = enhanced("parse json");
        e.tokens = vec!["parse".to_string(), "json".to_string()];

        let raw = compute(&c, &e, 10_240).unwrap();
        assert_eq!(raw.semantic_confidence, confidence::SEMANTIC_JACCARD);
        assert!((raw.semantic - 1.0).abs() < 1e-12);

        c.vector_score = Some(0.42);
        let raw = compute(&c, &e, 10_240).unwrap();
        assert_eq!(raw.semantic_confidence, confidence::SEMANTIC_COSINE);
        assert!((raw.semantic - 0.42).abs() < 1e-12);
    }

    #[test]
    fn empty_context_zeroes_overlap_and_confidence() {
        let raw = compute(&candidate("a"), &enhanced("anything"), 10_240).unwrap();
        assert_eq!(raw.context, 0.0);
        assert_eq!(raw.context_confidence, 0.0);
    }

    #[test]
    fn proximity_scale_dampens_logarithmically() {
        let same_file = proximity_score(Some("src/db/pool.rs"), "src/db/pool.rs");
        let same_dir = proximity_score(Some("src/db/pool.rs"), "src/db/conn.rs");
        let same_module = proximity_score(Some("src/db/pool.rs"), "src/db/inner/conn.rs");
        let same_tree = proximity_score(Some("src/db/pool.rs"), "src/api/routes.rs");
        let elsewhere = proximity_score(Some("src/db/pool.rs"), "vendor/lib.rs");

        assert!((same_file - 1.0).abs() < 1e-12);
        assert!(same_file > same_dir);
        assert!(same_dir > same_module);
        assert!(same_module > same_tree);
        assert_eq!(elsewhere, 0.0);
        assert_eq!(proximity_score(None, "src/db/pool.rs"), 0.0);
    }

    #[test]
    fn quality_confidence_tracks_present_signals() {
        let mut c = candidate("a");
        c.quality = QualitySignals {
            test_coverage: Some(1.0),
            complexity: Some(0.0),
            has_docstring: Some(true),
            has_tests: Some(true),
        };
        let raw = compute(&c, &enhanced("x"), 10_240).unwrap();
        assert!((raw.quality - 0.8).abs() < 1e-12);
        assert_eq!(raw.quality_confidence, 1.0);

        c.quality = QualitySignals {
            test_coverage: Some(0.5),
            ..QualitySignals::default()
        };
        let raw = compute(&c, &enhanced("x"), 10_240).unwrap();
        assert_eq!(raw.quality_confidence, 0.25);
    }

    #[test]
    fn non_finite_backend_score_raises() {
        let mut c = candidate("a");
        c.keyword_score = f64::NAN;
        let err = compute(&c, &enhanced("x"), 10_240).unwrap_err();
        assert!(matches!(err, RankingError::NonFinite { .. }));
    }

    #[test]
    fn context_overlap_components_sum() {
        let mut c = candidate("a");
        c.imports = ["django.db".to_string()].into();
        c.identifiers = ["save_user".to_string()].into();
        c.language = Some("python".to_string());

        let mut e = enhanced("save user");
        e.context = ContextFeatures {
            current_file: Some("app/models.py".to_string()),
            language: Some("python".to_string()),
            imports: ["django.db".to_string()].into(),
            frameworks: vec!["django".to_string()],
            functions: vec!["save_user".to_string()],
        };

        let raw = compute(&c, &e, 10_240).unwrap();
        // All four components hit: 0.3 + 0.3 + 0.2 + 0.2.
        assert!((raw.context - 1.0).abs() < 1e-12);
        assert_eq!(raw.context_confidence, confidence::CONTEXT);
    }
}
