//! Query enhancement: turn one query into a bounded, ordered set of
//! distinct variants plus normalized tokens and file-context features.
//!
//! The original text is always the first variant. Dedup is
//! case-insensitive and insertion-ordered.

pub mod synonym_expander;
pub mod tokens;

use quarry_core::constants::MAX_QUERY_VARIANTS;
use quarry_core::models::{ContextFeatures, EnhancedQuery, Query};
use quarry_core::traits::FileContextSource;
use quarry_core::Intent;

/// One prefixed variant per intent.
fn intent_prefix_variant(text: &str, intent: Intent) -> String {
    match intent {
        Intent::Implement => format!("implementation of {text}"),
        Intent::Debug => format!("error handling for {text}"),
        Intent::Understand => format!("explanation of {text}"),
        Intent::Refactor => format!("refactoring {text}"),
        Intent::Test => format!("tests for {text}"),
        Intent::Document => format!("documentation for {text}"),
    }
}

/// Enhance a query for retrieval.
///
/// Variant sources, in order: the original, case-convention expansions
/// of multi-word identifiers, the intent prefix, per-framework suffixes
/// from file context, and a synonym expansion. Bounded to
/// `MAX_QUERY_VARIANTS`.
pub fn enhance(
    query: &Query,
    intent: Intent,
    context_source: Option<&dyn FileContextSource>,
) -> EnhancedQuery {
    let original = query.text.clone();
    let mut variants: Vec<String> = vec![original.clone()];

    // (a) Case-convention expansion for each identifier-like token.
    for word in original.split_whitespace() {
        if !tokens::is_multiword_identifier(word) {
            continue;
        }
        for rendering in tokens::case_renderings(word) {
            if rendering != word {
                variants.push(original.replace(word, &rendering));
            }
        }
    }

    // (b) Intent-specific prefix.
    variants.push(intent_prefix_variant(&original, intent));

    // (c) Framework terms from the current file's extracted imports.
    let context = infer_context(query, context_source);
    for framework in &context.frameworks {
        variants.push(format!("{original} {framework}"));
    }

    // Supplementary: code-aware synonym expansion.
    if let Some(expanded) = synonym_expander::expand(&original) {
        variants.push(expanded);
    }

    // (d) Case-insensitive dedup, insertion order preserved, bounded.
    let mut seen: Vec<String> = Vec::new();
    let mut deduped: Vec<String> = Vec::new();
    for variant in variants {
        let key = variant.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            deduped.push(variant);
        }
        if deduped.len() == MAX_QUERY_VARIANTS {
            break;
        }
    }

    EnhancedQuery {
        tokens: tokens::normalize_tokens(&original),
        variants: deduped,
        context,
        original,
    }
}

/// Pull context features for the query's current file, when both the
/// file and a context source are available.
fn infer_context(
    query: &Query,
    context_source: Option<&dyn FileContextSource>,
) -> ContextFeatures {
    let mut features = ContextFeatures {
        current_file: query.current_file.clone(),
        language: query.language.clone(),
        ..ContextFeatures::default()
    };

    if let (Some(file), Some(source)) = (&query.current_file, context_source) {
        if let Some(file_context) = source.context_for(file) {
            features.imports = file_context.imports;
            features.frameworks = file_context.frameworks;
            features.functions = file_context.functions;
            if features.language.is_none() {
                features.language = file_context.language;
            }
        }
    }

    features
}
