//! The enhancer's output: query variants plus inferred context.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Context inferred from the user's current file. Empty when no file
/// context was supplied or the context source knows nothing about it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextFeatures {
    /// Path of the current file, when known.
    pub current_file: Option<String>,
    /// Language of the current file, when known.
    pub language: Option<String>,
    /// Imports extracted from the current file by the indexer.
    pub imports: BTreeSet<String>,
    /// Dominant frameworks inferred from those imports.
    pub frameworks: Vec<String>,
    /// Functions/classes defined or referenced in the current file.
    pub functions: Vec<String>,
}

impl ContextFeatures {
    /// Whether any context signal is available at all.
    pub fn is_empty(&self) -> bool {
        self.current_file.is_none()
            && self.language.is_none()
            && self.imports.is_empty()
            && self.frameworks.is_empty()
            && self.functions.is_empty()
    }
}

/// A query after enhancement: ordered variants (first is the original,
/// bounded, distinct case-insensitively) plus normalized tokens and
/// context features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancedQuery {
    /// The original query text, verbatim.
    pub original: String,
    /// Query variants; `variants[0] == original`.
    pub variants: Vec<String>,
    /// Identifier tokens, case-normalized (snake/camel split, lowercased).
    pub tokens: Vec<String>,
    pub context: ContextFeatures,
}

impl EnhancedQuery {
    /// A degenerate enhancement: just the original query, no context.
    /// Used when enhancement is skipped or times out.
    pub fn passthrough(original: impl Into<String>) -> Self {
        let original = original.into();
        Self {
            variants: vec![original.clone()],
            tokens: Vec::new(),
            context: ContextFeatures::default(),
            original,
        }
    }
}
