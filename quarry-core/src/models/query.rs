//! The immutable per-request query record.

use serde::{Deserialize, Serialize};

use crate::constants::MAX_QUERY_BYTES;
use crate::errors::{QuarryError, QuarryResult};
use crate::intent::Intent;

/// How much of each result the response carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailLevel {
    #[default]
    Full,
    Compact,
    Ultra,
}

/// A search request. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    /// Natural-language query text.
    pub text: String,
    /// File the user is currently editing, if known.
    pub current_file: Option<String>,
    /// Language of the current file, if known.
    pub language: Option<String>,
    /// Restrict results to one repository.
    pub repository: Option<String>,
    /// Explicit intent; skips classification when present.
    pub intent: Option<Intent>,
    /// Maximum results to return.
    pub max_results: usize,
    /// Response shape.
    pub detail: DetailLevel,
    /// Keyword-only retrieval; vector and semantic strategies are skipped.
    pub bm25_only: bool,
    /// Bypass the result cache for this request.
    pub disable_cache: bool,
    /// Issue follow-up calls for callers/callees of top results.
    pub include_dependencies: bool,
    /// Attach per-stage timings to the response.
    pub include_timings: bool,
    /// Attach per-result ranking explanations to the response.
    pub include_explanations: bool,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            text: String::new(),
            current_file: None,
            language: None,
            repository: None,
            intent: None,
            max_results: 10,
            detail: DetailLevel::default(),
            bm25_only: false,
            disable_cache: false,
            include_dependencies: false,
            include_timings: false,
            include_explanations: false,
        }
    }
}

impl Query {
    /// A query with the given text and every other field defaulted.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Reject queries the pipeline must not run.
    pub fn validate(&self) -> QuarryResult<()> {
        if self.text.trim().is_empty() {
            return Err(QuarryError::InvalidQuery {
                reason: "query text is empty".into(),
            });
        }
        if self.text.len() > MAX_QUERY_BYTES {
            return Err(QuarryError::InvalidQuery {
                reason: format!(
                    "query text exceeds {MAX_QUERY_BYTES} bytes ({})",
                    self.text.len()
                ),
            });
        }
        if self.max_results == 0 {
            return Err(QuarryError::InvalidQuery {
                reason: "max_results must be positive".into(),
            });
        }
        if let Some(repo) = &self.repository {
            if repo.is_empty() || repo.chars().any(char::is_control) {
                return Err(QuarryError::InvalidQuery {
                    reason: "repository filter is empty or contains control characters".into(),
                });
            }
        }
        Ok(())
    }
}
