//! JSON bodies for the backend's three search modes.

use serde::{Deserialize, Serialize};

use quarry_core::models::BackendHit;

/// Body for `POST /search/keyword` and the semantic fallback path.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordBody<'a> {
    pub query: &'a str,
    pub top_k: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// Body for `POST /search/vector`.
#[derive(Debug, Clone, Serialize)]
pub struct VectorBody<'a> {
    pub vector: &'a [f32],
    pub top_k: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// Body for `POST /search/semantic`.
#[derive(Debug, Clone, Serialize)]
pub struct SemanticBody<'a> {
    pub query: &'a str,
    pub top_k: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// Every search mode answers with a result list.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    pub results: Vec<BackendHit>,
}
