//! Wire types for the search backend contract.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::retrieval_result::{HighlightSpan, QualitySignals};

/// Comparison operators the backend filter grammar accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl FilterOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Ne => "ne",
            FilterOp::Gt => "gt",
            FilterOp::Ge => "ge",
            FilterOp::Lt => "lt",
            FilterOp::Le => "le",
        }
    }
}

/// One `field op value` clause. The value is raw client text here; it is
/// quoted and escaped only by the backend client's filter renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    pub op: FilterOp,
    pub value: String,
}

impl FieldFilter {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Eq,
            value: value.into(),
        }
    }
}

/// Keyword (BM25) search request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRequest {
    pub query: String,
    pub top_k: usize,
    #[serde(default)]
    pub filters: Vec<FieldFilter>,
}

/// Vector similarity search request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRequest {
    pub vector: Vec<f32>,
    pub top_k: usize,
    #[serde(default)]
    pub filters: Vec<FieldFilter>,
}

/// Semantic-mode search request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticRequest {
    pub query: String,
    pub top_k: usize,
    #[serde(default)]
    pub filters: Vec<FieldFilter>,
}

/// Document fields as stored in the index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentPayload {
    pub repository: String,
    pub file_path: String,
    pub function_name: Option<String>,
    pub class_name: Option<String>,
    pub language: Option<String>,
    pub snippet: String,
    pub start_line: Option<u32>,
    pub end_line: Option<u32>,
    pub last_modified: Option<DateTime<Utc>>,
    pub imports: BTreeSet<String>,
    pub identifiers: BTreeSet<String>,
    pub highlights: Vec<HighlightSpan>,
    pub quality: QualitySignals,
}

/// One scored hit from any search mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendHit {
    pub id: String,
    pub score: f64,
    pub fields: DocumentPayload,
}
