use async_trait::async_trait;

use crate::errors::QuarryResult;
use crate::models::backend::{BackendHit, KeywordRequest, SemanticRequest, VectorRequest};

/// The pre-existing search index, reached over HTTP.
///
/// Implementations own sanitization of filter clauses: raw client text
/// must never reach the wire outside a quoted string literal.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// BM25 keyword search.
    async fn keyword_search(&self, request: &KeywordRequest) -> QuarryResult<Vec<BackendHit>>;

    /// Nearest-neighbor search over stored embeddings.
    async fn vector_search(&self, request: &VectorRequest) -> QuarryResult<Vec<BackendHit>>;

    /// The backend's semantic mode. Backends without one should return
    /// `backend_unavailable` so callers can fall back to keyword search.
    async fn semantic_search(&self, request: &SemanticRequest) -> QuarryResult<Vec<BackendHit>>;
}
