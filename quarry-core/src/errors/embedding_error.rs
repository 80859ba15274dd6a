/// Embedding client errors.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("http transport failed: {reason}")]
    Transport { reason: String },

    #[error("embedding service returned status {status}")]
    Status { status: u16 },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("malformed embedding response: {reason}")]
    MalformedResponse { reason: String },
}
