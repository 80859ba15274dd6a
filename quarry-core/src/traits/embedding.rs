use async_trait::async_trait;

use crate::errors::QuarryResult;

/// A text-embedding service.
///
/// Returned vectors must have exactly `dimension()` elements; providers
/// must never pad or truncate to fit.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one text.
    async fn embed(&self, text: &str) -> QuarryResult<Vec<f32>>;

    /// The dimension the index was configured with.
    fn dimension(&self) -> usize;
}
