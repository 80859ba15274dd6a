//! HTTP embedding client with cache and strict dimension checking.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use quarry_core::config::EmbeddingConfig;
use quarry_core::errors::EmbeddingError;
use quarry_core::traits::EmbeddingProvider;
use quarry_core::QuarryResult;

use crate::cache::EmbeddingCache;

#[derive(Debug, Serialize)]
struct EmbedBody<'a> {
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

/// Embedding service client.
///
/// Cache lookups happen before any I/O; a service failure surfaces as
/// `embedding_unavailable` and the orchestrator degrades the vector
/// strategy for that variant.
pub struct HttpEmbeddingClient {
    http: reqwest::Client,
    endpoint: String,
    dimension: usize,
    cache: EmbeddingCache,
}

impl HttpEmbeddingClient {
    pub fn new(endpoint: impl Into<String>, config: &EmbeddingConfig) -> QuarryResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| EmbeddingError::Transport {
                reason: e.to_string(),
            })?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            dimension: config.dimension,
            cache: EmbeddingCache::new(
                config.cache_entries,
                Duration::from_secs(config.cache_ttl_seconds),
            ),
        })
    }

    async fn fetch(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&EmbedBody { input: text })
            .send()
            .await
            .map_err(|e| EmbeddingError::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EmbeddingError::Status {
                status: status.as_u16(),
            });
        }

        let parsed: EmbedResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        // The dimension contract is strict: never pad or truncate.
        if parsed.embedding.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: parsed.embedding.len(),
            });
        }

        Ok(parsed.embedding)
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingClient {
    async fn embed(&self, text: &str) -> QuarryResult<Vec<f32>> {
        let key = EmbeddingCache::content_key(text);
        if let Some(vector) = self.cache.get(&key) {
            debug!(key = %key, "embedding cache hit");
            return Ok(vector);
        }

        let vector = self.fetch(text).await?;
        self.cache.insert(key, vector.clone());
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
