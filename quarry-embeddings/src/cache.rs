//! Content-addressed embedding cache.
//!
//! Keys are blake3 hashes of the input text. Bounded capacity with
//! per-entry TTL; eviction is handled by moka.

use std::time::Duration;

use moka::sync::Cache;

/// In-memory embedding cache keyed by content hash.
pub struct EmbeddingCache {
    cache: Cache<String, Vec<f32>>,
}

impl EmbeddingCache {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// blake3 hex digest of the input text.
    pub fn content_key(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }

    pub fn get(&self, content_key: &str) -> Option<Vec<f32>> {
        self.cache.get(content_key)
    }

    pub fn insert(&self, content_key: String, embedding: Vec<f32>) {
        self.cache.insert(content_key, embedding);
    }

    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let cache = EmbeddingCache::new(100, Duration::from_secs(3600));
        let key = EmbeddingCache::content_key("fn main() {}");
        cache.insert(key.clone(), vec![0.1, 0.2]);
        assert_eq!(cache.get(&key), Some(vec![0.1, 0.2]));
    }

    #[test]
    fn miss_returns_none() {
        let cache = EmbeddingCache::new(100, Duration::from_secs(3600));
        assert_eq!(cache.get("nonexistent"), None);
    }

    #[test]
    fn same_text_same_key() {
        assert_eq!(
            EmbeddingCache::content_key("retry with backoff"),
            EmbeddingCache::content_key("retry with backoff")
        );
        assert_ne!(
            EmbeddingCache::content_key("retry with backoff"),
            EmbeddingCache::content_key("retry with Backoff")
        );
    }
}
