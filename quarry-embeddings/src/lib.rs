//! # quarry-embeddings
//!
//! Client for the text-embedding service. Lookups are content-addressed:
//! the blake3 hash of the input text keys a bounded in-memory cache, so
//! repeated variants of the same query never hit the service twice
//! within the TTL. Vector dimensions are checked strictly; a mismatch is
//! a configuration error, never padded or truncated away.

pub mod cache;
pub mod client;

pub use cache::EmbeddingCache;
pub use client::HttpEmbeddingClient;
