//! # quarry-pipeline
//!
//! The engine's entry point. `SearchPipeline::search` runs the staged
//! query pipeline — fingerprint → cache → classify → enhance → retrieve
//! → rank → shape — with an independent timeout and fallback per stage,
//! a coalescing result cache in front, and feedback plumbed back into
//! the adaptive weight store.

pub mod cache;
pub mod engine;
pub mod fingerprint;
pub mod query_log;
pub mod response;

pub use engine::SearchPipeline;
