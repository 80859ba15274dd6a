//! Capability traits at the engine's seams.
//!
//! The pipeline is parameterized by these at construction; an absent
//! optional capability disables the corresponding stage cleanly.

mod context_source;
mod embedding;
mod feedback_sink;
mod search_backend;

pub use context_source::{FileContext, FileContextSource, MemoryContextSource};
pub use embedding::EmbeddingProvider;
pub use feedback_sink::FeedbackSink;
pub use search_backend::SearchBackend;
