//! # quarry-retrieval
//!
//! The query pipeline's middle stages:
//! intent classification → query enhancement → concurrent strategy
//! fan-out with RRF fusion → 8-factor ranking → explanations.
//!
//! Everything here is deterministic for a fixed candidate set and weight
//! vector; only the search stage performs I/O.

pub mod expansion;
pub mod intent;
pub mod ranking;
pub mod search;
pub mod why;

pub use intent::IntentEngine;
pub use ranking::RankingPipeline;
pub use search::RetrievalOrchestrator;
