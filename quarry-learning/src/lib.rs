//! # quarry-learning
//!
//! The ranking engine's learning loop. Feedback records flow from a
//! bounded non-blocking buffer through an append-only sink into the
//! per-intent weight store, which applies bounded EMA updates on a
//! background tick and rolls back when top-3 click-through regresses.
//!
//! Readers take a copy of the current weight vector; only the background
//! updater mutates, so rank computations never observe a partial update.

pub mod collector;
pub mod served;
pub mod sink;
pub mod tick;
pub mod update;
pub mod weight_store;

pub use collector::FeedbackCollector;
pub use served::ServedRegistry;
pub use sink::{JsonlFeedbackSink, MemoryFeedbackSink};
pub use update::{FeedbackEvent, UpdateParams};
pub use weight_store::WeightStore;
