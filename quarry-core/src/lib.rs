//! # quarry-core
//!
//! Foundation crate for the Quarry code search engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod intent;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::QuarryConfig;
pub use errors::{QuarryError, QuarryResult};
pub use intent::Intent;
pub use models::{
    EnhancedQuery, Factor, FactorScore, FactorVector, FeedbackOutcome, FeedbackRecord, Query,
    RankedResult, RetrievalResult, SearchResponse, WeightVector,
};
