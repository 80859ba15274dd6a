//! # quarry-backend
//!
//! Thin async HTTP client for the search backend. One `reqwest::Client`
//! per engine gives process-wide connection pooling; calls retry on 5xx
//! and connect errors with jittered exponential backoff, and fail fast
//! with `backend_overloaded` when the pending-call bound is reached.

pub mod client;
pub mod filter;
pub mod protocol;
pub mod retry;

pub use client::HttpSearchBackend;
