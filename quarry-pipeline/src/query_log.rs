//! Query performance logging: fingerprint, intent, latency, result
//! count, cache hit. Query text is truncated before it reaches the log.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use quarry_core::constants::LOGGED_QUERY_PREFIX_CHARS;
use quarry_core::Intent;

/// A single query log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryLogEntry {
    /// Query text, truncated to the logging limit.
    pub query_prefix: String,
    pub fingerprint: String,
    pub intent: Intent,
    pub latency: Duration,
    pub result_count: usize,
    pub cache_hit: bool,
    pub timestamp_epoch_ms: i64,
}

impl QueryLogEntry {
    pub fn new(
        query_text: &str,
        fingerprint: impl Into<String>,
        intent: Intent,
        latency: Duration,
        result_count: usize,
        cache_hit: bool,
    ) -> Self {
        Self {
            query_prefix: truncate_chars(query_text, LOGGED_QUERY_PREFIX_CHARS),
            fingerprint: fingerprint.into(),
            intent,
            latency,
            result_count,
            cache_hit,
            timestamp_epoch_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Bounded in-memory query log (ring buffer behavior).
#[derive(Debug, Clone)]
pub struct QueryLog {
    entries: Vec<QueryLogEntry>,
    max_entries: usize,
}

impl QueryLog {
    pub fn new() -> Self {
        Self::with_capacity(50_000)
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
        }
    }

    /// Record a query.
    pub fn record(&mut self, entry: QueryLogEntry) {
        tracing::debug!(
            event = "query_logged",
            query = %entry.query_prefix,
            intent = %entry.intent,
            latency_ms = entry.latency.as_millis() as u64,
            result_count = entry.result_count,
            cache_hit = entry.cache_hit,
            "query logged"
        );

        self.entries.push(entry);
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(..excess);
        }
    }

    pub fn entries(&self) -> &[QueryLogEntry] {
        &self.entries
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Average latency across all logged queries.
    pub fn avg_latency(&self) -> Duration {
        if self.entries.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.entries.iter().map(|e| e.latency).sum();
        total / self.entries.len() as u32
    }

    /// Latency at the given percentile (0.0–1.0).
    pub fn latency_percentile(&self, p: f64) -> Duration {
        if self.entries.is_empty() {
            return Duration::ZERO;
        }
        let mut latencies: Vec<Duration> = self.entries.iter().map(|e| e.latency).collect();
        latencies.sort();
        let idx = ((p * (latencies.len() - 1) as f64).round() as usize).min(latencies.len() - 1);
        latencies[idx]
    }
}

impl Default for QueryLog {
    fn default() -> Self {
        Self::new()
    }
}
