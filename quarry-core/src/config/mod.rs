//! Engine configuration.
//!
//! One struct per subsystem, all with serde defaults. Unknown keys are
//! rejected (`deny_unknown_fields`) so a typo fails at startup instead of
//! silently running with defaults.

pub mod defaults;

use serde::{Deserialize, Serialize};

use crate::errors::{QuarryError, QuarryResult};
use crate::models::weight_vector::FACTOR_COUNT;

/// Result cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Entry time-to-live in seconds.
    pub ttl_seconds: u64,
    /// Maximum number of cached responses (LRU beyond this).
    pub max_entries: u64,
    /// Master switch; `disable_cache` on a query overrides per request.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: defaults::DEFAULT_CACHE_TTL_SECONDS,
            max_entries: defaults::DEFAULT_CACHE_MAX_ENTRIES,
            enabled: defaults::DEFAULT_CACHE_ENABLED,
        }
    }
}

/// Retrieval orchestration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrievalConfig {
    /// Candidate pool is `top_k * expansion_factor` before ranking.
    pub expansion_factor: usize,
    /// Default result count when the query does not specify one.
    pub top_k: usize,
    /// Default for the per-query `bm25_only` flag.
    pub bm25_only_default: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            expansion_factor: defaults::DEFAULT_EXPANSION_FACTOR,
            top_k: defaults::DEFAULT_TOP_K,
            bm25_only_default: defaults::DEFAULT_BM25_ONLY,
        }
    }
}

/// Ranking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankingConfig {
    /// Initial weights in factor order, applied to every intent at startup.
    /// `None` uses the built-in per-intent tables.
    pub default_weights: Option<Vec<f64>>,
    /// Inclusive (min, max) bounds every weight must stay within.
    pub weight_bounds: (f64, f64),
    /// Largest change any single weight may make per update.
    pub per_update_delta_cap: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            default_weights: None,
            weight_bounds: (defaults::DEFAULT_WEIGHT_MIN, defaults::DEFAULT_WEIGHT_MAX),
            per_update_delta_cap: defaults::DEFAULT_PER_UPDATE_DELTA_CAP,
        }
    }
}

/// Adaptive learning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LearningConfig {
    /// Feedback records accumulated per intent before an update applies.
    pub min_batch: usize,
    /// EMA learning rate.
    pub eta: f64,
    /// Background updater wake interval in seconds.
    pub tick_seconds: u64,
    /// Number of recent queries considered by the rollback check.
    pub rollback_window: usize,
    /// Relative top-3 CTR drop that triggers a rollback.
    pub rollback_drop_threshold: f64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            min_batch: defaults::DEFAULT_MIN_BATCH,
            eta: defaults::DEFAULT_ETA,
            tick_seconds: defaults::DEFAULT_TICK_SECONDS,
            rollback_window: defaults::DEFAULT_ROLLBACK_WINDOW,
            rollback_drop_threshold: defaults::DEFAULT_ROLLBACK_DROP_THRESHOLD,
        }
    }
}

/// Per-stage and per-call timeouts, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeoutConfig {
    pub classify_ms: u64,
    pub enhance_ms: u64,
    pub retrieve_ms: u64,
    pub rank_ms: u64,
    pub backend_call_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            classify_ms: defaults::DEFAULT_CLASSIFY_MS,
            enhance_ms: defaults::DEFAULT_ENHANCE_MS,
            retrieve_ms: defaults::DEFAULT_RETRIEVE_MS,
            rank_ms: defaults::DEFAULT_RANK_MS,
            backend_call_ms: defaults::DEFAULT_BACKEND_CALL_MS,
        }
    }
}

/// Pattern-match factor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatternMatchConfig {
    /// Only this many leading snippet bytes are scanned by pattern regexes.
    pub snippet_scan_bytes: usize,
}

impl Default for PatternMatchConfig {
    fn default() -> Self {
        Self {
            snippet_scan_bytes: defaults::DEFAULT_SNIPPET_SCAN_BYTES,
        }
    }
}

/// Embedding client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmbeddingConfig {
    /// Vector dimension the index was built with. Mismatches are hard errors.
    pub dimension: usize,
    /// Content-addressed cache capacity.
    pub cache_entries: u64,
    /// Content-addressed cache TTL in seconds.
    pub cache_ttl_seconds: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimension: defaults::DEFAULT_EMBEDDING_DIMENSION,
            cache_entries: defaults::DEFAULT_EMBEDDING_CACHE_ENTRIES,
            cache_ttl_seconds: defaults::DEFAULT_EMBEDDING_CACHE_TTL_SECONDS,
        }
    }
}

/// Search backend client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    /// Base endpoint of the search backend.
    pub endpoint: String,
    /// Retry backoff base in milliseconds.
    pub retry_base_ms: u64,
    /// Retry backoff multiplier per attempt.
    pub retry_factor: f64,
    /// Jitter fraction applied to each backoff delay.
    pub retry_jitter: f64,
    /// Maximum attempts per call (first try included).
    pub retry_max_attempts: u32,
    /// Pending-call bound; excess requests fail fast with `backend_overloaded`.
    pub pending_limit: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9200".to_string(),
            retry_base_ms: defaults::DEFAULT_RETRY_BASE_MS,
            retry_factor: defaults::DEFAULT_RETRY_FACTOR,
            retry_jitter: defaults::DEFAULT_RETRY_JITTER,
            retry_max_attempts: defaults::DEFAULT_RETRY_MAX_ATTEMPTS,
            pending_limit: defaults::DEFAULT_PENDING_LIMIT,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuarryConfig {
    pub cache: CacheConfig,
    pub retrieval: RetrievalConfig,
    pub ranking: RankingConfig,
    pub learning: LearningConfig,
    pub timeouts: TimeoutConfig,
    pub pattern_match: PatternMatchConfig,
    pub embedding: EmbeddingConfig,
    pub backend: BackendConfig,
}

impl QuarryConfig {
    /// Parse from a TOML string, rejecting unknown keys, then validate.
    pub fn from_toml_str(raw: &str) -> QuarryResult<Self> {
        let config: QuarryConfig =
            toml::from_str(raw).map_err(|e| QuarryError::ConfigInvalid {
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants that serde cannot express.
    pub fn validate(&self) -> QuarryResult<()> {
        let invalid = |reason: String| Err(QuarryError::ConfigInvalid { reason });

        if self.cache.ttl_seconds == 0 {
            return invalid("cache.ttl_seconds must be positive".into());
        }
        if self.cache.max_entries == 0 {
            return invalid("cache.max_entries must be positive".into());
        }
        if self.retrieval.expansion_factor == 0 || self.retrieval.top_k == 0 {
            return invalid("retrieval.expansion_factor and retrieval.top_k must be positive".into());
        }

        let (lo, hi) = self.ranking.weight_bounds;
        if !(0.0 < lo && lo < hi && hi <= 1.0) {
            return invalid(format!("ranking.weight_bounds ({lo}, {hi}) must satisfy 0 < min < max <= 1"));
        }
        // The bounded simplex must be non-empty for 8 factors.
        if lo * FACTOR_COUNT as f64 > 1.0 || hi * (FACTOR_COUNT as f64) < 1.0 {
            return invalid(format!(
                "ranking.weight_bounds ({lo}, {hi}) leave no normalizable weight vector"
            ));
        }
        if self.ranking.per_update_delta_cap <= 0.0 {
            return invalid("ranking.per_update_delta_cap must be positive".into());
        }
        if let Some(weights) = &self.ranking.default_weights {
            if weights.len() != FACTOR_COUNT {
                return invalid(format!(
                    "ranking.default_weights must have {FACTOR_COUNT} values, got {}",
                    weights.len()
                ));
            }
            if weights.iter().any(|w| !w.is_finite() || *w < lo || *w > hi) {
                return invalid("ranking.default_weights values must be finite and within weight_bounds".into());
            }
        }

        if self.learning.min_batch == 0 {
            return invalid("learning.min_batch must be positive".into());
        }
        if !(0.0 < self.learning.eta && self.learning.eta <= 1.0) {
            return invalid("learning.eta must be in (0, 1]".into());
        }
        if self.learning.tick_seconds == 0 {
            return invalid("learning.tick_seconds must be positive".into());
        }
        if self.learning.rollback_window < self.learning.min_batch {
            return invalid("learning.rollback_window must be at least learning.min_batch".into());
        }
        if !(0.0 < self.learning.rollback_drop_threshold
            && self.learning.rollback_drop_threshold <= 1.0)
        {
            return invalid("learning.rollback_drop_threshold must be in (0, 1]".into());
        }

        if self.timeouts.classify_ms == 0
            || self.timeouts.enhance_ms == 0
            || self.timeouts.retrieve_ms == 0
            || self.timeouts.rank_ms == 0
            || self.timeouts.backend_call_ms == 0
        {
            return invalid("timeouts must all be positive".into());
        }

        if self.pattern_match.snippet_scan_bytes == 0 {
            return invalid("pattern_match.snippet_scan_bytes must be positive".into());
        }

        if self.embedding.dimension == 0 {
            return invalid("embedding.dimension must be positive".into());
        }

        if self.backend.endpoint.is_empty() {
            return invalid("backend.endpoint must not be empty".into());
        }
        if self.backend.retry_max_attempts == 0 {
            return invalid("backend.retry_max_attempts must be positive".into());
        }
        if self.backend.pending_limit == 0 {
            return invalid("backend.pending_limit must be positive".into());
        }
        if !(0.0..1.0).contains(&self.backend.retry_jitter) {
            return invalid("backend.retry_jitter must be in [0, 1)".into());
        }

        Ok(())
    }
}
