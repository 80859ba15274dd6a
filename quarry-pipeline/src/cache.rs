//! Result cache: bounded, TTL'd, compute-once.
//!
//! Concurrent misses on the same fingerprint coalesce: one request
//! computes, the rest await the shared in-flight result. Failures are
//! shared with the waiters but never cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use quarry_core::config::CacheConfig;
use quarry_core::models::{NoResultsReason, RankedResult, StageTimings, WeightVector};
use quarry_core::{Intent, QuarryError, QuarryResult};

/// The cacheable part of a pipeline run: everything needed to shape any
/// detail level and recompute explanations, nothing request-specific.
#[derive(Debug, Clone)]
pub struct SealedResponse {
    /// The fingerprint, echoed as `query_id`.
    pub query_id: String,
    pub intent: Intent,
    pub ranked: Vec<RankedResult>,
    /// The weight snapshot the ranking used; explanations reuse it.
    pub weights: WeightVector,
    pub degraded_ranking: bool,
    pub no_results_reason: Option<NoResultsReason>,
    /// Stage timings of the run that computed this entry.
    pub stage_timings: StageTimings,
}

/// Bounded LRU response cache with per-entry TTL.
pub struct ResultCache {
    cache: Cache<String, Arc<SealedResponse>>,
}

impl ResultCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(config.max_entries)
                .time_to_live(Duration::from_secs(config.ttl_seconds))
                .build(),
        }
    }

    /// Unexpired entry for the fingerprint, if any.
    pub async fn get(&self, fingerprint: &str) -> Option<Arc<SealedResponse>> {
        self.cache.get(fingerprint).await
    }

    /// Best-effort insert.
    pub async fn insert(&self, fingerprint: String, sealed: Arc<SealedResponse>) {
        self.cache.insert(fingerprint, sealed).await;
    }

    /// Return the cached entry or run `compute`, coalescing concurrent
    /// misses on the same key into a single computation.
    pub async fn get_or_compute<F>(
        &self,
        fingerprint: &str,
        compute: F,
    ) -> QuarryResult<Arc<SealedResponse>>
    where
        F: std::future::Future<Output = QuarryResult<SealedResponse>>,
    {
        self.cache
            .try_get_with(fingerprint.to_string(), async move {
                compute.await.map(Arc::new)
            })
            .await
            .map_err(|shared: Arc<QuarryError>| clone_error(&shared))
    }
}

/// `QuarryError` is not `Clone`; rebuild an equivalent error for each
/// coalesced waiter.
fn clone_error(err: &QuarryError) -> QuarryError {
    match err {
        QuarryError::InvalidQuery { reason } => QuarryError::InvalidQuery {
            reason: reason.clone(),
        },
        QuarryError::BackendUnavailable { reason } => QuarryError::BackendUnavailable {
            reason: reason.clone(),
        },
        QuarryError::BackendOverloaded => QuarryError::BackendOverloaded,
        QuarryError::EmbeddingUnavailable { reason } => QuarryError::EmbeddingUnavailable {
            reason: reason.clone(),
        },
        QuarryError::RankingInvariantViolated {
            document_id,
            detail,
        } => QuarryError::RankingInvariantViolated {
            document_id: document_id.clone(),
            detail: detail.clone(),
        },
        QuarryError::ConfigInvalid { reason } => QuarryError::ConfigInvalid {
            reason: reason.clone(),
        },
        QuarryError::Cancelled => QuarryError::Cancelled,
    }
}
