//! SearchPipeline: orchestrates the full staged query pipeline.
//!
//! Stage 1: fingerprint + cache lookup (coalesced)
//! Stage 2: classify → enhance (timeouts fall through to defaults)
//! Stage 3: retrieval fan-out (timeout fails with backend_unavailable)
//! Stage 4: 8-factor ranking (failure falls back to backend order)
//! Stage 5: shape per detail level, attach timings/explanations
//!
//! The engine is parameterized by its collaborators at construction;
//! absent optional capabilities (embeddings, feedback sink, context
//! source) disable the corresponding behavior cleanly.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use quarry_core::models::{
    EnhancedQuery, FeedbackOutcome, FeedbackRecord, NoResultsReason, Query, SearchResponse,
    StageTimings,
};
use quarry_core::traits::{EmbeddingProvider, FeedbackSink, FileContextSource, SearchBackend};
use quarry_core::{Intent, QuarryConfig, QuarryError, QuarryResult};
use quarry_learning::tick::LearningTick;
use quarry_learning::{FeedbackCollector, ServedRegistry, WeightStore};
use quarry_retrieval::{expansion, IntentEngine, RankingPipeline, RetrievalOrchestrator};

use crate::cache::{ResultCache, SealedResponse};
use crate::fingerprint;
use crate::query_log::{QueryLog, QueryLogEntry};
use crate::response;

/// The engine's entry point. One instance serves concurrent requests.
pub struct SearchPipeline {
    config: QuarryConfig,
    intent_engine: IntentEngine,
    orchestrator: RetrievalOrchestrator,
    ranking: RankingPipeline,
    cache: ResultCache,
    context_source: Option<Arc<dyn FileContextSource>>,
    weight_store: Arc<WeightStore>,
    served: Arc<ServedRegistry>,
    collector: Arc<FeedbackCollector>,
    query_log: Mutex<QueryLog>,
    /// Background learning task; aborted when the pipeline drops.
    _learning_tick: LearningTick,
}

impl SearchPipeline {
    /// Build the pipeline. Must be called inside a tokio runtime: the
    /// background learning task is spawned here.
    pub fn new(
        config: QuarryConfig,
        backend: Arc<dyn SearchBackend>,
        embeddings: Option<Arc<dyn EmbeddingProvider>>,
        feedback_sink: Option<Arc<dyn FeedbackSink>>,
        context_source: Option<Arc<dyn FileContextSource>>,
    ) -> QuarryResult<Self> {
        config.validate()?;

        let weight_store = Arc::new(WeightStore::new(&config.ranking, &config.learning));
        let served = Arc::new(ServedRegistry::default());
        let collector = Arc::new(FeedbackCollector::new(
            feedback_sink,
            served.clone(),
            weight_store.clone(),
        ));
        let learning_tick = LearningTick::spawn(
            collector.clone(),
            weight_store.clone(),
            Duration::from_secs(config.learning.tick_seconds),
        );

        let orchestrator = RetrievalOrchestrator::new(backend, embeddings);
        let ranking = RankingPipeline::new(config.pattern_match.snippet_scan_bytes);
        let cache = ResultCache::new(&config.cache);

        info!(
            cache_enabled = config.cache.enabled,
            top_k = config.retrieval.top_k,
            "search pipeline initialized"
        );

        Ok(Self {
            config,
            intent_engine: IntentEngine::new(),
            orchestrator,
            ranking,
            cache,
            context_source,
            weight_store,
            served,
            collector,
            query_log: Mutex::new(QueryLog::new()),
            _learning_tick: learning_tick,
        })
    }

    /// Run a search.
    pub async fn search(&self, query: Query) -> QuarryResult<SearchResponse> {
        let started = Instant::now();
        query.validate()?;

        let key = fingerprint::fingerprint(&query);
        let use_cache = self.config.cache.enabled && !query.disable_cache;

        let (sealed, cache_hit) = if use_cache {
            let was_cached = self.cache.get(&key).await.is_some();
            let sealed = self
                .cache
                .get_or_compute(&key, self.execute(&query, &key))
                .await?;
            (sealed, was_cached)
        } else {
            let sealed = Arc::new(self.execute(&query, &key).await?);
            (sealed, false)
        };

        // Remember what was served so later feedback can attribute
        // rewards to factor values.
        self.served.insert(&key, sealed.intent, &sealed.ranked);

        let timings = query.include_timings.then(|| {
            let mut timings = sealed.stage_timings;
            timings.total_ms = started.elapsed().as_secs_f64() * 1000.0;
            timings
        });

        let response = response::shape(&sealed, &query, timings);

        self.query_log.lock().record(QueryLogEntry::new(
            &query.text,
            key,
            sealed.intent,
            started.elapsed(),
            response.results.len(),
            cache_hit,
        ));

        Ok(response)
    }

    /// Run a search under a client deadline. Cancellation aborts the
    /// in-flight stages and surfaces as `cancelled`; no weight or
    /// feedback state is touched by a cancelled request.
    pub async fn search_with_deadline(
        &self,
        query: Query,
        deadline: Duration,
    ) -> QuarryResult<SearchResponse> {
        match timeout(deadline, self.search(query)).await {
            Ok(result) => result,
            Err(_) => Err(QuarryError::Cancelled),
        }
    }

    /// The uncached pipeline body: classify → enhance → retrieve → rank.
    async fn execute(&self, query: &Query, key: &str) -> QuarryResult<SealedResponse> {
        let timeouts = &self.config.timeouts;
        let mut stage_timings = StageTimings::default();

        // The config-level keyword-only default applies unless the query
        // opted in explicitly.
        let mut query = query.clone();
        query.bm25_only = query.bm25_only || self.config.retrieval.bm25_only_default;
        let query = &query;

        // Stage: classify. A timeout falls through to Understand.
        let stage_start = Instant::now();
        let intent = match query.intent {
            Some(intent) => intent,
            None => {
                match timeout(Duration::from_millis(timeouts.classify_ms), async {
                    self.intent_engine.classify(&query.text)
                })
                .await
                {
                    Ok(intent) => intent,
                    Err(_) => {
                        warn!("intent classification timed out, defaulting");
                        Intent::Understand
                    }
                }
            }
        };
        stage_timings.classify_ms = stage_start.elapsed().as_secs_f64() * 1000.0;

        // Stage: enhance. Skipped for keyword-only queries without file
        // context; a timeout falls through to the bare query.
        let stage_start = Instant::now();
        let enhanced = if query.bm25_only && query.current_file.is_none() {
            EnhancedQuery::passthrough(&query.text)
        } else {
            match timeout(Duration::from_millis(timeouts.enhance_ms), async {
                expansion::enhance(query, intent, self.context_source.as_deref())
            })
            .await
            {
                Ok(enhanced) => enhanced,
                Err(_) => {
                    warn!("query enhancement timed out, using original query");
                    EnhancedQuery::passthrough(&query.text)
                }
            }
        };
        stage_timings.enhance_ms = stage_start.elapsed().as_secs_f64() * 1000.0;

        // Stage: retrieve. A timeout here is fatal for the request.
        let stage_start = Instant::now();
        let top_k = query.max_results.max(self.config.retrieval.top_k);
        let pool_size = top_k * self.config.retrieval.expansion_factor;
        let candidates = match timeout(
            Duration::from_millis(timeouts.retrieve_ms),
            self.orchestrator.retrieve(query, &enhanced, top_k, pool_size),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(QuarryError::BackendUnavailable {
                    reason: format!("retrieval timed out after {} ms", timeouts.retrieve_ms),
                })
            }
        };
        stage_timings.retrieve_ms = stage_start.elapsed().as_secs_f64() * 1000.0;

        if candidates.is_empty() {
            debug!(%intent, "no candidates retrieved");
            return Ok(SealedResponse {
                query_id: key.to_string(),
                intent,
                ranked: Vec::new(),
                weights: self.weight_store.weights_for(intent),
                degraded_ranking: false,
                no_results_reason: Some(NoResultsReason::NoMatches),
                stage_timings,
            });
        }

        // Stage: rank. A snapshot of the weights is taken once; failures
        // fall back to backend order instead of failing the request.
        let stage_start = Instant::now();
        let weights = self.weight_store.weights_for(intent);
        let rank_outcome = timeout(Duration::from_millis(timeouts.rank_ms), async {
            self.ranking.rank(&candidates, &enhanced, &weights)
        })
        .await;

        let (ranked, degraded_ranking) = match rank_outcome {
            Ok(Ok(ranked)) => (ranked, false),
            Ok(Err(e)) => {
                warn!(error = %e, "ranking invariant violated, falling back to backend order");
                (RankingPipeline::backend_order(&candidates), true)
            }
            Err(_) => {
                warn!("ranking timed out, falling back to backend order");
                (RankingPipeline::backend_order(&candidates), true)
            }
        };
        stage_timings.rank_ms = stage_start.elapsed().as_secs_f64() * 1000.0;

        debug!(
            %intent,
            candidates = candidates.len(),
            ranked = ranked.len(),
            degraded_ranking,
            "pipeline executed"
        );

        Ok(SealedResponse {
            query_id: key.to_string(),
            intent,
            ranked,
            weights,
            degraded_ranking,
            no_results_reason: None,
            stage_timings,
        })
    }

    /// Record explicit feedback for a served query.
    pub fn submit_feedback(
        &self,
        query_id: &str,
        result_id: &str,
        outcome: FeedbackOutcome,
        rank: Option<u32>,
    ) -> QuarryResult<()> {
        self.record_feedback(query_id, result_id, outcome, rank.unwrap_or(1))
    }

    /// Record a click on a result.
    pub fn track_click(&self, query_id: &str, result_id: &str, rank: u32) -> QuarryResult<()> {
        self.record_feedback(query_id, result_id, FeedbackOutcome::Click, rank)
    }

    /// Record a query-level outcome with no specific result.
    pub fn track_outcome(&self, query_id: &str, outcome: FeedbackOutcome) -> QuarryResult<()> {
        self.record_feedback(query_id, "", outcome, 1)
    }

    fn record_feedback(
        &self,
        query_id: &str,
        result_id: &str,
        outcome: FeedbackOutcome,
        rank: u32,
    ) -> QuarryResult<()> {
        let intent = self
            .served
            .intent_for(query_id)
            .unwrap_or(Intent::Understand);
        let record = FeedbackRecord {
            query_fingerprint: query_id.to_string(),
            result_id: result_id.to_string(),
            rank,
            outcome,
            timestamp: Utc::now(),
            intent,
        };
        self.collector.record(record)?;
        Ok(())
    }

    /// Force a feedback flush + weight update outside the normal tick.
    /// Test and operational hook; the background task does this on its
    /// own cadence.
    pub async fn apply_learning_now(&self) -> QuarryResult<usize> {
        let flushed = self.collector.flush().await?;
        self.weight_store.apply_pending();
        Ok(flushed)
    }

    /// Current weight snapshot for an intent.
    pub fn weights_for(&self, intent: Intent) -> quarry_core::WeightVector {
        self.weight_store.weights_for(intent)
    }

    /// Recent query performance entries.
    pub fn query_log_snapshot(&self) -> Vec<QueryLogEntry> {
        self.query_log.lock().entries().to_vec()
    }
}
