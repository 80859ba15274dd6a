//! Retrieval orchestration: run the applicable strategies concurrently,
//! merge their hits by document id, and fuse the rankings with RRF.
//!
//! A single failing strategy is logged and skipped; the request only
//! fails when every attempted strategy fails. The best per-channel score
//! (keyword, vector, semantic) is carried onto each merged result so the
//! ranker can use the raw signals directly.

pub mod rrf_fusion;

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use quarry_core::constants::{DEPENDENCY_TOP_NAMES, RRF_K};
use quarry_core::models::{
    BackendHit, EnhancedQuery, FieldFilter, KeywordRequest, Query, RetrievalResult,
    SemanticRequest, VectorRequest,
};
use quarry_core::traits::{EmbeddingProvider, SearchBackend};
use quarry_core::{QuarryError, QuarryResult};

use rrf_fusion::StrategyRankings;

/// Runs the retrieval strategies and fuses their results.
pub struct RetrievalOrchestrator {
    backend: Arc<dyn SearchBackend>,
    embeddings: Option<Arc<dyn EmbeddingProvider>>,
}

/// Hit lists collected from the concurrent first pass.
struct FirstPass {
    keyword: Option<Vec<BackendHit>>,
    vector: Option<Vec<BackendHit>>,
    semantic: Option<Vec<BackendHit>>,
    /// True when the semantic strategy silently degraded to keyword mode;
    /// its scores then belong in the keyword channel.
    semantic_degraded: bool,
    attempted: usize,
    failed: usize,
}

impl RetrievalOrchestrator {
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        embeddings: Option<Arc<dyn EmbeddingProvider>>,
    ) -> Self {
        Self {
            backend,
            embeddings,
        }
    }

    /// Retrieve up to `pool_size` fused candidates for the enhanced query.
    ///
    /// Returns an empty list (not an error) when every strategy succeeded
    /// but nothing matched; fails with `backend_unavailable` only when
    /// every attempted strategy failed.
    pub async fn retrieve(
        &self,
        query: &Query,
        enhanced: &EnhancedQuery,
        top_k: usize,
        pool_size: usize,
    ) -> QuarryResult<Vec<RetrievalResult>> {
        let filters = base_filters(query);
        let first = self.first_pass(query, enhanced, top_k, &filters).await;

        if first.attempted > 0 && first.failed == first.attempted {
            return Err(QuarryError::BackendUnavailable {
                reason: "all retrieval strategies failed".into(),
            });
        }

        // Merge hits by document id, carrying the best score per channel.
        let mut documents: HashMap<String, RetrievalResult> = HashMap::new();
        let mut rankings = StrategyRankings::default();

        if let Some(hits) = &first.keyword {
            rankings.keyword = Some(merge_channel(&mut documents, hits, Channel::Keyword));
        }
        if let Some(hits) = &first.vector {
            rankings.vector = Some(merge_channel(&mut documents, hits, Channel::Vector));
        }
        if let Some(hits) = &first.semantic {
            let channel = if first.semantic_degraded {
                Channel::Keyword
            } else {
                Channel::Semantic
            };
            rankings.semantic = Some(merge_channel(&mut documents, hits, channel));
        }

        // Dependency expansion works off the provisional fusion of the
        // first pass: follow the top extracted function/class names.
        if query.include_dependencies {
            let provisional = rrf_fusion::fuse(&rankings, &documents, RRF_K);
            if let Some(hits) = self
                .dependency_pass(query, &provisional, top_k, &filters)
                .await
            {
                rankings.dependency = Some(merge_channel(&mut documents, &hits, Channel::Keyword));
            }
        }

        let mut fused = rrf_fusion::fuse(&rankings, &documents, RRF_K);
        fused.truncate(pool_size);
        debug!(
            candidates = fused.len(),
            attempted = first.attempted,
            failed = first.failed,
            "retrieval fused"
        );
        Ok(fused)
    }

    /// Keyword, vector, and semantic strategies, dispatched concurrently.
    async fn first_pass(
        &self,
        query: &Query,
        enhanced: &EnhancedQuery,
        top_k: usize,
        filters: &[FieldFilter],
    ) -> FirstPass {
        let run_vector = !query.bm25_only && self.embeddings.is_some();
        let run_semantic = !query.bm25_only;

        let keyword_fut = async {
            let request = KeywordRequest {
                query: enhanced.original.clone(),
                top_k: top_k * 2,
                filters: filters.to_vec(),
            };
            self.backend.keyword_search(&request).await
        };

        let vector_fut = async {
            if !run_vector {
                return None;
            }
            Some(self.vector_strategy(enhanced, top_k, filters).await)
        };

        let semantic_fut = async {
            if !run_semantic {
                return None;
            }
            Some(self.semantic_strategy(enhanced, top_k, filters).await)
        };

        let (keyword_res, vector_res, semantic_res) =
            tokio::join!(keyword_fut, vector_fut, semantic_fut);

        let mut attempted = 1;
        let mut failed = 0;

        let keyword = match keyword_res {
            Ok(hits) => Some(hits),
            Err(e) => {
                warn!(error = %e, "keyword strategy failed");
                failed += 1;
                None
            }
        };

        let vector = match vector_res {
            None => None,
            Some(outcome) => {
                attempted += 1;
                match outcome {
                    Ok(hits) => Some(hits),
                    Err(e) => {
                        warn!(error = %e, "vector strategy failed");
                        failed += 1;
                        None
                    }
                }
            }
        };

        let (semantic, semantic_degraded) = match semantic_res {
            None => (None, false),
            Some(outcome) => {
                attempted += 1;
                match outcome {
                    Ok((hits, degraded)) => (Some(hits), degraded),
                    Err(e) => {
                        warn!(error = %e, "semantic strategy failed");
                        failed += 1;
                        (None, false)
                    }
                }
            }
        };

        FirstPass {
            keyword,
            vector,
            semantic,
            semantic_degraded,
            attempted,
            failed,
        }
    }

    /// Embed every variant (cache-backed) and query the vector index once
    /// per variant. A variant whose embedding fails is skipped; the
    /// strategy fails only when every variant fails.
    async fn vector_strategy(
        &self,
        enhanced: &EnhancedQuery,
        top_k: usize,
        filters: &[FieldFilter],
    ) -> QuarryResult<Vec<BackendHit>> {
        let Some(embeddings) = self.embeddings.as_ref() else {
            return Err(QuarryError::EmbeddingUnavailable {
                reason: "no embedding provider configured".into(),
            });
        };

        let per_variant = join_all(enhanced.variants.iter().map(|variant| async move {
            let vector = embeddings.embed(variant).await?;
            self.backend
                .vector_search(&VectorRequest {
                    vector,
                    top_k,
                    filters: filters.to_vec(),
                })
                .await
        }))
        .await;

        let mut merged: HashMap<String, BackendHit> = HashMap::new();
        let mut succeeded = 0usize;
        let mut last_error = None;

        for outcome in per_variant {
            match outcome {
                Ok(hits) => {
                    succeeded += 1;
                    for hit in hits {
                        merged
                            .entry(hit.id.clone())
                            .and_modify(|existing| {
                                if hit.score > existing.score {
                                    existing.score = hit.score;
                                }
                            })
                            .or_insert(hit);
                    }
                }
                Err(e) => {
                    debug!(error = %e, "vector variant degraded");
                    last_error = Some(e);
                }
            }
        }

        if succeeded == 0 {
            return Err(last_error.unwrap_or(QuarryError::EmbeddingUnavailable {
                reason: "no variants to embed".into(),
            }));
        }

        // One combined vector ranking, best cosine first.
        let mut hits: Vec<BackendHit> = merged.into_values().collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        Ok(hits)
    }

    /// Semantic mode with silent keyword fallback for backends that do
    /// not support it. The bool is true when the fallback was taken.
    async fn semantic_strategy(
        &self,
        enhanced: &EnhancedQuery,
        top_k: usize,
        filters: &[FieldFilter],
    ) -> QuarryResult<(Vec<BackendHit>, bool)> {
        let request = SemanticRequest {
            query: enhanced.original.clone(),
            top_k,
            filters: filters.to_vec(),
        };
        match self.backend.semantic_search(&request).await {
            Ok(hits) => Ok((hits, false)),
            Err(e) => {
                debug!(error = %e, "semantic mode unsupported, falling back to keyword");
                let hits = self
                    .backend
                    .keyword_search(&KeywordRequest {
                        query: enhanced.original.clone(),
                        top_k,
                        filters: filters.to_vec(),
                    })
                    .await?;
                Ok((hits, true))
            }
        }
    }

    /// Follow-up keyword call for callers/callees of the top extracted
    /// function/class names, filtered by repository.
    async fn dependency_pass(
        &self,
        query: &Query,
        provisional: &[RetrievalResult],
        top_k: usize,
        filters: &[FieldFilter],
    ) -> Option<Vec<BackendHit>> {
        let mut names: Vec<&str> = Vec::new();
        let mut repository: Option<&str> = query.repository.as_deref();

        for result in provisional {
            for name in [&result.function_name, &result.class_name] {
                if let Some(name) = name {
                    if !names.contains(&name.as_str()) {
                        names.push(name.as_str());
                        if repository.is_none() {
                            repository = Some(&result.repository);
                        }
                    }
                }
            }
            if names.len() >= DEPENDENCY_TOP_NAMES {
                break;
            }
        }
        names.truncate(DEPENDENCY_TOP_NAMES);

        if names.is_empty() {
            return None;
        }

        let mut dep_filters = filters.to_vec();
        if query.repository.is_none() {
            if let Some(repo) = repository {
                if !repo.is_empty() {
                    dep_filters.push(FieldFilter::eq("repository", repo));
                }
            }
        }

        let request = KeywordRequest {
            query: names.join(" "),
            top_k,
            filters: dep_filters,
        };
        match self.backend.keyword_search(&request).await {
            Ok(hits) => Some(hits),
            Err(e) => {
                warn!(error = %e, "dependency expansion failed");
                None
            }
        }
    }
}

/// Which per-channel score a strategy's hits update.
#[derive(Clone, Copy)]
enum Channel {
    Keyword,
    Vector,
    Semantic,
}

/// Merge one strategy's hits into the document map, carrying the maximum
/// score per channel, and return the strategy's (id, rank) list.
fn merge_channel(
    documents: &mut HashMap<String, RetrievalResult>,
    hits: &[BackendHit],
    channel: Channel,
) -> Vec<(String, usize)> {
    let mut ranking = Vec::with_capacity(hits.len());
    for (index, hit) in hits.iter().enumerate() {
        let entry = documents
            .entry(hit.id.clone())
            .or_insert_with(|| RetrievalResult::from_hit(hit.clone()));
        match channel {
            Channel::Keyword => {
                if hit.score > entry.keyword_score {
                    entry.keyword_score = hit.score;
                }
            }
            Channel::Vector => {
                if entry.vector_score.map_or(true, |s| hit.score > s) {
                    entry.vector_score = Some(hit.score);
                }
            }
            Channel::Semantic => {
                if entry.semantic_score.map_or(true, |s| hit.score > s) {
                    entry.semantic_score = Some(hit.score);
                }
            }
        }
        ranking.push((hit.id.clone(), index + 1));
    }
    ranking
}

fn base_filters(query: &Query) -> Vec<FieldFilter> {
    query
        .repository
        .as_ref()
        .map(|repo| vec![FieldFilter::eq("repository", repo)])
        .unwrap_or_default()
}
