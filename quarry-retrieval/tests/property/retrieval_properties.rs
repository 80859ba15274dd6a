//! Property tests for fusion and ranking invariants.

use std::collections::HashMap;

use proptest::prelude::*;

use quarry_core::models::{DocumentPayload, EnhancedQuery, RetrievalResult, WeightVector};
use quarry_core::{Factor, Intent};
use quarry_retrieval::search::rrf_fusion::{self, StrategyRankings};
use quarry_retrieval::RankingPipeline;

fn documents(ids: &[String]) -> HashMap<String, RetrievalResult> {
    ids.iter()
        .map(|id| {
            (
                id.clone(),
                RetrievalResult::from_payload(id.clone(), DocumentPayload::default()),
            )
        })
        .collect()
}

fn ranked_list(ids: &[String]) -> Vec<(String, usize)> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| (id.clone(), i + 1))
        .collect()
}

prop_compose! {
    fn doc_ids()(n in 2usize..12) -> Vec<String> {
        (0..n).map(|i| format!("doc{i:02}")).collect()
    }
}

proptest! {
    /// Adding a strategy that ranks a document can never worsen that
    /// document's fused position.
    #[test]
    fn rrf_is_monotone_in_added_strategies(ids in doc_ids(), boosted_index in 0usize..12) {
        let boosted = ids[boosted_index % ids.len()].clone();
        let docs = documents(&ids);

        let base = StrategyRankings {
            keyword: Some(ranked_list(&ids)),
            ..Default::default()
        };
        let with_boost = StrategyRankings {
            keyword: Some(ranked_list(&ids)),
            vector: Some(vec![(boosted.clone(), 1)]),
            ..Default::default()
        };

        let before = rrf_fusion::fuse(&base, &docs, 60);
        let after = rrf_fusion::fuse(&with_boost, &docs, 60);

        let position = |fused: &[RetrievalResult]| {
            fused.iter().position(|r| r.id == boosted).unwrap()
        };
        prop_assert!(position(&after) <= position(&before));
    }

    /// Blended scores and all factor values stay in [0,1] for arbitrary
    /// backend scores, and the output order is deterministic.
    #[test]
    fn ranking_respects_bounds_and_determinism(
        scores in proptest::collection::vec((0.0f64..100.0, proptest::option::of(0.0f64..1.0)), 1..20)
    ) {
        let candidates: Vec<RetrievalResult> = scores
            .iter()
            .enumerate()
            .map(|(i, (keyword, vector))| {
                let mut c = RetrievalResult::from_payload(
                    format!("doc{i:02}"),
                    DocumentPayload::default(),
                );
                c.keyword_score = *keyword;
                c.vector_score = *vector;
                c
            })
            .collect();

        let enhanced = EnhancedQuery::passthrough("property query");
        let weights = WeightVector::default_for(Intent::Implement);
        let pipeline = RankingPipeline::new(10_240);

        let first = pipeline.rank(&candidates, &enhanced, &weights).unwrap();
        let second = pipeline.rank(&candidates, &enhanced, &weights).unwrap();

        for ranked in &first {
            let score = ranked.score.unwrap();
            prop_assert!((0.0..=1.0).contains(&score));
            for factor in Factor::ALL {
                let fs = ranked.factors.get(factor);
                prop_assert!((0.0..=1.0).contains(&fs.value));
                prop_assert!((0.0..=1.0).contains(&fs.confidence));
            }
        }

        let order_a: Vec<&str> = first.iter().map(|r| r.result.id.as_str()).collect();
        let order_b: Vec<&str> = second.iter().map(|r| r.result.id.as_str()).collect();
        prop_assert_eq!(order_a, order_b);
    }
}
