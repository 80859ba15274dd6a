//! Learning loop integration: collector → sink → weight store.

use std::sync::Arc;

use chrono::Utc;

use quarry_core::config::{LearningConfig, RankingConfig};
use quarry_core::models::{
    DocumentPayload, FactorScore, FactorVector, FeedbackOutcome, FeedbackRecord, RankedResult,
    RetrievalResult, WeightVector,
};
use quarry_core::{Factor, Intent};
use quarry_learning::{
    FeedbackCollector, JsonlFeedbackSink, MemoryFeedbackSink, ServedRegistry, WeightStore,
};

const FP: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

fn served_result(id: &str) -> RankedResult {
    let mut factors = FactorVector::default();
    factors.set(Factor::TextRelevance, FactorScore::new(1.0, 1.0));
    factors.set(Factor::SemanticSimilarity, FactorScore::new(0.5, 1.0));
    RankedResult {
        result: RetrievalResult::from_payload(id.to_string(), DocumentPayload::default()),
        score: Some(0.7),
        factors,
        matched_patterns: Vec::new(),
        tie_break_rank: 1,
    }
}

fn click(intent: Intent) -> FeedbackRecord {
    FeedbackRecord {
        query_fingerprint: FP.to_string(),
        result_id: "doc-1".to_string(),
        rank: 1,
        outcome: FeedbackOutcome::Click,
        timestamp: Utc::now(),
        intent,
    }
}

fn setup() -> (Arc<WeightStore>, Arc<ServedRegistry>, Arc<MemoryFeedbackSink>, FeedbackCollector) {
    let store = Arc::new(WeightStore::new(
        &RankingConfig::default(),
        &LearningConfig::default(),
    ));
    let registry = Arc::new(ServedRegistry::default());
    let sink = Arc::new(MemoryFeedbackSink::new());
    let collector =
        FeedbackCollector::new(Some(sink.clone()), registry.clone(), store.clone());
    (store, registry, sink, collector)
}

#[tokio::test]
async fn flushed_records_reach_sink_and_store() {
    let (store, registry, sink, collector) = setup();
    registry.insert(FP, Intent::Implement, &[served_result("doc-1")]);

    for _ in 0..8 {
        collector.record(click(Intent::Implement)).unwrap();
    }
    let flushed = collector.flush().await.unwrap();
    assert_eq!(flushed, 8);
    assert_eq!(sink.records().len(), 8);
    assert_eq!(store.pending_len(Intent::Implement), 8);

    let before = store.weights_for(Intent::Implement);
    store.apply_pending();
    let after = store.weights_for(Intent::Implement);
    assert_ne!(before, after);
    assert!((after.sum() - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn feedback_without_served_entry_still_flushes() {
    let (store, _registry, sink, collector) = setup();

    // No served registration: no factor attribution, no weight change,
    // but the record is durably written.
    for _ in 0..6 {
        collector.record(click(Intent::Debug)).unwrap();
    }
    collector.flush().await.unwrap();
    assert_eq!(sink.records().len(), 6);

    let before = store.weights_for(Intent::Debug);
    store.apply_pending();
    assert_eq!(store.weights_for(Intent::Debug), before);
}

#[tokio::test]
async fn default_weights_follow_the_intent_tables() {
    let (store, _, _, _) = setup();
    for intent in Intent::ALL {
        assert_eq!(store.weights_for(intent), WeightVector::default_for(intent));
    }
}

#[tokio::test]
async fn configured_startup_weights_override_the_tables() {
    let ranking = RankingConfig {
        default_weights: Some(vec![0.2, 0.2, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1]),
        ..RankingConfig::default()
    };
    let store = WeightStore::new(&ranking, &LearningConfig::default());
    let weights = store.weights_for(Intent::Debug);
    assert!((weights.text_relevance - 0.2).abs() < 1e-9);
    assert!((weights.sum() - 1.0).abs() < 1e-9);
}

mod properties {
    use super::*;
    use proptest::prelude::*;
    use quarry_learning::update::{apply_batch, UpdateParams};
    use quarry_learning::FeedbackEvent;

    const PARAMS: UpdateParams = UpdateParams {
        eta: 0.1,
        delta_cap: 0.05,
        weight_min: 0.05,
        weight_max: 0.5,
    };

    fn outcome_from(index: u8) -> FeedbackOutcome {
        match index % 5 {
            0 => FeedbackOutcome::Click,
            1 => FeedbackOutcome::Copy,
            2 => FeedbackOutcome::NoClick,
            3 => FeedbackOutcome::ExplicitPositive,
            _ => FeedbackOutcome::ExplicitNegative,
        }
    }

    proptest! {
        /// Arbitrary feedback batches keep every invariant: bounds, sum,
        /// per-update delta cap.
        #[test]
        fn updates_preserve_invariants(
            batch in proptest::collection::vec(
                (proptest::array::uniform8(0.0f64..1.0), 0u8..5, 1u32..20),
                1..30,
            )
        ) {
            let start = WeightVector::default_for(Intent::Refactor);
            let events: Vec<FeedbackEvent> = batch
                .iter()
                .map(|(values, outcome, rank)| {
                    let mut factors = FactorVector::default();
                    for (factor, value) in Factor::ALL.into_iter().zip(values) {
                        factors.set(factor, FactorScore::new(*value, 1.0));
                    }
                    FeedbackEvent {
                        record: FeedbackRecord {
                            query_fingerprint: FP.to_string(),
                            result_id: "doc".into(),
                            rank: *rank,
                            outcome: outcome_from(*outcome),
                            timestamp: Utc::now(),
                            intent: Intent::Refactor,
                        },
                        factors: Some(factors),
                    }
                })
                .collect();

            let updated = apply_batch(&start, &events, &PARAMS);

            prop_assert!((updated.sum() - 1.0).abs() < 1e-9);
            for factor in Factor::ALL {
                let value = updated.get(factor);
                prop_assert!((PARAMS.weight_min..=PARAMS.weight_max).contains(&value));
                let delta = (value - start.get(factor)).abs();
                prop_assert!(delta <= PARAMS.delta_cap + 1e-12);
            }
        }
    }
}

#[tokio::test]
async fn jsonl_sink_round_trips_through_a_real_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback.jsonl");

    let store = Arc::new(WeightStore::new(
        &RankingConfig::default(),
        &LearningConfig::default(),
    ));
    let collector = FeedbackCollector::new(
        Some(Arc::new(JsonlFeedbackSink::new(&path))),
        Arc::new(ServedRegistry::default()),
        store,
    );

    collector.record(click(Intent::Test)).unwrap();
    collector.record(click(Intent::Test)).unwrap();
    collector.flush().await.unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 2);
    for line in contents.lines() {
        let record: FeedbackRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.query_fingerprint, FP);
    }
}
