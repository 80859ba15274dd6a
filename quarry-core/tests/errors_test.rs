//! Error code and propagation-policy tests.

use quarry_core::errors::{BackendError, EmbeddingError, RankingError};
use quarry_core::QuarryError;

#[test]
fn codes_are_stable() {
    let cases: Vec<(QuarryError, &str)> = vec![
        (
            QuarryError::InvalidQuery {
                reason: "empty".into(),
            },
            "invalid_query",
        ),
        (
            QuarryError::BackendUnavailable {
                reason: "down".into(),
            },
            "backend_unavailable",
        ),
        (QuarryError::BackendOverloaded, "backend_overloaded"),
        (
            QuarryError::EmbeddingUnavailable {
                reason: "503".into(),
            },
            "embedding_unavailable",
        ),
        (
            QuarryError::RankingInvariantViolated {
                document_id: "d".into(),
                detail: "NaN".into(),
            },
            "ranking_invariant_violated",
        ),
        (
            QuarryError::ConfigInvalid {
                reason: "bad".into(),
            },
            "config_invalid",
        ),
        (QuarryError::Cancelled, "cancelled"),
    ];
    for (err, code) in cases {
        assert_eq!(err.code(), code);
    }
}

#[test]
fn retryability_follows_policy() {
    assert!(QuarryError::BackendOverloaded.retryable());
    assert!(QuarryError::BackendUnavailable { reason: "x".into() }.retryable());
    assert!(!QuarryError::InvalidQuery { reason: "x".into() }.retryable());
    assert!(!QuarryError::Cancelled.retryable());
    assert!(QuarryError::BackendOverloaded.retry_after().is_some());
    assert!(QuarryError::Cancelled.retry_after().is_none());
}

#[test]
fn backend_errors_map_to_top_level() {
    let err: QuarryError = BackendError::Overloaded.into();
    assert_eq!(err.code(), "backend_overloaded");

    let err: QuarryError = BackendError::Status { status: 503 }.into();
    assert_eq!(err.code(), "backend_unavailable");

    let err: QuarryError = BackendError::InvalidFilter {
        reason: "control character".into(),
    }
    .into();
    assert_eq!(err.code(), "invalid_query");
}

#[test]
fn dimension_mismatch_is_config_error() {
    let err: QuarryError = EmbeddingError::DimensionMismatch {
        expected: 1536,
        actual: 768,
    }
    .into();
    assert_eq!(err.code(), "config_invalid");

    let err: QuarryError = EmbeddingError::Status { status: 500 }.into();
    assert_eq!(err.code(), "embedding_unavailable");
}

#[test]
fn ranking_errors_carry_the_document() {
    let err: QuarryError = RankingError::NonFinite {
        document_id: "doc-7".into(),
        factor: "recency",
    }
    .into();
    match err {
        QuarryError::RankingInvariantViolated { document_id, .. } => {
            assert_eq!(document_id, "doc-7");
        }
        other => panic!("unexpected: {other:?}"),
    }
}
