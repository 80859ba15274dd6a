//! User feedback on returned results. Append-only once recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_FEEDBACK_RANK;
use crate::errors::FeedbackError;
use crate::intent::Intent;

/// What the user did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackOutcome {
    Click,
    Copy,
    NoClick,
    ExplicitPositive,
    ExplicitNegative,
}

/// One feedback event, tied to a served query by its fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Fingerprint of the query that produced the result list. Opaque;
    /// validated for shape, never parsed.
    pub query_fingerprint: String,
    pub result_id: String,
    /// 1-based rank in the displayed list.
    pub rank: u32,
    pub outcome: FeedbackOutcome,
    pub timestamp: DateTime<Utc>,
    /// Intent classified at query time.
    pub intent: Intent,
}

impl FeedbackRecord {
    /// Reject records the collector must not buffer.
    pub fn validate(&self) -> Result<(), FeedbackError> {
        if self.rank == 0 || self.rank > MAX_FEEDBACK_RANK {
            return Err(FeedbackError::RankOutOfRange {
                rank: self.rank,
                max: MAX_FEEDBACK_RANK,
            });
        }
        if !is_fingerprint(&self.query_fingerprint) {
            return Err(FeedbackError::MalformedFingerprint);
        }
        Ok(())
    }
}

/// Fingerprints are 64 lowercase hex characters (a blake3 digest).
pub fn is_fingerprint(s: &str) -> bool {
    s.len() == 64
        && s.bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(rank: u32, fingerprint: &str) -> FeedbackRecord {
        FeedbackRecord {
            query_fingerprint: fingerprint.to_string(),
            result_id: "doc-1".to_string(),
            rank,
            outcome: FeedbackOutcome::Click,
            timestamp: Utc::now(),
            intent: Intent::Understand,
        }
    }

    const FP: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn valid_record_passes() {
        assert!(record(1, FP).validate().is_ok());
        assert!(record(1000, FP).validate().is_ok());
    }

    #[test]
    fn rank_bounds_enforced() {
        assert!(record(0, FP).validate().is_err());
        assert!(record(1001, FP).validate().is_err());
    }

    #[test]
    fn fingerprint_shape_enforced() {
        assert!(record(1, "not-a-fingerprint").validate().is_err());
        assert!(record(1, &FP.to_uppercase()).validate().is_err());
    }
}
