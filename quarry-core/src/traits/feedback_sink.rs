use async_trait::async_trait;

use crate::errors::QuarryResult;
use crate::models::feedback::FeedbackRecord;

/// Append-only persistence for feedback records, one JSON object per line.
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    /// Append a batch atomically: either every record lands or none does.
    async fn append(&self, records: &[FeedbackRecord]) -> QuarryResult<()>;
}
