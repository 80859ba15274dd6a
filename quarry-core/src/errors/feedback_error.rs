/// Feedback collection errors.
#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("rank {rank} outside [1, {max}]")]
    RankOutOfRange { rank: u32, max: u32 },

    #[error("query fingerprint is not a valid fingerprint string")]
    MalformedFingerprint,

    #[error("feedback buffer full, record dropped")]
    BufferFull,

    #[error("feedback sink write failed: {reason}")]
    SinkWrite { reason: String },
}
