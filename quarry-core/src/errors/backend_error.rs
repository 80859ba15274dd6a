/// Search backend client errors.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("http transport failed: {reason}")]
    Transport { reason: String },

    #[error("backend returned status {status}")]
    Status { status: u16 },

    #[error("backend call timed out after {millis} ms")]
    Timeout { millis: u64 },

    #[error("pending queue full, request rejected")]
    Overloaded,

    #[error("invalid filter expression: {reason}")]
    InvalidFilter { reason: String },

    #[error("malformed backend response: {reason}")]
    MalformedResponse { reason: String },
}
