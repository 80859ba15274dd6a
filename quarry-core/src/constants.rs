//! Engine-wide constants that are not configuration.

/// Maximum accepted query length in bytes. Longer queries are rejected
/// with `invalid_query` before any stage runs.
pub const MAX_QUERY_BYTES: usize = 4096;

/// Maximum number of query variants the enhancer may emit (original included).
pub const MAX_QUERY_VARIANTS: usize = 10;

/// RRF smoothing constant. Higher k reduces the influence of top ranks
/// from any single retrieval strategy.
pub const RRF_K: u32 = 60;

/// Number of top function/class names followed during dependency expansion.
pub const DEPENDENCY_TOP_NAMES: usize = 3;

/// Candidate-set size above which factor computation runs in parallel.
pub const PARALLEL_RANK_THRESHOLD: usize = 1000;

/// Highest rank accepted on a feedback record.
pub const MAX_FEEDBACK_RANK: u32 = 1000;

/// How many characters of query text may appear in logs.
pub const LOGGED_QUERY_PREFIX_CHARS: usize = 256;

/// Number of weight vectors retained for rollback.
pub const WEIGHT_HISTORY_LEN: usize = 10;

/// Queries for which a rolled-back weight vector stays pinned.
pub const ROLLBACK_COOLDOWN_QUERIES: u64 = 50;
