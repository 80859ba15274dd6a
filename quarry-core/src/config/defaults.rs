//! Named defaults for every recognized configuration key.

pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 60;
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 500;
pub const DEFAULT_CACHE_ENABLED: bool = true;

pub const DEFAULT_EXPANSION_FACTOR: usize = 3;
pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_BM25_ONLY: bool = false;

pub const DEFAULT_WEIGHT_MIN: f64 = 0.05;
pub const DEFAULT_WEIGHT_MAX: f64 = 0.5;
pub const DEFAULT_PER_UPDATE_DELTA_CAP: f64 = 0.05;

pub const DEFAULT_MIN_BATCH: usize = 5;
pub const DEFAULT_ETA: f64 = 0.1;
pub const DEFAULT_TICK_SECONDS: u64 = 300;
pub const DEFAULT_ROLLBACK_WINDOW: usize = 100;
pub const DEFAULT_ROLLBACK_DROP_THRESHOLD: f64 = 0.15;

pub const DEFAULT_CLASSIFY_MS: u64 = 50;
pub const DEFAULT_ENHANCE_MS: u64 = 100;
pub const DEFAULT_RETRIEVE_MS: u64 = 2000;
pub const DEFAULT_RANK_MS: u64 = 500;
pub const DEFAULT_BACKEND_CALL_MS: u64 = 30_000;

pub const DEFAULT_SNIPPET_SCAN_BYTES: usize = 10_240;

pub const DEFAULT_EMBEDDING_DIMENSION: usize = 1536;
pub const DEFAULT_EMBEDDING_CACHE_ENTRIES: u64 = 10_000;
pub const DEFAULT_EMBEDDING_CACHE_TTL_SECONDS: u64 = 3600;

pub const DEFAULT_RETRY_BASE_MS: u64 = 200;
pub const DEFAULT_RETRY_FACTOR: f64 = 2.0;
pub const DEFAULT_RETRY_JITTER: f64 = 0.2;
pub const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 4;
pub const DEFAULT_PENDING_LIMIT: usize = 64;

pub const DEFAULT_FEEDBACK_BUFFER_CAPACITY: usize = 10_000;
