//! Data model for the query pipeline.
//!
//! Per-request records (`Query` through `RankedResult`) are owned by the
//! pipeline coordinator and dropped at response time. `WeightVector` is
//! shared across requests and mutated only by the weight store's updater.

pub mod backend;
pub mod enhanced_query;
pub mod factor_vector;
pub mod feedback;
pub mod query;
pub mod ranked_result;
pub mod response;
pub mod retrieval_result;
pub mod weight_vector;

pub use backend::{BackendHit, DocumentPayload, FieldFilter, FilterOp, KeywordRequest,
    SemanticRequest, VectorRequest};
pub use enhanced_query::{ContextFeatures, EnhancedQuery};
pub use factor_vector::{Factor, FactorScore, FactorVector};
pub use feedback::{FeedbackOutcome, FeedbackRecord};
pub use query::{DetailLevel, Query};
pub use ranked_result::RankedResult;
pub use response::{Explanation, FactorContribution, NoResultsReason, ResultView, SearchResponse,
    StageTimings};
pub use retrieval_result::{HighlightSpan, QualitySignals, RetrievalResult};
pub use weight_vector::{WeightVector, FACTOR_COUNT};
