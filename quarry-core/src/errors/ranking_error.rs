/// Ranking subsystem errors. Always a programming or data error, never
/// a transient condition; the pipeline falls back to backend order.
#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    #[error("non-finite value in factor {factor} for document {document_id}")]
    NonFinite {
        document_id: String,
        factor: &'static str,
    },

    #[error("factor {factor} out of [0,1] ({value}) for document {document_id}")]
    OutOfBounds {
        document_id: String,
        factor: &'static str,
        value: f64,
    },
}
