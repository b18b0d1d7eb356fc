use thiserror::Error;

use crate::embedding::RerankerError;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("reranker error: {0}")]
    Reranker(#[from] RerankerError),

    #[error("rerank call exceeded {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("rerank task failed: {reason}")]
    TaskFailed { reason: String },
}
