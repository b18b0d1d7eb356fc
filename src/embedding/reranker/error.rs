use std::path::PathBuf;
use thiserror::Error;

/// Failures of the cross-encoder. The context reranker absorbs all of them by passing
/// vector scores through.
#[derive(Debug, Error)]
pub enum RerankerError {
    #[error("no cross-encoder at {path}")]
    ModelNotFound { path: PathBuf },

    #[error("cross-encoder could not be loaded: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("cross-encoder configuration rejected: {reason}")]
    InvalidConfig { reason: String },

    #[error("query/passage pair tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("cross-encoder forward pass failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("cross-encoder scored {actual} of {expected} pairs")]
    ScoreCountMismatch { expected: usize, actual: usize },
}

impl From<candle_core::Error> for RerankerError {
    fn from(err: candle_core::Error) -> Self {
        RerankerError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}
