use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("top_k must be at least 1, got {top_k}")]
    InvalidTopK { top_k: usize },

    #[error("embedding client setup failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("vector index setup failed: {0}")]
    VectorDb(#[from] VectorDbError),
}
