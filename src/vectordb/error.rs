use thiserror::Error;

/// Vector index failures. Search absorbs them as zero matches.
#[derive(Debug, Error)]
pub enum VectorDbError {
    #[error("vector index unreachable at '{url}': {message}")]
    ConnectionFailed { url: String, message: String },

    #[error("query on '{collection}' failed: {message}")]
    QueryFailed { collection: String, message: String },
}
