use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// `CRAG_*` numeric variable that does not parse.
    #[error("{name}='{value}' is not a valid number: {reason}")]
    InvalidNumber {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{name} rejected: {reason}")]
    InvalidValue { name: &'static str, reason: String },

    #[error("reranker path {path} does not exist")]
    PathNotFound { path: PathBuf },

    #[error("reranker path {path} is not a directory")]
    NotADirectory { path: PathBuf },
}
