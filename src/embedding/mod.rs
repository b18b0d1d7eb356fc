//! Embedding and model plumbing.
//!
//! - [`provider`] turns text into vectors (remote service or stub).
//! - [`cache`] memoizes embeddings with a TTL.
//! - [`reranker`] provides cross-encoder scoring used by [`crate::scoring`].

mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
pub mod cache;
pub mod provider;
pub mod reranker;
/// Tokenizer loading helpers.
pub mod utils;

pub use cache::{CacheStats, EmbeddingCache};
pub use error::EmbeddingError;
pub use provider::{DEFAULT_EMBEDDING_URL, Embedder, EmbedderConfig, OpenAiEmbedder};
#[cfg(any(test, feature = "mock"))]
pub use provider::StubEmbedder;
pub use reranker::{CrossEncoder, CrossEncoderConfig, RerankModel, RerankerError};
#[cfg(any(test, feature = "mock"))]
pub use reranker::MockRerankModel;
