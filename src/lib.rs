//! Corrective retrieval (CRAG) search for student questions.
//!
//! A query flows through [`QueryAnalyzer`], [`QueryRewriter`], [`MultiQuerySearcher`],
//! [`ContextReranker`], [`QualityAssessor`] and [`CorrectiveFilter`]; [`CragPipeline`]
//! orchestrates the stages and is the entry point for callers.
//!
//! ## External services
//! Each upstream dependency sits behind a trait so it can be swapped or mocked:
//! - [`Embedder`] ([`OpenAiEmbedder`]) turns text into vectors
//! - [`VectorIndex`] ([`QdrantIndex`]) answers nearest-neighbour queries
//! - [`RerankModel`] ([`CrossEncoder`]) scores query/passage pairs
//! - [`CompletionModel`] ([`GenaiCompletion`]) rewrites queries
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod analysis;
pub mod assessment;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod hashing;
pub mod pipeline;
pub mod rewrite;
pub mod scoring;
pub mod search;
pub mod tool;
pub mod vectordb;

pub use analysis::{Complexity, EntityKind, QueryAnalysis, QueryAnalyzer, QueryType, UserContext};
pub use assessment::{
    ConfidenceLevel, CorrectiveFilter, FilterPolicy, QualityAssessor, QualitySignals,
    QualityThresholds,
};
pub use config::{Config, ConfigError};
pub use embedding::{
    CacheStats, CrossEncoder, CrossEncoderConfig, Embedder, EmbedderConfig, EmbeddingCache,
    EmbeddingError, OpenAiEmbedder, RerankModel, RerankerError,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::{MockRerankModel, StubEmbedder};
pub use hashing::{hash_content, hash_embedding_request, hash_to_u64, normalize_content};
pub use pipeline::{
    CragPipeline, CragResult, LivePipeline, PerformanceMetrics, PipelineError, PipelineMetrics,
    build_live_pipeline,
};
pub use rewrite::{
    Completion, CompletionModel, CompletionRequest, GenaiCompletion, KnowledgeBase, LlmError,
    QueryRewriter, RewriteOutcome,
};
#[cfg(any(test, feature = "mock"))]
pub use rewrite::MockCompletion;
pub use scoring::{ContextReranker, RerankOutcome, ScoringError};
pub use search::{MultiQuerySearcher, MultiSearchConfig, SearchResult, VectorSearchClient};
pub use tool::{HealthReport, HealthStatus, NO_RELEVANT_INFO, SearchTool, ToolOutcome, ToolOutput};
pub use vectordb::{IndexMatch, QdrantIndex, VectorDbError, VectorIndex};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorIndex;
