//! Cross-cutting, shared constants.
//!
//! The score thresholds below were tuned against one embedding/rerank model pair. They are
//! defaults only: [`crate::assessment::QualityThresholds`] and
//! [`crate::assessment::FilterPolicy`] carry the values actually used at runtime.

/// Embedding dimension requested from the embedding service (vectors are truncated to it).
pub const DEFAULT_EMBEDDING_DIM: usize = 512;

/// Embedding model name used by the default OpenAI-compatible client.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Chat model used for query rewriting.
pub const DEFAULT_REWRITE_MODEL: &str = "gpt-4o-mini";

/// Vector collection holding the knowledge base.
pub const DEFAULT_COLLECTION_NAME: &str = "uws-knowledge";

/// Partition key scoping every index query to one knowledge-base snapshot.
pub const DEFAULT_NAMESPACE: &str = "website-2025";

/// Short name of the knowledge base, prepended by the fallback rewriter.
pub const DEFAULT_KNOWLEDGE_BASE_NAME: &str = "UWS";

/// Default number of results returned by one pipeline call.
pub const DEFAULT_TOP_K: usize = 10;

/// Embedding cache time-to-live.
pub const DEFAULT_EMBEDDING_CACHE_TTL_SECS: u64 = 300;

/// Upper bound on cached embeddings.
pub const DEFAULT_EMBEDDING_CACHE_CAPACITY: u64 = 10_000;

pub const DEFAULT_REWRITE_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_EMBEDDING_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RERANK_TIMEOUT_SECS: u64 = 10;

/// Upper bound on concurrently running per-query searches.
pub const DEFAULT_MAX_SEARCH_WORKERS: usize = 3;

/// Extra matches requested per sub-search on top of the even split of `top_k`.
pub const OVERFETCH_PER_QUERY: usize = 3;

/// Candidates whose answer text is not longer than this are dropped.
pub const MIN_CONTENT_CHARS: usize = 2;

/// Passage budget (in characters) sent to the cross-encoder per candidate.
pub const RERANK_CONTENT_CHARS: usize = 500;

/// Maximum number of rewritten queries.
pub const MAX_REWRITTEN_QUERIES: usize = 3;

pub const DEFAULT_HIGH_THRESHOLD: f32 = 0.7;
pub const DEFAULT_MEDIUM_THRESHOLD: f32 = 0.5;
pub const DEFAULT_LOW_THRESHOLD: f32 = 0.3;

/// Fraction of query words a passage must share to count as a content match.
pub const CONTENT_OVERLAP_RATIO: f32 = 0.3;

/// Results kept anyway when nothing passes the corrective filter.
pub const DEFAULT_OVERRIDE_KEEP: usize = 2;
