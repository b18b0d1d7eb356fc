//! Context-aware reranking.
//!
//! [`ContextReranker`] scores `(query, passage)` pairs with a [`RerankModel`] in one batch,
//! adds user-context boosts and re-sorts. Any failure, or the absence of a model, degrades
//! to `rerank_score = score` with the input order preserved.
//!
//! [`RerankModel`]: crate::embedding::RerankModel

pub mod error;
pub mod reranker;

#[cfg(test)]
mod tests;

pub use error::ScoringError;
pub use reranker::{
    ContextReranker, INTERNATIONAL_BOOST, RerankOutcome, STUDY_LEVEL_BOOST, context_query,
};
