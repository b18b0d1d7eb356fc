//! Wiring of the production collaborators.

use std::sync::Arc;

use tracing::{info, warn};

use super::CragPipeline;
use super::error::PipelineError;
use crate::config::Config;
use crate::constants::DEFAULT_KNOWLEDGE_BASE_NAME;
use crate::embedding::{CrossEncoder, CrossEncoderConfig, OpenAiEmbedder};
use crate::rewrite::{GenaiCompletion, KnowledgeBase, QueryRewriter};
use crate::scoring::ContextReranker;
use crate::search::{MultiQuerySearcher, VectorSearchClient};
use crate::vectordb::QdrantIndex;

/// Pipeline over OpenAI embeddings, Qdrant, a candle cross-encoder and a genai chat model.
pub type LivePipeline = CragPipeline<OpenAiEmbedder, QdrantIndex, CrossEncoder, GenaiCompletion>;

/// Builds a [`LivePipeline`] from `config`.
///
/// Nothing here touches the network; unreachable services surface later as degraded
/// search results. A reranker directory that cannot be loaded disables reranking.
pub fn build_live_pipeline(config: &Config) -> Result<LivePipeline, PipelineError> {
    let embedder = OpenAiEmbedder::new(config.embedder_config())?;
    let index = QdrantIndex::new(&config.qdrant_url, &config.collection)?;
    let client = VectorSearchClient::new(
        embedder,
        index,
        config.namespace.clone(),
        config.embedding_cache_ttl,
    );
    let searcher = MultiQuerySearcher::new(client, config.multi_search_config());

    let rerank_config = match &config.reranker_path {
        Some(path) => CrossEncoderConfig::new(path.clone()),
        None => CrossEncoderConfig::disabled(),
    };
    let reranker = match CrossEncoder::load(&rerank_config) {
        Ok(model) => ContextReranker::new(model.map(Arc::new)),
        Err(e) => {
            warn!(error = %e, "Cross-encoder failed to load, continuing without reranking");
            ContextReranker::disabled()
        }
    };

    let knowledge_base = if config.knowledge_base_name == DEFAULT_KNOWLEDGE_BASE_NAME {
        KnowledgeBase::default()
    } else {
        KnowledgeBase::new(
            config.knowledge_base_name.clone(),
            config.knowledge_base_name.clone(),
        )
    };
    let rewriter = QueryRewriter::new(GenaiCompletion::new(config.rewrite_model.clone()), knowledge_base)
        .with_timeout(config.rewrite_timeout);

    info!(
        qdrant_url = %config.qdrant_url,
        collection = %config.collection,
        namespace = %config.namespace,
        reranker = reranker.is_available(),
        rewrite_model = %config.rewrite_model,
        "CRAG pipeline initialized"
    );

    Ok(CragPipeline::new(rewriter, searcher, reranker).with_thresholds(config.quality_thresholds()))
}
