use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, instrument, warn};

use super::types::SearchResult;
use crate::embedding::{EmbeddingCache, Embedder};
use crate::vectordb::{IndexMatch, VectorIndex};

/// Embedding plus a single index query, with both failure modes absorbed.
///
/// Embedding failures yield an empty vector; an empty vector never reaches the index, and
/// index failures yield zero matches.
pub struct VectorSearchClient<E, I> {
    embedder: E,
    index: I,
    cache: EmbeddingCache,
    namespace: String,
}

impl<E, I> std::fmt::Debug for VectorSearchClient<E, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorSearchClient")
            .field("namespace", &self.namespace)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl<E: Embedder, I: VectorIndex> VectorSearchClient<E, I> {
    pub fn new(embedder: E, index: I, namespace: impl Into<String>, cache_ttl: Duration) -> Self {
        Self {
            embedder,
            index,
            cache: EmbeddingCache::new(cache_ttl),
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    /// Returns the (cached) embedding of `text`, or an empty vector if the service failed.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn embed(&self, text: &str) -> Arc<Vec<f32>> {
        let model = self.embedder.model_name();
        let dimension = self.embedder.dimension();

        if let Some(vector) = self.cache.get(model, dimension, text) {
            debug!("Embedding cache hit");
            return vector;
        }

        let started = Instant::now();
        match self.embedder.embed(text).await {
            Ok(vector) => {
                let vector = Arc::new(vector);
                self.cache.insert(model, dimension, text, Arc::clone(&vector));
                debug!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Embedding generated"
                );
                vector
            }
            Err(e) => {
                warn!(error = %e, "Embedding failed, returning empty vector");
                Arc::new(Vec::new())
            }
        }
    }

    /// Queries the index in this client's namespace. Never fails.
    pub async fn query(&self, vector: &[f32], top_k: usize) -> Vec<IndexMatch> {
        if vector.is_empty() {
            debug!("Empty query vector, skipping index call");
            return Vec::new();
        }

        match self
            .index
            .query(vector.to_vec(), top_k as u64, &self.namespace)
            .await
        {
            Ok(matches) => matches,
            Err(e) => {
                warn!(error = %e, namespace = %self.namespace, "Index query failed");
                Vec::new()
            }
        }
    }

    /// Embeds `text`, queries the index and keeps the matches with usable content.
    pub async fn search(&self, text: &str, top_k: usize) -> Vec<SearchResult> {
        let vector = self.embed(text).await;
        self.query(&vector, top_k)
            .await
            .into_iter()
            .filter_map(SearchResult::from_match)
            .collect()
    }

    pub fn cache_hit_rate(&self) -> f64 {
        self.cache.hit_rate()
    }
}
