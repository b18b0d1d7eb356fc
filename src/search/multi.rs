use std::collections::HashMap;
use std::time::{Duration, Instant};

use futures_util::StreamExt;
use futures_util::stream;
use tracing::{debug, instrument, warn};

use super::client::VectorSearchClient;
use super::types::SearchResult;
use crate::constants::{DEFAULT_MAX_SEARCH_WORKERS, DEFAULT_SEARCH_TIMEOUT_SECS, OVERFETCH_PER_QUERY};
use crate::embedding::Embedder;
use crate::hashing::hash_content;
use crate::vectordb::VectorIndex;

#[derive(Debug, Clone, Copy)]
pub struct MultiSearchConfig {
    /// Upper bound on concurrently running sub-searches.
    pub max_workers: usize,
    /// Per sub-search deadline.
    pub search_timeout: Duration,
}

impl Default for MultiSearchConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_SEARCH_WORKERS,
            search_timeout: Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS),
        }
    }
}

/// Fans rewritten queries out concurrently and merges the results.
#[derive(Debug)]
pub struct MultiQuerySearcher<E, I> {
    client: VectorSearchClient<E, I>,
    config: MultiSearchConfig,
}

impl<E: Embedder, I: VectorIndex> MultiQuerySearcher<E, I> {
    pub fn new(client: VectorSearchClient<E, I>, config: MultiSearchConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &VectorSearchClient<E, I> {
        &self.client
    }

    pub fn config(&self) -> &MultiSearchConfig {
        &self.config
    }

    /// Runs one search per query and returns at most `top_k` deduplicated results in
    /// descending score order. Failed or timed-out sub-searches contribute nothing.
    #[instrument(skip(self, queries), fields(queries = queries.len()))]
    pub async fn search_many(&self, queries: &[String], top_k: usize) -> Vec<SearchResult> {
        if queries.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let started = Instant::now();
        let per_query = top_k / queries.len() + OVERFETCH_PER_QUERY;
        let workers = queries.len().min(self.config.max_workers.max(1));
        let deadline = self.config.search_timeout;

        let batches: Vec<Vec<SearchResult>> = stream::iter(0..queries.len())
            .map(|idx| async move {
                let query = &queries[idx];
                match tokio::time::timeout(deadline, self.client.search(query, per_query)).await {
                    Ok(results) => {
                        debug!(query_idx = idx, results = results.len(), "Sub-search complete");
                        results
                    }
                    Err(_) => {
                        warn!(
                            query_idx = idx,
                            timeout_secs = deadline.as_secs_f64(),
                            "Sub-search timed out"
                        );
                        Vec::new()
                    }
                }
            })
            .buffer_unordered(workers)
            .collect()
            .await;

        let merged = merge_results(batches, top_k);
        debug!(
            results = merged.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Multi-query search complete"
        );
        merged
    }
}

/// Deduplicates by normalized content (keeping the higher score), sorts by score
/// descending with content as a tie-break, and truncates to `top_k`.
pub fn merge_results(batches: Vec<Vec<SearchResult>>, top_k: usize) -> Vec<SearchResult> {
    let mut unique: HashMap<[u8; 32], SearchResult> = HashMap::new();
    for result in batches.into_iter().flatten() {
        let key = hash_content(&result.content);
        match unique.get(&key) {
            Some(existing) if existing.score >= result.score => {}
            _ => {
                unique.insert(key, result);
            }
        }
    }

    let mut merged: Vec<SearchResult> = unique.into_values().collect();
    merged.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.content.cmp(&b.content))
    });
    merged.truncate(top_k);
    merged
}
