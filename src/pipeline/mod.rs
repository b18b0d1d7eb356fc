//! The CRAG orchestrator.
//!
//! One call runs `analyze -> rewrite -> search -> rerank -> assess -> filter`. Every
//! upstream failure is absorbed by the stage that hit it, so [`CragPipeline::search`] only
//! fails on an invalid `top_k`.

pub mod error;
pub mod live;
pub mod metrics;
pub mod types;


pub use error::PipelineError;
pub use live::{LivePipeline, build_live_pipeline};
pub use metrics::PipelineMetrics;
pub use types::{CragResult, PerformanceMetrics, STRATEGY_CRAG, STRATEGY_MULTI_QUERY};

use std::time::Instant;

use tracing::{debug, info, instrument};

use crate::analysis::{QueryAnalyzer, UserContext};
use crate::assessment::{
    ConfidenceLevel, CorrectiveFilter, FilterPolicy, QualityAssessor, QualityThresholds,
};
use crate::embedding::{Embedder, RerankModel};
use crate::rewrite::{CompletionModel, QueryRewriter};
use crate::scoring::ContextReranker;
use crate::search::MultiQuerySearcher;
use crate::vectordb::{VectorDbError, VectorIndex};

/// Candidates requested from multi-query search per final result.
const CANDIDATE_MULTIPLIER: usize = 2;

pub struct CragPipeline<E, I, R, L> {
    analyzer: QueryAnalyzer,
    rewriter: QueryRewriter<L>,
    searcher: MultiQuerySearcher<E, I>,
    reranker: ContextReranker<R>,
    assessor: QualityAssessor,
    filter: CorrectiveFilter,
    metrics: PipelineMetrics,
}

impl<E, I, R, L> std::fmt::Debug for CragPipeline<E, I, R, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CragPipeline")
            .field("rewriter", &self.rewriter)
            .field("reranker", &self.reranker)
            .field("assessor", &self.assessor)
            .field("filter", &self.filter)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl<E, I, R, L> CragPipeline<E, I, R, L>
where
    E: Embedder,
    I: VectorIndex,
    R: RerankModel,
    L: CompletionModel,
{
    pub fn new(
        rewriter: QueryRewriter<L>,
        searcher: MultiQuerySearcher<E, I>,
        reranker: ContextReranker<R>,
    ) -> Self {
        Self {
            analyzer: QueryAnalyzer::new(),
            rewriter,
            searcher,
            reranker,
            assessor: QualityAssessor::default(),
            filter: CorrectiveFilter::default(),
            metrics: PipelineMetrics::new(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: QualityThresholds) -> Self {
        self.assessor = QualityAssessor::new(thresholds);
        self
    }

    pub fn with_filter_policy(mut self, policy: FilterPolicy) -> Self {
        self.filter = CorrectiveFilter::new(policy);
        self
    }

    pub fn searcher(&self) -> &MultiQuerySearcher<E, I> {
        &self.searcher
    }

    pub fn rewriter(&self) -> &QueryRewriter<L> {
        &self.rewriter
    }

    pub fn reranker(&self) -> &ContextReranker<R> {
        &self.reranker
    }

    /// Runs one CRAG search.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InvalidTopK`] when `top_k` is zero. Nothing else is surfaced.
    #[instrument(skip(self, query, context), fields(query_len = query.len()))]
    pub async fn search(
        &self,
        query: &str,
        context: &UserContext,
        top_k: usize,
    ) -> Result<CragResult, PipelineError> {
        if top_k == 0 {
            return Err(PipelineError::InvalidTopK { top_k });
        }
        let started = Instant::now();

        let stage = Instant::now();
        let analysis = self.analyzer.analyze(query, context);
        debug!(
            elapsed_ms = stage.elapsed().as_millis() as u64,
            query_type = %analysis.primary_type,
            complexity = analysis.complexity.as_str(),
            "Stage analyze complete"
        );

        let stage = Instant::now();
        let rewrite = self.rewriter.rewrite(query, &analysis, context).await;
        debug!(
            elapsed_ms = stage.elapsed().as_millis() as u64,
            queries = rewrite.queries.len(),
            used_fallback = rewrite.used_fallback,
            "Stage rewrite complete"
        );

        let final_query = rewrite
            .queries
            .first()
            .cloned()
            .unwrap_or_else(|| query.to_string());
        let query_rewritten = final_query != query;

        let stage = Instant::now();
        let candidates = self
            .searcher
            .search_many(&rewrite.queries, top_k * CANDIDATE_MULTIPLIER)
            .await;
        debug!(
            elapsed_ms = stage.elapsed().as_millis() as u64,
            candidates = candidates.len(),
            "Stage search complete"
        );

        if candidates.is_empty() {
            let elapsed = started.elapsed().as_secs_f64();
            self.metrics.record(elapsed, rewrite.tokens_used);
            info!(
                confidence = %ConfidenceLevel::None,
                results = 0,
                tokens_used = rewrite.tokens_used,
                elapsed_ms = (elapsed * 1000.0) as u64,
                "CRAG search found no candidates"
            );
            return Ok(CragResult {
                results: Vec::new(),
                confidence_level: ConfidenceLevel::None,
                search_strategy_used: STRATEGY_MULTI_QUERY,
                query_rewritten,
                original_query: query.to_string(),
                final_query,
                search_time_seconds: elapsed,
                tokens_used: rewrite.tokens_used,
                fallback_triggered: true,
            });
        }

        let stage = Instant::now();
        let reranked = self.reranker.rerank(query, candidates, context).await;
        debug!(
            elapsed_ms = stage.elapsed().as_millis() as u64,
            candidates = reranked.len(),
            "Stage rerank complete"
        );

        let stage = Instant::now();
        let confidence = self.assessor.assess(query, &reranked, &analysis);
        debug!(
            elapsed_ms = stage.elapsed().as_millis() as u64,
            confidence = %confidence,
            "Stage assess complete"
        );

        let stage = Instant::now();
        let results = self.filter.filter(reranked, confidence, top_k);
        debug!(
            elapsed_ms = stage.elapsed().as_millis() as u64,
            results = results.len(),
            "Stage filter complete"
        );

        let elapsed = started.elapsed().as_secs_f64();
        self.metrics.record(elapsed, rewrite.tokens_used);
        info!(
            confidence = %confidence,
            results = results.len(),
            query_rewritten,
            tokens_used = rewrite.tokens_used,
            elapsed_ms = (elapsed * 1000.0) as u64,
            "CRAG search complete"
        );

        Ok(CragResult {
            results,
            confidence_level: confidence,
            search_strategy_used: STRATEGY_CRAG,
            query_rewritten,
            original_query: query.to_string(),
            final_query,
            search_time_seconds: elapsed,
            tokens_used: rewrite.tokens_used,
            fallback_triggered: confidence == ConfidenceLevel::None,
        })
    }

    /// Probes the vector index backing this pipeline.
    pub async fn check_index(&self) -> Result<(), VectorDbError> {
        self.searcher.client().index().health_check().await
    }

    /// Rolling counters since construction plus the embedding cache hit rate.
    pub fn performance_metrics(&self) -> PerformanceMetrics {
        let (total_searches, average_response_time_seconds, tokens_consumed) =
            self.metrics.snapshot();
        PerformanceMetrics {
            total_searches,
            average_response_time_seconds,
            tokens_consumed,
            cache_hit_rate: self.searcher.client().cache_hit_rate(),
        }
    }
}
