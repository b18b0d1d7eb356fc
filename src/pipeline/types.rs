use serde::Serialize;

use crate::assessment::ConfidenceLevel;
use crate::search::SearchResult;

/// Strategy label when multi-query search found nothing.
pub const STRATEGY_MULTI_QUERY: &str = "multi_query_parallel";
/// Strategy label for the full rerank/assess/filter path.
pub const STRATEGY_CRAG: &str = "crag_parallel_rerank_context";

/// Output of one pipeline call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CragResult {
    /// Post-filter results, best first.
    pub results: Vec<SearchResult>,
    pub confidence_level: ConfidenceLevel,
    pub search_strategy_used: &'static str,
    pub query_rewritten: bool,
    pub original_query: String,
    pub final_query: String,
    pub search_time_seconds: f64,
    pub tokens_used: u64,
    /// Set when nothing was found or confidence is `none`.
    pub fallback_triggered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PerformanceMetrics {
    pub total_searches: u64,
    pub average_response_time_seconds: f64,
    pub tokens_consumed: u64,
    pub cache_hit_rate: f64,
}
