use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::analysis::UserContext;
use crate::assessment::ConfidenceLevel;
use crate::embedding::{Embedder, RerankModel};
use crate::pipeline::{CragPipeline, CragResult};
use crate::rewrite::CompletionModel;
use crate::search::SearchResult;
use crate::vectordb::VectorIndex;

/// Returned in place of passages when nothing usable was found.
pub const NO_RELEVANT_INFO: &str = "NO_RELEVANT_INFO";
pub const SEARCH_TOOL_NAME: &str = "knowledge_search";
pub const SEARCH_TOOL_TOP_K: usize = 6;
pub const MAX_RENDERED_RESULTS: usize = 3;
/// Passages must be longer than this (after trimming) to be rendered.
pub const MIN_RENDERED_CHARS: usize = 50;
pub const RESULT_SEPARATOR: &str = "\n\n---\n\n";

/// Fixed-shape metadata describing one tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolOutcome {
    pub tools_used: Vec<String>,
    pub response_time_ms: u64,
    pub confidence: ConfidenceLevel,
    pub results_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolOutput {
    /// Rendered passages, or [`NO_RELEVANT_INFO`].
    pub text: String,
    pub outcome: ToolOutcome,
}

impl ToolOutput {
    pub fn is_fallback(&self) -> bool {
        self.text == NO_RELEVANT_INFO
    }
}

/// Search tool handed to the answering assistant.
pub struct SearchTool<E, I, R, L> {
    pipeline: Arc<CragPipeline<E, I, R, L>>,
}

impl<E, I, R, L> Clone for SearchTool<E, I, R, L> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

impl<E, I, R, L> SearchTool<E, I, R, L>
where
    E: Embedder,
    I: VectorIndex,
    R: RerankModel,
    L: CompletionModel,
{
    pub fn new(pipeline: Arc<CragPipeline<E, I, R, L>>) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &CragPipeline<E, I, R, L> {
        &self.pipeline
    }

    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn run(&self, query: &str, user_id: &str) -> ToolOutput {
        let started = Instant::now();
        let context = UserContext::new(user_id);

        let (text, confidence, results_count) =
            match self.pipeline.search(query, &context, SEARCH_TOOL_TOP_K).await {
                Ok(result) => {
                    log_summary(user_id, &result);
                    let text = render_results(&result.results)
                        .unwrap_or_else(|| NO_RELEVANT_INFO.to_string());
                    (text, result.confidence_level, result.results.len())
                }
                Err(e) => {
                    warn!(error = %e, "Search tool failed");
                    (NO_RELEVANT_INFO.to_string(), ConfidenceLevel::None, 0)
                }
            };

        if text == NO_RELEVANT_INFO {
            warn!(confidence = %confidence, results_count, "Search tool returning fallback");
        }

        ToolOutput {
            text,
            outcome: ToolOutcome {
                tools_used: vec![SEARCH_TOOL_NAME.to_string()],
                response_time_ms: started.elapsed().as_millis() as u64,
                confidence,
                results_count,
            },
        }
    }
}

/// Joins up to three substantial passages, or `None` when none qualify.
pub fn render_results(results: &[SearchResult]) -> Option<String> {
    let passages: Vec<&str> = results
        .iter()
        .take(MAX_RENDERED_RESULTS)
        .map(|r| r.content.trim())
        .filter(|c| c.chars().count() > MIN_RENDERED_CHARS)
        .collect();

    if passages.is_empty() {
        None
    } else {
        Some(passages.join(RESULT_SEPARATOR))
    }
}

fn log_summary(user_id: &str, result: &CragResult) {
    info!(
        user_id,
        original = %result.original_query,
        enhanced = %result.final_query,
        rewritten = result.query_rewritten,
        confidence = %result.confidence_level,
        results = result.results.len(),
        elapsed_secs = result.search_time_seconds,
        strategy = result.search_strategy_used,
        "Search tool summary"
    );
}
