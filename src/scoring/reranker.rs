use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, instrument, warn};

use super::error::ScoringError;
use crate::analysis::UserContext;
use crate::constants::{DEFAULT_RERANK_TIMEOUT_SECS, RERANK_CONTENT_CHARS};
use crate::embedding::RerankModel;
use crate::embedding::utils::truncate_chars;
use crate::search::SearchResult;

/// Added when an international student's result mentions "international".
pub const INTERNATIONAL_BOOST: f32 = 0.5;
/// Added when the result mentions the student's study level.
pub const STUDY_LEVEL_BOOST: f32 = 0.3;

/// How the last rerank call was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RerankOutcome {
    Reranked,
    /// No model configured (or it reports itself unavailable).
    NoModel,
    /// The model failed or timed out; scores were passed through.
    Degraded,
    /// Nothing to rerank.
    Empty,
}

pub struct ContextReranker<R> {
    model: Option<Arc<R>>,
    timeout: Duration,
}

impl<R> std::fmt::Debug for ContextReranker<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextReranker")
            .field("model", &self.model.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl<R: RerankModel> ContextReranker<R> {
    pub fn new(model: Option<Arc<R>>) -> Self {
        Self {
            model,
            timeout: Duration::from_secs(DEFAULT_RERANK_TIMEOUT_SECS),
        }
    }

    /// A reranker that always passes scores through.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_available(&self) -> bool {
        self.model.as_ref().is_some_and(|m| m.is_available())
    }

    /// Returns `results` with `rerank_score` set on every element, sorted descending by it.
    pub async fn rerank(
        &self,
        query: &str,
        results: Vec<SearchResult>,
        context: &UserContext,
    ) -> Vec<SearchResult> {
        self.rerank_with_outcome(query, results, context).await.0
    }

    #[instrument(skip_all, fields(candidates = results.len()))]
    pub async fn rerank_with_outcome(
        &self,
        query: &str,
        mut results: Vec<SearchResult>,
        context: &UserContext,
    ) -> (Vec<SearchResult>, RerankOutcome) {
        if results.is_empty() {
            return (results, RerankOutcome::Empty);
        }

        let Some(model) = self.model.as_ref().filter(|m| m.is_available()) else {
            debug!("No rerank model, passing scores through");
            pass_through(&mut results);
            return (results, RerankOutcome::NoModel);
        };

        let started = Instant::now();
        let augmented = context_query(query, context);
        let pairs: Vec<(String, String)> = results
            .iter()
            .map(|r| {
                (
                    augmented.clone(),
                    truncate_chars(&r.content, RERANK_CONTENT_CHARS).to_string(),
                )
            })
            .collect();

        let scores = match self.predict(Arc::clone(model), pairs).await {
            Ok(scores) => scores,
            Err(e) => {
                warn!(error = %e, "Reranking failed, falling back to vector scores");
                pass_through(&mut results);
                return (results, RerankOutcome::Degraded);
            }
        };

        let international = context.international();
        let study_level = context
            .study_level
            .as_deref()
            .map(str::to_lowercase)
            .filter(|s| !s.is_empty());

        for (result, score) in results.iter_mut().zip(scores) {
            let content = result.content.to_lowercase();
            let mut boosted = score;
            if international && content.contains("international") {
                boosted += INTERNATIONAL_BOOST;
            }
            if let Some(level) = &study_level
                && content.contains(level.as_str())
            {
                boosted += STUDY_LEVEL_BOOST;
            }
            result.rerank_score = Some(boosted);
        }

        results.sort_by(|a, b| b.effective_score().total_cmp(&a.effective_score()));

        debug!(
            top_score = results.first().map(SearchResult::effective_score),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Reranking complete"
        );
        (results, RerankOutcome::Reranked)
    }

    async fn predict(
        &self,
        model: Arc<R>,
        pairs: Vec<(String, String)>,
    ) -> Result<Vec<f32>, ScoringError> {
        let expected = pairs.len();
        let task = tokio::task::spawn_blocking(move || model.predict(&pairs));

        let scores = tokio::time::timeout(self.timeout, task)
            .await
            .map_err(|_| ScoringError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            })?
            .map_err(|e| ScoringError::TaskFailed {
                reason: e.to_string(),
            })??;

        if scores.len() != expected {
            return Err(crate::embedding::RerankerError::ScoreCountMismatch {
                expected,
                actual: scores.len(),
            }
            .into());
        }
        Ok(scores)
    }
}

/// Query text sent to the cross-encoder, extended with what is known about the student.
pub fn context_query(query: &str, context: &UserContext) -> String {
    let mut augmented = query.to_string();
    if context.international() {
        augmented.push_str(" international student");
    }
    if let Some(level) = context.study_level.as_deref().filter(|s| !s.is_empty()) {
        augmented.push(' ');
        augmented.push_str(level);
    }
    augmented
}

fn pass_through(results: &mut [SearchResult]) {
    for result in results {
        result.rerank_score = Some(result.score);
    }
}
