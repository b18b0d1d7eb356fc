use tracing::{debug, warn};

use super::config::FilterPolicy;
use super::types::ConfidenceLevel;
use crate::search::SearchResult;

#[derive(Debug, Clone, Default)]
pub struct CorrectiveFilter {
    policy: FilterPolicy,
}

impl CorrectiveFilter {
    pub fn new(policy: FilterPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &FilterPolicy {
        &self.policy
    }

    /// Keeps results scoring above the confidence floor, capped per confidence level.
    ///
    /// Order is preserved. When candidates exist but none clear the floor, the first
    /// `override_keep` are kept instead, so non-empty input never yields empty output.
    pub fn filter(
        &self,
        results: Vec<SearchResult>,
        confidence: ConfidenceLevel,
        top_k: usize,
    ) -> Vec<SearchResult> {
        let top_k = top_k.max(1);
        let available = results.len();
        let min_score = self.policy.min_score(confidence);
        let max_results = self.policy.max_results(confidence, top_k, available);

        let mut kept: Vec<SearchResult> = results
            .iter()
            .filter(|r| r.effective_score() > min_score)
            .cloned()
            .collect();

        if kept.is_empty() && available > 0 {
            let keep = self.policy.override_keep.max(1).min(available);
            warn!(
                min_score,
                confidence = %confidence,
                keep,
                "No results passed the score floor, keeping top results anyway"
            );
            kept = results.into_iter().take(keep).collect();
        }

        kept.truncate(max_results);
        debug!(
            available,
            kept = kept.len(),
            max_results,
            confidence = %confidence,
            "Corrective filter applied"
        );
        kept
    }
}
