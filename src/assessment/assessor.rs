use std::collections::HashSet;

use tracing::{debug, instrument};

use super::config::QualityThresholds;
use super::types::{ConfidenceLevel, QualitySignals};
use crate::analysis::QueryAnalysis;
use crate::search::SearchResult;

/// Domain keywords counted when present in both the query and the top result.
pub const DOMAIN_KEYWORDS: &[&str] = &["cas", "interview", "visa", "process"];

/// Results inspected for lexical overlap.
const OVERLAP_WINDOW: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct QualityAssessor {
    thresholds: QualityThresholds,
}

impl QualityAssessor {
    pub fn new(thresholds: QualityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &QualityThresholds {
        &self.thresholds
    }

    /// Labels retrieval quality for `results` (assumed ranked best-first).
    #[instrument(skip_all, fields(results = results.len()))]
    pub fn assess(
        &self,
        query: &str,
        results: &[SearchResult],
        analysis: &QueryAnalysis,
    ) -> ConfidenceLevel {
        let Some(signals) = self.signals(query, results, analysis) else {
            return ConfidenceLevel::None;
        };
        let confidence = self.decide(&signals);

        debug!(
            top_score = signals.top_score,
            content_matches = signals.content_matches,
            keyword_hits = signals.keyword_hits,
            entities_found = signals.entities_found,
            confidence = %confidence,
            "Quality assessed"
        );
        confidence
    }

    /// Computes the assessment signals, or `None` when there are no results.
    pub fn signals(
        &self,
        query: &str,
        results: &[SearchResult],
        analysis: &QueryAnalysis,
    ) -> Option<QualitySignals> {
        let top = results.first()?;
        let top_content = top.content.to_lowercase();
        let query_lower = query.to_lowercase();

        let query_terms = terms(&query_lower);
        let required = query_terms.len() as f32 * self.thresholds.overlap_ratio;
        let content_matches = if query_terms.is_empty() {
            0
        } else {
            results
                .iter()
                .take(OVERLAP_WINDOW)
                .filter(|r| {
                    let content = r.content.to_lowercase();
                    let overlap = terms(&content).intersection(&query_terms).count();
                    overlap as f32 >= required
                })
                .count()
        };

        let entities_found = analysis
            .entity_values()
            .any(|entity| top_content.contains(&entity.to_lowercase()));

        let keyword_hits = DOMAIN_KEYWORDS
            .iter()
            .filter(|kw| query_lower.contains(*kw) && top_content.contains(*kw))
            .count();

        Some(QualitySignals {
            top_score: top.effective_score(),
            content_matches,
            entities_found,
            keyword_hits,
        })
    }

    /// Maps signals to a level; each tier requires its score floor plus supporting evidence.
    pub fn decide(&self, s: &QualitySignals) -> ConfidenceLevel {
        let t = &self.thresholds;
        if s.top_score >= t.high && (s.content_matches >= 2 || s.keyword_hits >= 2) {
            ConfidenceLevel::High
        } else if s.top_score >= t.medium
            && (s.content_matches >= 1 || s.keyword_hits >= 1 || s.entities_found)
        {
            ConfidenceLevel::Medium
        } else if s.top_score >= t.low || s.content_matches >= 1 || s.keyword_hits >= 1 {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::None
        }
    }
}

fn terms(text: &str) -> HashSet<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}
