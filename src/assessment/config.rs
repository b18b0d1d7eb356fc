use crate::constants::{
    CONTENT_OVERLAP_RATIO, DEFAULT_HIGH_THRESHOLD, DEFAULT_LOW_THRESHOLD,
    DEFAULT_MEDIUM_THRESHOLD, DEFAULT_OVERRIDE_KEEP,
};

use super::types::ConfidenceLevel;

/// Score cut-offs for the confidence decision (0-1 similarity scale).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityThresholds {
    pub high: f32,
    pub medium: f32,
    pub low: f32,
    /// Fraction of query words a passage must share to count as a content match.
    pub overlap_ratio: f32,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            high: DEFAULT_HIGH_THRESHOLD,
            medium: DEFAULT_MEDIUM_THRESHOLD,
            low: DEFAULT_LOW_THRESHOLD,
            overlap_ratio: CONTENT_OVERLAP_RATIO,
        }
    }
}

impl QualityThresholds {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [("high", self.high), ("medium", self.medium), ("low", self.low)] {
            if !value.is_finite() {
                return Err(format!("{name} threshold must be finite"));
            }
        }
        if !(self.high >= self.medium && self.medium >= self.low) {
            return Err(format!(
                "thresholds must satisfy high >= medium >= low, got {}/{}/{}",
                self.high, self.medium, self.low
            ));
        }
        if !(0.0..=1.0).contains(&self.overlap_ratio) {
            return Err(format!(
                "overlap_ratio must be between 0.0 and 1.0, got {}",
                self.overlap_ratio
            ));
        }
        Ok(())
    }
}

/// Per-confidence score floors for the corrective filter, plus the override keep-count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterPolicy {
    pub high_min_score: f32,
    pub medium_min_score: f32,
    pub low_min_score: f32,
    pub none_min_score: f32,
    /// Results kept when nothing clears the floor.
    pub override_keep: usize,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            high_min_score: 0.30,
            medium_min_score: 0.25,
            low_min_score: 0.20,
            none_min_score: 0.10,
            override_keep: DEFAULT_OVERRIDE_KEEP,
        }
    }
}

impl FilterPolicy {
    /// Strict lower bound a result's score must exceed.
    pub fn min_score(&self, confidence: ConfidenceLevel) -> f32 {
        match confidence {
            ConfidenceLevel::High => self.high_min_score,
            ConfidenceLevel::Medium => self.medium_min_score,
            ConfidenceLevel::Low => self.low_min_score,
            ConfidenceLevel::None => self.none_min_score,
        }
    }

    /// Maximum number of results kept for `confidence`, given `available` candidates.
    pub fn max_results(&self, confidence: ConfidenceLevel, top_k: usize, available: usize) -> usize {
        match confidence {
            ConfidenceLevel::High => top_k,
            ConfidenceLevel::Medium => (top_k / 2).max(3),
            ConfidenceLevel::Low => (top_k / 3).max(2).min(3),
            ConfidenceLevel::None => available.min(2),
        }
    }
}
