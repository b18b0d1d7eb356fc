use serde::{Deserialize, Serialize};

/// Discrete retrieval-quality label. Ordered `None < Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    None,
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::None => "none",
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signals the assessor derived from the top results.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct QualitySignals {
    pub top_score: f32,
    pub content_matches: usize,
    pub entities_found: bool,
    pub keyword_hits: usize,
}
