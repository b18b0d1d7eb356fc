use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::MIN_CONTENT_CHARS;
use crate::vectordb::IndexMatch;

/// One retrieved passage candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub content: String,
    /// Raw vector-similarity score.
    pub score: f32,
    /// Cross-encoder score (plus context boosts); set by the reranker.
    pub rerank_score: Option<f32>,
    pub metadata: Map<String, Value>,
    pub source: Option<String>,
}

impl SearchResult {
    pub fn new(content: impl Into<String>, score: f32) -> Self {
        Self {
            content: content.into(),
            score,
            rerank_score: None,
            metadata: Map::new(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_rerank_score(mut self, rerank_score: f32) -> Self {
        self.rerank_score = Some(rerank_score);
        self
    }

    /// Builds a result from an index match, or `None` when its `answer` is missing or too
    /// short to be useful.
    pub fn from_match(item: IndexMatch) -> Option<Self> {
        let content = item.answer()?.to_string();
        if content.chars().count() <= MIN_CONTENT_CHARS {
            return None;
        }
        let source = item.source().map(str::to_string);

        Some(Self {
            content,
            score: item.score,
            rerank_score: None,
            metadata: item.metadata,
            source,
        })
    }

    /// Rerank score when present, raw score otherwise.
    #[inline]
    pub fn effective_score(&self) -> f32 {
        self.rerank_score.unwrap_or(self.score)
    }
}
