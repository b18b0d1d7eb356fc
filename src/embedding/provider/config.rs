use std::time::Duration;

use crate::constants::{
    DEFAULT_EMBEDDING_DIM, DEFAULT_EMBEDDING_MODEL, DEFAULT_EMBEDDING_TIMEOUT_SECS,
};
use crate::embedding::error::EmbeddingError;

/// Default OpenAI-compatible API base.
pub const DEFAULT_EMBEDDING_URL: &str = "https://api.openai.com/v1";

#[derive(Clone)]
/// Configuration for [`OpenAiEmbedder`](super::OpenAiEmbedder).
pub struct EmbedderConfig {
    /// API base; `/embeddings` is appended.
    pub base_url: String,
    pub model: String,
    /// Output dimension; longer service vectors are truncated to it.
    pub dimension: usize,
    pub api_key: Option<String>,
    /// Whole-request timeout for the HTTP client.
    pub timeout: Duration,
}

impl std::fmt::Debug for EmbedderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedderConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("dimension", &self.dimension)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EMBEDDING_URL.to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            dimension: DEFAULT_EMBEDDING_DIM,
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_EMBEDDING_TIMEOUT_SECS),
        }
    }
}

impl EmbedderConfig {
    pub const ENV_API_KEY: &'static str = "OPENAI_API_KEY";

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Reads the API key from `OPENAI_API_KEY` when one is not set explicitly.
    pub fn with_env_api_key(mut self) -> Self {
        if self.api_key.is_none() {
            self.api_key = std::env::var(Self::ENV_API_KEY)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
        }
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/embeddings", self.base_url.trim_end_matches('/'))
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.dimension == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "dimension must be > 0".to_string(),
            });
        }
        if self.model.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model cannot be empty".to_string(),
            });
        }
        if self.base_url.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "base_url cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}
