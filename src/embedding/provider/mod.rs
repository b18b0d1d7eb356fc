//! Embedding generation behind the [`Embedder`] seam.
//!
//! [`OpenAiEmbedder`] talks to any OpenAI-compatible `/embeddings` endpoint. Use
//! [`StubEmbedder`] for tests without network access.

pub mod config;
#[cfg(any(test, feature = "mock"))]
pub mod stub;

#[cfg(test)]
mod tests;

pub use config::{DEFAULT_EMBEDDING_URL, EmbedderConfig};
#[cfg(any(test, feature = "mock"))]
pub use stub::StubEmbedder;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::embedding::error::EmbeddingError;

/// Text → fixed-dimension vector.
pub trait Embedder: Send + Sync {
    /// Model identifier, part of the embedding cache key.
    fn model_name(&self) -> &str;

    /// Output dimension `D`.
    fn dimension(&self) -> usize;

    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EmbeddingError>> + Send;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Clone)]
/// HTTP client for an OpenAI-compatible embedding service.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    config: EmbedderConfig,
}

impl std::fmt::Debug for OpenAiEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbedder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OpenAiEmbedder {
    pub fn new(config: EmbedderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &EmbedderConfig {
        &self.config
    }

    #[instrument(skip(self, text), fields(text_len = text.len(), model = %self.config.model))]
    async fn request_embedding(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let body = EmbeddingRequest {
            model: &self.config.model,
            input: text,
        };

        let mut request = self.client.post(self.config.endpoint()).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: EmbeddingResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::InvalidResponse {
                    reason: e.to_string(),
                })?;

        let full = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbeddingError::InvalidResponse {
                reason: "response contained no embeddings".to_string(),
            })?;

        let vector = truncate_embedding(full, self.config.dimension)?;
        debug!(dim = vector.len(), "Embedding received");
        Ok(vector)
    }
}

impl Embedder for OpenAiEmbedder {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.request_embedding(text).await
    }
}

/// Truncates a native embedding to `dimension` values.
pub fn truncate_embedding(
    mut vector: Vec<f32>,
    dimension: usize,
) -> Result<Vec<f32>, EmbeddingError> {
    if vector.len() < dimension {
        return Err(EmbeddingError::DimensionMismatch {
            expected: dimension,
            actual: vector.len(),
        });
    }
    vector.truncate(dimension);
    Ok(vector)
}
