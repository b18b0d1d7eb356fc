//! Cross-encoder relevance scoring.
//!
//! [`RerankModel`] is the seam the context reranker calls through; [`CrossEncoder`] is the
//! candle-backed implementation.

pub mod config;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use config::{CrossEncoderConfig, MAX_SEQ_LEN};
pub use error::RerankerError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockRerankModel;

use candle_core::Tensor;
use tokenizers::Tokenizer;
use tracing::{debug, info, instrument};

use crate::embedding::bert::CrossEncoderModel;
use crate::embedding::device::{device_label, select_device};
use crate::embedding::utils::load_pair_tokenizer;

/// Scores (query, passage) pairs; higher means more relevant.
///
/// Implementations are synchronous (model inference is CPU/GPU bound); callers run them
/// on a blocking thread.
pub trait RerankModel: Send + Sync + 'static {
    fn is_available(&self) -> bool {
        true
    }

    /// One score per pair, in input order.
    fn predict(&self, pairs: &[(String, String)]) -> Result<Vec<f32>, RerankerError>;
}

pub struct CrossEncoder {
    device: candle_core::Device,
    model: CrossEncoderModel,
    tokenizer: Tokenizer,
}

impl std::fmt::Debug for CrossEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossEncoder")
            .field("device", &device_label(&self.device))
            .finish_non_exhaustive()
    }
}

impl CrossEncoder {
    /// Loads the model named by `config`, or returns `Ok(None)` when no path is configured.
    pub fn load(config: &CrossEncoderConfig) -> Result<Option<Self>, RerankerError> {
        config
            .validate()
            .map_err(|reason| RerankerError::InvalidConfig { reason })?;

        let Some(model_path) = config.model_path.as_ref() else {
            info!("No reranker model path configured, reranking disabled");
            return Ok(None);
        };

        if !model_path.exists() {
            return Err(RerankerError::ModelNotFound {
                path: model_path.clone(),
            });
        }
        for required in ["config.json", "model.safetensors"] {
            if !model_path.join(required).exists() {
                return Err(RerankerError::ModelLoadFailed {
                    reason: format!("Missing {} in {}", required, model_path.display()),
                });
            }
        }

        let device = select_device();
        info!(
            model_path = %model_path.display(),
            device = device_label(&device),
            "Loading cross-encoder"
        );

        let model = CrossEncoderModel::load(model_path, &device).map_err(|e| {
            RerankerError::ModelLoadFailed {
                reason: format!("Failed to load BERT model: {}", e),
            }
        })?;
        let tokenizer = load_pair_tokenizer(model_path, MAX_SEQ_LEN).map_err(|e| {
            RerankerError::ModelLoadFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;

        Ok(Some(Self {
            device,
            model,
            tokenizer,
        }))
    }

    pub fn device(&self) -> &candle_core::Device {
        &self.device
    }

    fn batch_tensor(&self, rows: Vec<u32>, batch: usize) -> Result<Tensor, RerankerError> {
        let seq_len = if batch == 0 { 0 } else { rows.len() / batch };
        Ok(Tensor::from_vec(rows, (batch, seq_len), &self.device)?)
    }
}

impl RerankModel for CrossEncoder {
    #[instrument(skip(self, pairs), fields(pairs = pairs.len()))]
    fn predict(&self, pairs: &[(String, String)]) -> Result<Vec<f32>, RerankerError> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        let inputs: Vec<(&str, &str)> = pairs
            .iter()
            .map(|(q, p)| (q.as_str(), p.as_str()))
            .collect();
        let encodings = self.tokenizer.encode_batch(inputs, true).map_err(|e| {
            RerankerError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        let batch = encodings.len();
        let mut ids = Vec::new();
        let mut type_ids = Vec::new();
        let mut mask = Vec::new();
        for enc in &encodings {
            ids.extend_from_slice(enc.get_ids());
            type_ids.extend_from_slice(enc.get_type_ids());
            mask.extend_from_slice(enc.get_attention_mask());
        }

        let ids = self.batch_tensor(ids, batch)?;
        let type_ids = self.batch_tensor(type_ids, batch)?;
        let mask = self.batch_tensor(mask, batch)?;

        let logits = self.model.forward(&ids, &type_ids, &mask)?;
        let scores = logits.flatten_all()?.to_vec1::<f32>()?;

        if scores.len() != pairs.len() {
            return Err(RerankerError::ScoreCountMismatch {
                expected: pairs.len(),
                actual: scores.len(),
            });
        }

        debug!(
            top = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max),
            "Cross-encoder batch scored"
        );
        Ok(scores)
    }
}
