use std::path::PathBuf;

/// Token budget per (query, passage) pair.
pub const MAX_SEQ_LEN: usize = 512;

#[derive(Debug, Clone, Default)]
pub struct CrossEncoderConfig {
    /// Directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    /// `None` disables model reranking.
    pub model_path: Option<PathBuf>,
}

impl CrossEncoderConfig {
    pub const ENV_MODEL_PATH: &'static str = "CRAG_RERANKER_PATH";

    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { model_path: None }
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref path) = self.model_path
            && path.as_os_str().is_empty()
        {
            return Err("model_path cannot be empty when provided".to_string());
        }
        Ok(())
    }

    pub fn from_env() -> Self {
        let model_path = std::env::var(Self::ENV_MODEL_PATH)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self { model_path }
    }
}
