//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `CRAG_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::assessment::QualityThresholds;
use crate::constants::{
    DEFAULT_COLLECTION_NAME, DEFAULT_EMBEDDING_CACHE_TTL_SECS, DEFAULT_EMBEDDING_DIM,
    DEFAULT_EMBEDDING_MODEL, DEFAULT_EMBEDDING_TIMEOUT_SECS, DEFAULT_HIGH_THRESHOLD,
    DEFAULT_KNOWLEDGE_BASE_NAME, DEFAULT_LOW_THRESHOLD, DEFAULT_MAX_SEARCH_WORKERS,
    DEFAULT_MEDIUM_THRESHOLD, DEFAULT_NAMESPACE, DEFAULT_REWRITE_MODEL,
    DEFAULT_REWRITE_TIMEOUT_SECS, DEFAULT_SEARCH_TIMEOUT_SECS, DEFAULT_TOP_K,
};
use crate::embedding::{DEFAULT_EMBEDDING_URL, EmbedderConfig};
use crate::search::MultiSearchConfig;

/// Default Qdrant URL used when `CRAG_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Environment variables that must be present for the live collaborators to work.
pub const REQUIRED_ENV_VARS: &[&str] = &[EmbedderConfig::ENV_API_KEY];

/// Pipeline configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CRAG_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,
    pub collection: String,
    /// Partition key every index query is scoped to.
    pub namespace: String,

    pub embedding_url: String,
    pub embedding_model: String,
    pub embedding_dim: usize,
    pub embedding_cache_ttl: Duration,
    pub embedding_timeout: Duration,

    pub rewrite_model: String,
    pub rewrite_timeout: Duration,

    /// Deadline for each parallel sub-search.
    pub search_timeout: Duration,
    pub max_search_workers: usize,

    /// Cross-encoder directory; unset means pass-through reranking.
    pub reranker_path: Option<PathBuf>,

    pub knowledge_base_name: String,
    pub top_k: usize,

    pub threshold_high: f32,
    pub threshold_medium: f32,
    pub threshold_low: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection: DEFAULT_COLLECTION_NAME.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            embedding_url: DEFAULT_EMBEDDING_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            embedding_cache_ttl: Duration::from_secs(DEFAULT_EMBEDDING_CACHE_TTL_SECS),
            embedding_timeout: Duration::from_secs(DEFAULT_EMBEDDING_TIMEOUT_SECS),
            rewrite_model: DEFAULT_REWRITE_MODEL.to_string(),
            rewrite_timeout: Duration::from_secs(DEFAULT_REWRITE_TIMEOUT_SECS),
            search_timeout: Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS),
            max_search_workers: DEFAULT_MAX_SEARCH_WORKERS,
            reranker_path: None,
            knowledge_base_name: DEFAULT_KNOWLEDGE_BASE_NAME.to_string(),
            top_k: DEFAULT_TOP_K,
            threshold_high: DEFAULT_HIGH_THRESHOLD,
            threshold_medium: DEFAULT_MEDIUM_THRESHOLD,
            threshold_low: DEFAULT_LOW_THRESHOLD,
        }
    }
}

impl Config {
    pub const ENV_QDRANT_URL: &'static str = "CRAG_QDRANT_URL";
    pub const ENV_COLLECTION: &'static str = "CRAG_COLLECTION";
    pub const ENV_NAMESPACE: &'static str = "CRAG_NAMESPACE";
    pub const ENV_EMBEDDING_URL: &'static str = "CRAG_EMBEDDING_URL";
    pub const ENV_EMBEDDING_MODEL: &'static str = "CRAG_EMBEDDING_MODEL";
    pub const ENV_EMBEDDING_DIM: &'static str = "CRAG_EMBEDDING_DIM";
    pub const ENV_EMBEDDING_CACHE_TTL_SECS: &'static str = "CRAG_EMBEDDING_CACHE_TTL_SECS";
    pub const ENV_EMBEDDING_TIMEOUT_SECS: &'static str = "CRAG_EMBEDDING_TIMEOUT_SECS";
    pub const ENV_REWRITE_MODEL: &'static str = "CRAG_REWRITE_MODEL";
    pub const ENV_REWRITE_TIMEOUT_SECS: &'static str = "CRAG_REWRITE_TIMEOUT_SECS";
    pub const ENV_SEARCH_TIMEOUT_SECS: &'static str = "CRAG_SEARCH_TIMEOUT_SECS";
    pub const ENV_MAX_SEARCH_WORKERS: &'static str = "CRAG_MAX_SEARCH_WORKERS";
    pub const ENV_RERANKER_PATH: &'static str = "CRAG_RERANKER_PATH";
    pub const ENV_KNOWLEDGE_BASE_NAME: &'static str = "CRAG_KNOWLEDGE_BASE_NAME";
    pub const ENV_TOP_K: &'static str = "CRAG_TOP_K";
    pub const ENV_THRESHOLD_HIGH: &'static str = "CRAG_THRESHOLD_HIGH";
    pub const ENV_THRESHOLD_MEDIUM: &'static str = "CRAG_THRESHOLD_MEDIUM";
    pub const ENV_THRESHOLD_LOW: &'static str = "CRAG_THRESHOLD_LOW";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let d = Self::default();

        Ok(Self {
            qdrant_url: Self::parse_string_from_env(Self::ENV_QDRANT_URL, d.qdrant_url),
            collection: Self::parse_string_from_env(Self::ENV_COLLECTION, d.collection),
            namespace: Self::parse_string_from_env(Self::ENV_NAMESPACE, d.namespace),
            embedding_url: Self::parse_string_from_env(Self::ENV_EMBEDDING_URL, d.embedding_url),
            embedding_model: Self::parse_string_from_env(
                Self::ENV_EMBEDDING_MODEL,
                d.embedding_model,
            ),
            embedding_dim: Self::parse_number_from_env(Self::ENV_EMBEDDING_DIM, d.embedding_dim)?,
            embedding_cache_ttl: Self::parse_secs_from_env(
                Self::ENV_EMBEDDING_CACHE_TTL_SECS,
                d.embedding_cache_ttl,
            )?,
            embedding_timeout: Self::parse_secs_from_env(
                Self::ENV_EMBEDDING_TIMEOUT_SECS,
                d.embedding_timeout,
            )?,
            rewrite_model: Self::parse_string_from_env(Self::ENV_REWRITE_MODEL, d.rewrite_model),
            rewrite_timeout: Self::parse_secs_from_env(
                Self::ENV_REWRITE_TIMEOUT_SECS,
                d.rewrite_timeout,
            )?,
            search_timeout: Self::parse_secs_from_env(
                Self::ENV_SEARCH_TIMEOUT_SECS,
                d.search_timeout,
            )?,
            max_search_workers: Self::parse_number_from_env(
                Self::ENV_MAX_SEARCH_WORKERS,
                d.max_search_workers,
            )?,
            reranker_path: Self::parse_optional_path_from_env(Self::ENV_RERANKER_PATH),
            knowledge_base_name: Self::parse_string_from_env(
                Self::ENV_KNOWLEDGE_BASE_NAME,
                d.knowledge_base_name,
            ),
            top_k: Self::parse_number_from_env(Self::ENV_TOP_K, d.top_k)?,
            threshold_high: Self::parse_number_from_env(Self::ENV_THRESHOLD_HIGH, d.threshold_high)?,
            threshold_medium: Self::parse_number_from_env(
                Self::ENV_THRESHOLD_MEDIUM,
                d.threshold_medium,
            )?,
            threshold_low: Self::parse_number_from_env(Self::ENV_THRESHOLD_LOW, d.threshold_low)?,
        })
    }

    /// Checks invariants and the reranker path (does not touch the network).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding_dim == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_EMBEDDING_DIM,
                reason: "must be > 0".to_string(),
            });
        }
        if self.top_k == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_TOP_K,
                reason: "must be > 0".to_string(),
            });
        }
        if self.max_search_workers == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_MAX_SEARCH_WORKERS,
                reason: "must be > 0".to_string(),
            });
        }
        if self.namespace.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_NAMESPACE,
                reason: "cannot be empty".to_string(),
            });
        }
        if self.knowledge_base_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_KNOWLEDGE_BASE_NAME,
                reason: "cannot be empty".to_string(),
            });
        }
        self.quality_thresholds()
            .validate()
            .map_err(|reason| ConfigError::InvalidValue {
                name: Self::ENV_THRESHOLD_HIGH,
                reason,
            })?;

        if let Some(ref path) = self.reranker_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    pub fn quality_thresholds(&self) -> QualityThresholds {
        QualityThresholds {
            high: self.threshold_high,
            medium: self.threshold_medium,
            low: self.threshold_low,
            ..Default::default()
        }
    }

    /// Embedding client settings; the API key is read from `OPENAI_API_KEY`.
    pub fn embedder_config(&self) -> EmbedderConfig {
        EmbedderConfig {
            base_url: self.embedding_url.clone(),
            model: self.embedding_model.clone(),
            dimension: self.embedding_dim,
            api_key: None,
            timeout: self.embedding_timeout,
        }
        .with_env_api_key()
    }

    pub fn multi_search_config(&self) -> MultiSearchConfig {
        MultiSearchConfig {
            max_workers: self.max_search_workers,
            search_timeout: self.search_timeout,
        }
    }

    /// Names from [`REQUIRED_ENV_VARS`] that are unset or blank.
    pub fn missing_required_env() -> Vec<&'static str> {
        REQUIRED_ENV_VARS
            .iter()
            .copied()
            .filter(|name| env::var(name).map_or(true, |v| v.trim().is_empty()))
            .collect()
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_number_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidNumber {
                    name: var_name,
                    value: value.clone(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_secs_from_env(var_name: &'static str, default: Duration) -> Result<Duration, ConfigError> {
        Self::parse_number_from_env(var_name, default.as_secs()).map(Duration::from_secs)
    }
}
