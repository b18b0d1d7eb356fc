use chrono::Utc;
use serde::Serialize;

use tracing::warn;

use crate::config::Config;
use crate::embedding::{Embedder, RerankModel};
use crate::pipeline::{CragPipeline, PerformanceMetrics};
use crate::rewrite::CompletionModel;
use crate::vectordb::VectorIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    Unhealthy,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchEngineHealth {
    pub status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<PerformanceMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchEngineHealth {
    pub fn healthy(metrics: PerformanceMetrics) -> Self {
        Self {
            status: ComponentStatus::Healthy,
            metrics: Some(metrics),
            error: None,
        }
    }

    /// The pipeline exists but its vector index failed a health check.
    pub fn unhealthy(metrics: PerformanceMetrics, error: impl Into<String>) -> Self {
        Self {
            status: ComponentStatus::Unhealthy,
            metrics: Some(metrics),
            error: Some(error.into()),
        }
    }

    /// No pipeline could be built.
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            status: ComponentStatus::Unavailable,
            metrics: None,
            error: Some(error.into()),
        }
    }

    /// Probes the index behind `pipeline` and snapshots its metrics.
    pub async fn probe<E, I, R, L>(pipeline: &CragPipeline<E, I, R, L>) -> Self
    where
        E: Embedder,
        I: VectorIndex,
        R: RerankModel,
        L: CompletionModel,
    {
        let metrics = pipeline.performance_metrics();
        match pipeline.check_index().await {
            Ok(()) => Self::healthy(metrics),
            Err(e) => {
                warn!(error = %e, "Vector index health check failed");
                Self::unhealthy(metrics, e.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentHealth {
    pub status: ComponentStatus,
    pub missing_variables: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthComponents {
    pub search_engine: SearchEngineHealth,
    pub environment: EnvironmentHealth,
}

/// Point-in-time health of the search stack.
///
/// A search engine that is missing or cannot reach its index degrades the report; missing
/// required environment variables make it unhealthy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    /// RFC 3339, UTC.
    pub timestamp: String,
    pub components: HealthComponents,
}

impl HealthReport {
    /// Builds a report from a search-engine probe and the current process environment.
    pub fn check(search_engine: SearchEngineHealth) -> Self {
        Self::from_parts(search_engine, Config::missing_required_env())
    }

    pub fn from_parts(
        search_engine: SearchEngineHealth,
        missing_variables: Vec<&'static str>,
    ) -> Self {
        let mut status = HealthStatus::Healthy;
        if search_engine.status != ComponentStatus::Healthy {
            status = HealthStatus::Degraded;
        }

        let environment = EnvironmentHealth {
            status: if missing_variables.is_empty() {
                ComponentStatus::Healthy
            } else {
                status = HealthStatus::Unhealthy;
                ComponentStatus::Unhealthy
            },
            missing_variables,
        };

        Self {
            status,
            timestamp: Utc::now().to_rfc3339(),
            components: HealthComponents {
                search_engine,
                environment,
            },
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}
