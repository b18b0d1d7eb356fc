use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{RerankModel, RerankerError};

type ScoreFn = dyn Fn(&str, &str) -> f32 + Send + Sync;

enum Behavior {
    Fixed(Vec<f32>),
    Scored(Arc<ScoreFn>),
    Failing,
    WrongLength,
}

/// Test double for [`RerankModel`].
pub struct MockRerankModel {
    behavior: Behavior,
    available: bool,
    calls: AtomicUsize,
}

impl std::fmt::Debug for MockRerankModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRerankModel")
            .field("available", &self.available)
            .field("calls", &self.calls.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl MockRerankModel {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            available: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Returns `scores[i]` for pair `i`; missing entries score 0.0.
    pub fn with_scores(scores: Vec<f32>) -> Self {
        Self::with_behavior(Behavior::Fixed(scores))
    }

    pub fn with_fn<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> f32 + Send + Sync + 'static,
    {
        Self::with_behavior(Behavior::Scored(Arc::new(f)))
    }

    pub fn failing() -> Self {
        Self::with_behavior(Behavior::Failing)
    }

    /// Returns one score fewer than requested.
    pub fn wrong_length() -> Self {
        Self::with_behavior(Behavior::WrongLength)
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RerankModel for MockRerankModel {
    fn is_available(&self) -> bool {
        self.available
    }

    fn predict(&self, pairs: &[(String, String)]) -> Result<Vec<f32>, RerankerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Fixed(scores) => Ok((0..pairs.len())
                .map(|i| scores.get(i).copied().unwrap_or(0.0))
                .collect()),
            Behavior::Scored(f) => Ok(pairs.iter().map(|(q, p)| f(q, p)).collect()),
            Behavior::Failing => Err(RerankerError::InferenceFailed {
                reason: "mock reranker configured to fail".to_string(),
            }),
            Behavior::WrongLength => Ok(vec![0.5; pairs.len().saturating_sub(1)]),
        }
    }
}
