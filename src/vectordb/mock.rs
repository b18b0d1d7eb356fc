use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::vectordb::{IndexMatch, VectorDbError, VectorIndex};

/// In-memory [`VectorIndex`] for tests.
///
/// Resolution order per query: a failure flag, then an exact-vector response, then the
/// fixed match list, then cosine search over stored points.
#[derive(Default)]
pub struct MockVectorIndex {
    fixed: Option<Vec<IndexMatch>>,
    responses: Vec<(Vec<f32>, Vec<IndexMatch>)>,
    points: Vec<MockStoredPoint>,
    failing: bool,
    failing_vectors: Vec<Vec<f32>>,
    delay: Option<Duration>,
    vector_delays: Vec<(Vec<f32>, Duration)>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    namespaces: Mutex<Vec<String>>,
}

#[derive(Clone)]
struct MockStoredPoint {
    vector: Vec<f32>,
    namespace: String,
    item: IndexMatch,
}

impl MockVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every query returns `matches` (truncated to `top_k`).
    pub fn with_matches(matches: Vec<IndexMatch>) -> Self {
        Self {
            fixed: Some(matches),
            ..Self::default()
        }
    }

    /// Queries whose vector equals one of the keys return the paired matches; others
    /// return nothing.
    pub fn with_responses(responses: Vec<(Vec<f32>, Vec<IndexMatch>)>) -> Self {
        Self {
            responses,
            fixed: Some(Vec::new()),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Sleeps before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Sleeps before answering queries for `vector` only; overrides [`Self::with_delay`].
    pub fn with_vector_delay(mut self, vector: Vec<f32>, delay: Duration) -> Self {
        self.vector_delays.push((vector, delay));
        self
    }

    /// Fails queries for `vector` only.
    pub fn with_vector_failure(mut self, vector: Vec<f32>) -> Self {
        self.failing_vectors.push(vector);
        self
    }

    /// Stores a point for cosine search (used when no fixed matches are configured).
    pub fn insert(&mut self, vector: Vec<f32>, namespace: &str, item: IndexMatch) {
        self.points.push(MockStoredPoint {
            vector,
            namespace: namespace.to_string(),
            item,
        });
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of queries observed running at once.
    pub fn max_concurrency(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Namespaces seen by `query`, in call order.
    pub fn namespaces(&self) -> Vec<String> {
        self.namespaces.lock().clone()
    }

    fn answer(&self, vector: &[f32], top_k: usize, namespace: &str) -> Vec<IndexMatch> {
        if let Some((_, matches)) = self.responses.iter().find(|(key, _)| key == vector) {
            return matches.iter().take(top_k).cloned().collect();
        }
        if let Some(fixed) = &self.fixed {
            return fixed.iter().take(top_k).cloned().collect();
        }

        let mut scored: Vec<IndexMatch> = self
            .points
            .iter()
            .filter(|p| p.namespace == namespace)
            .map(|p| IndexMatch {
                score: cosine_similarity(vector, &p.vector),
                ..p.item.clone()
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        scored
    }
}

impl VectorIndex for MockVectorIndex {
    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        namespace: &str,
    ) -> Result<Vec<IndexMatch>, VectorDbError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.namespaces.lock().push(namespace.to_string());

        let _guard = InFlight::enter(&self.in_flight, &self.max_in_flight);

        let delay = self
            .vector_delays
            .iter()
            .find(|(key, _)| *key == vector)
            .map(|(_, delay)| *delay)
            .or(self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing || self.failing_vectors.contains(&vector) {
            return Err(VectorDbError::QueryFailed {
                collection: "mock".to_string(),
                message: "mock index configured to fail".to_string(),
            });
        }

        Ok(self.answer(&vector, top_k as usize, namespace))
    }

    async fn health_check(&self) -> Result<(), VectorDbError> {
        if self.failing {
            return Err(VectorDbError::ConnectionFailed {
                url: "mock://index".to_string(),
                message: "mock index configured to fail".to_string(),
            });
        }
        Ok(())
    }
}

/// Counts a query as running until dropped, including when a timeout cancels it.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(running: &'a AtomicUsize, peak: &AtomicUsize) -> Self {
        let now = running.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        Self(running)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
