//! Deterministic embedder for tests (no network).

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::Embedder;
use crate::embedding::error::EmbeddingError;
use crate::hashing::hash_to_u64;

pub const STUB_MODEL_NAME: &str = "stub-embedder";

/// Produces hash-seeded unit vectors; the same text always yields the same vector.
#[derive(Debug)]
pub struct StubEmbedder {
    dimension: usize,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl StubEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// An embedder whose every call fails.
    pub fn failing(dimension: usize) -> Self {
        let stub = Self::new(dimension);
        stub.set_failing(true);
        stub
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `embed` calls that reached this embedder.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The vector `embed(text)` returns, computed synchronously.
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut state = hash_to_u64(text.as_bytes()) | 1;
        let raw: Vec<f32> = (0..self.dimension)
            .map(|_| {
                // xorshift64
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                ((state % 2000) as f32 / 1000.0) - 1.0
            })
            .collect();

        let norm = raw.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm == 0.0 {
            return raw;
        }
        raw.into_iter().map(|v| v / norm).collect()
    }
}

impl Embedder for StubEmbedder {
    fn model_name(&self) -> &str {
        STUB_MODEL_NAME
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(EmbeddingError::RequestFailed {
                reason: "stub embedder configured to fail".to_string(),
            });
        }
        Ok(self.vector_for(text))
    }
}
