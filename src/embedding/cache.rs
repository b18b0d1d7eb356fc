//! Embedding cache (in-memory, TTL).
//!
//! Keys are BLAKE3 hashes of `(model, dimension, text)`; values are shared vectors so
//! concurrent sub-searches can reuse one embedding without copying.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::sync::Cache;
use serde::Serialize;

use crate::constants::{DEFAULT_EMBEDDING_CACHE_CAPACITY, DEFAULT_EMBEDDING_CACHE_TTL_SECS};
use crate::hashing::hash_embedding_request;

/// Hit/lookup counters since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub lookups: u64,
}

impl CacheStats {
    /// `hits / lookups`, or 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        self.hits as f64 / self.lookups.max(1) as f64
    }
}

pub struct EmbeddingCache {
    entries: Cache<[u8; 32], Arc<Vec<f32>>>,
    hits: AtomicU64,
    lookups: AtomicU64,
}

impl std::fmt::Debug for EmbeddingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingCache")
            .field("entries", &self.entries.entry_count())
            .field("stats", &self.stats())
            .finish()
    }
}

impl Default for EmbeddingCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_EMBEDDING_CACHE_TTL_SECS))
    }
}

impl EmbeddingCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_EMBEDDING_CACHE_CAPACITY)
    }

    pub fn with_capacity(ttl: Duration, capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
            hits: AtomicU64::new(0),
            lookups: AtomicU64::new(0),
        }
    }

    /// Looks up a cached embedding, counting the lookup (and the hit, if any).
    #[inline]
    pub fn get(&self, model: &str, dimension: usize, text: &str) -> Option<Arc<Vec<f32>>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let found = self
            .entries
            .get(&hash_embedding_request(model, dimension, text));
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    #[inline]
    pub fn insert(&self, model: &str, dimension: usize, text: &str, vector: Arc<Vec<f32>>) {
        self.entries
            .insert(hash_embedding_request(model, dimension, text), vector);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
        }
    }

    pub fn hit_rate(&self) -> f64 {
        self.stats().hit_rate()
    }

    /// Number of live entries (approximate until pending maintenance runs).
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_then_hit() {
        let cache = EmbeddingCache::default();
        assert!(cache.get("m", 4, "visa").is_none());

        cache.insert("m", 4, "visa", Arc::new(vec![0.1, 0.2, 0.3, 0.4]));
        let hit = cache.get("m", 4, "visa").unwrap();
        assert_eq!(hit.as_slice(), &[0.1, 0.2, 0.3, 0.4]);

        assert_eq!(cache.stats(), CacheStats { hits: 1, lookups: 2 });
        assert!((cache.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_key_includes_model_and_dimension() {
        let cache = EmbeddingCache::default();
        cache.insert("m", 4, "visa", Arc::new(vec![1.0; 4]));

        assert!(cache.get("other", 4, "visa").is_none());
        assert!(cache.get("m", 8, "visa").is_none());
        assert!(cache.get("m", 4, "visa").is_some());
    }

    #[test]
    fn test_hit_rate_without_lookups_is_zero() {
        let cache = EmbeddingCache::default();
        assert_eq!(cache.hit_rate(), 0.0);
    }

    #[test]
    fn test_ttl_expiry() {
        let cache = EmbeddingCache::new(Duration::from_millis(50));
        cache.insert("m", 1, "fees", Arc::new(vec![1.0]));
        assert!(cache.get("m", 1, "fees").is_some());

        std::thread::sleep(Duration::from_millis(120));
        assert!(cache.get("m", 1, "fees").is_none());
    }

    #[test]
    fn test_clear() {
        let cache = EmbeddingCache::default();
        cache.insert("m", 1, "a", Arc::new(vec![1.0]));
        cache.clear();
        assert!(cache.get("m", 1, "a").is_none());
    }
}
