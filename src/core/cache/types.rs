//! Response cache type definitions

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Stable cache key: hex SHA-256 over the semantically relevant request fields
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(String);

/// Fields that feed the cache key, in canonical order
#[derive(Serialize)]
struct KeyFields<'a> {
    prompt: &'a str,
    model: Option<&'a str>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    strategy: &'a str,
}

impl CacheKey {
    /// Derive a key from the request fields that influence the response
    pub fn compute(
        prompt: &str,
        preferred_model: Option<&str>,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
        strategy: &str,
    ) -> Self {
        let fields = KeyFields {
            prompt,
            model: preferred_model,
            temperature,
            max_tokens,
            strategy,
        };
        let canonical = serde_json::to_vec(&fields).unwrap_or_else(|_| {
            format!(
                "{}|{:?}|{:?}|{:?}|{}",
                prompt, preferred_model, temperature, max_tokens, strategy
            )
            .into_bytes()
        });
        let digest = Sha256::digest(&canonical);
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cache entry with expiry
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub expires_at: Instant,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Atomic hit/miss counters for the lookup path
#[derive(Debug, Default)]
pub(crate) struct AtomicCacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub expired: AtomicU64,
}

impl AtomicCacheStats {
    pub fn snapshot(&self, total_entries: usize) -> CacheStats {
        CacheStats {
            total_entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.expired.store(0, Ordering::Relaxed);
    }
}

/// Cache statistics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub hits: u64,
    pub misses: u64,
    /// Entries dropped because their TTL elapsed
    pub expired: u64,
}

impl CacheStats {
    /// Hits over lookups, 0 when nothing has been looked up
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
