//! Response cache store
//!
//! The router writes; any number of request tasks read concurrently.
//! `DashMap` shards keep lookups from blocking writes to other keys.

use super::types::{AtomicCacheStats, CacheEntry, CacheKey, CacheStats};
use crate::core::router::types::EnhancedRoutingResponse;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::debug;

/// Cache store used to memoize routed responses
///
/// A miss is `None`, never an error.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Option<EnhancedRoutingResponse>;

    async fn set(&self, key: CacheKey, value: EnhancedRoutingResponse, ttl: Duration);

    async fn delete(&self, key: &CacheKey) -> bool;

    async fn clear(&self);

    /// Number of stored entries, expired or not
    async fn len(&self) -> usize;

    /// Drop expired entries, returning how many were removed
    async fn purge_expired(&self) -> usize;

    async fn stats(&self) -> CacheStats;
}

/// In-process TTL cache
#[derive(Debug, Default, Clone)]
pub struct InMemoryResponseCache {
    entries: Arc<DashMap<CacheKey, CacheEntry<EnhancedRoutingResponse>>>,
    stats: Arc<AtomicCacheStats>,
}

impl InMemoryResponseCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResponseCache for InMemoryResponseCache {
    async fn get(&self, key: &CacheKey) -> Option<EnhancedRoutingResponse> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        // The read guard is released before removing.
        if expired && self.entries.remove_if(key, |_, e| e.is_expired()).is_some() {
            self.stats.expired.fetch_add(1, Ordering::Relaxed);
            debug!("Cache entry expired: {}", key);
        }
        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    async fn set(&self, key: CacheKey, value: EnhancedRoutingResponse, ttl: Duration) {
        debug!("Caching response {} under key {}", value.id, key);
        self.entries.insert(key, CacheEntry::new(value, ttl));
    }

    async fn delete(&self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    async fn clear(&self) {
        self.entries.clear();
        self.stats.reset();
    }

    async fn len(&self) -> usize {
        self.entries.len()
    }

    async fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            self.stats
                .expired
                .fetch_add(removed as u64, Ordering::Relaxed);
            debug!("Purged {} expired cache entries", removed);
        }
        removed
    }

    async fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len())
    }
}
