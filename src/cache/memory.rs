// ABOUTME: In-memory cache implementation with LRU eviction and TTL support
// ABOUTME: Expired entries are dropped lazily on read
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use serde_json::Value;
use tokio::sync::RwLock;
use wso2is_core::constants::cache::MAX_ENTRIES;

use super::CacheProvider;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(value: Value, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Process-wide cache; clones share the same store
#[derive(Clone)]
pub struct InMemoryCache {
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new(MAX_ENTRIES)
    }
}

impl InMemoryCache {
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(16) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Cache holding at most `max_entries` values
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(Self::DEFAULT_CAPACITY);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// Number of stored entries, expired ones included
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

impl std::fmt::Debug for InMemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCache").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl CacheProvider for InMemoryCache {
    async fn get(&self, key: &str) -> Option<Value> {
        // LruCache::get updates recency, so a write lock is needed
        let mut store = self.store.write().await;
        let entry = store.get(key)?;
        if entry.is_expired() {
            store.pop(key);
            return None;
        }
        Some(entry.value.clone())
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) {
        self.store
            .write()
            .await
            .push(key.to_owned(), CacheEntry::new(value, ttl));
    }

    async fn invalidate(&self, key: &str) {
        self.store.write().await.pop(key);
    }

    async fn clear(&self) {
        self.store.write().await.clear();
    }
}
