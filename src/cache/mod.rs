// ABOUTME: Cache abstraction for provider documents such as OIDC discovery and JWKS
// ABOUTME: Pluggable backend trait with an in-memory LRU implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// In-memory cache implementation
pub mod memory;

use std::time::Duration;

use serde_json::Value;

pub use memory::InMemoryCache;

/// Shared document cache keyed by fixed strings.
///
/// Concurrent misses may both fetch and both store; the last write wins.
#[async_trait::async_trait]
pub trait CacheProvider: Send + Sync {
    /// Cached value, `None` when absent or expired
    async fn get(&self, key: &str) -> Option<Value>;

    /// Store a value for `ttl`
    async fn set(&self, key: &str, value: Value, ttl: Duration);

    /// Remove one key
    async fn invalidate(&self, key: &str);

    /// Remove everything
    async fn clear(&self);
}
