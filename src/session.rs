// ABOUTME: Caller-owned session abstraction used by the login flow and token guard
// ABOUTME: SessionStore trait plus an in-memory implementation for tests and simple hosts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Session storage seam.
//!
//! The host web framework owns the real session. The flow only needs string
//! key/value access plus the login bookkeeping operations below.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::RwLock;
use uuid::Uuid;
use wso2is_core::constants::session_keys;
use wso2is_core::models::TokenPair;

/// Session operations the authorization flow relies on
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read a value
    async fn get(&self, key: &str) -> Option<String>;

    /// Write a value
    async fn put(&self, key: &str, value: String);

    /// Remove a value
    async fn forget(&self, key: &str);

    /// Rotate the session identifier, keeping data
    async fn regenerate(&self);

    /// Drop all data and rotate the identifier
    async fn invalidate(&self);

    /// Mark `user_key` as the authenticated local user
    async fn login(&self, user_key: &str);

    /// Clear the authenticated user
    async fn logout(&self);

    /// Currently authenticated local user, if any
    async fn authenticated_user(&self) -> Option<String>;

    /// Access and refresh token, when both are stored
    async fn token_pair(&self) -> Option<TokenPair> {
        let access_token = self.get(session_keys::ACCESS_TOKEN).await?;
        let refresh_token = self.get(session_keys::REFRESH_TOKEN).await?;
        Some(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Store both tokens
    async fn store_token_pair(&self, tokens: &TokenPair) {
        self.put(session_keys::ACCESS_TOKEN, tokens.access_token.clone())
            .await;
        self.put(session_keys::REFRESH_TOKEN, tokens.refresh_token.clone())
            .await;
    }
}

/// Process-local session backed by a concurrent map
#[derive(Debug)]
pub struct InMemorySession {
    id: RwLock<Uuid>,
    data: DashMap<String, String>,
    user: RwLock<Option<String>>,
}

impl Default for InMemorySession {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySession {
    /// Empty session with a fresh identifier
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: RwLock::new(Uuid::new_v4()),
            data: DashMap::new(),
            user: RwLock::new(None),
        }
    }

    /// Current session identifier
    pub async fn id(&self) -> Uuid {
        *self.id.read().await
    }

    /// Whether `key` holds a value
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }
}

#[async_trait]
impl SessionStore for InMemorySession {
    async fn get(&self, key: &str) -> Option<String> {
        self.data.get(key).map(|value| value.clone())
    }

    async fn put(&self, key: &str, value: String) {
        self.data.insert(key.to_owned(), value);
    }

    async fn forget(&self, key: &str) {
        self.data.remove(key);
    }

    async fn regenerate(&self) {
        *self.id.write().await = Uuid::new_v4();
    }

    async fn invalidate(&self) {
        self.data.clear();
        *self.user.write().await = None;
        self.regenerate().await;
    }

    async fn login(&self, user_key: &str) {
        *self.user.write().await = Some(user_key.to_owned());
    }

    async fn logout(&self) {
        *self.user.write().await = None;
    }

    async fn authenticated_user(&self) -> Option<String> {
        self.user.read().await.clone()
    }
}
