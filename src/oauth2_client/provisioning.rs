// ABOUTME: Local user provisioning hooks run after a successful provider login
// ABOUTME: UserProvisioner trait, a store-backed default, and an in-memory user store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # User Provisioning
//!
//! After the callback has produced a [`RemoteUser`], the flow asks a
//! [`UserProvisioner`] to find the matching local user, creating one on first
//! login or refreshing its profile on later logins. Hosts with their own user
//! model implement the trait directly; hosts happy with [`LocalUser`] plug a
//! [`LocalUserStore`] into [`StoreProvisioner`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, info};
use uuid::Uuid;
use wso2is_core::errors::AuthResult;
use wso2is_core::models::{LocalUser, RemoteUser};

use crate::logging::AuthLogger;

/// Maps a provider identity onto a local user
#[async_trait]
pub trait UserProvisioner: Send + Sync {
    /// Local user type handed back to the host
    type User: Send + Sync;

    /// Existing local user for this identity
    async fn find(&self, remote: &RemoteUser) -> AuthResult<Option<Self::User>>;

    /// Create a local user on first login
    async fn create(&self, remote: &RemoteUser) -> AuthResult<Self::User>;

    /// Refresh a found user from the provider profile
    async fn update(&self, user: Self::User, remote: &RemoteUser) -> AuthResult<Self::User>;

    /// Notification fired after `create`
    async fn on_registered(&self, _user: &Self::User) {}

    /// Identifier the session records for the logged-in user
    fn session_key(&self, user: &Self::User) -> String;
}

/// Persistence for [`LocalUser`] records
#[async_trait]
pub trait LocalUserStore: Send + Sync {
    /// User linked to provider subject `external_id`
    async fn find_by_external_id(&self, external_id: &str) -> AuthResult<Option<LocalUser>>;

    /// Insert a new user
    async fn insert(&self, user: LocalUser) -> AuthResult<LocalUser>;

    /// Persist changes to an existing user
    async fn update(&self, user: LocalUser) -> AuthResult<LocalUser>;

    /// Remove a user; `false` when it did not exist
    async fn delete(&self, id: Uuid) -> AuthResult<bool>;
}

type RegistrationHook = Arc<dyn Fn(&LocalUser) + Send + Sync>;

/// Default provisioning: link by provider subject, create on first login
pub struct StoreProvisioner<S> {
    store: S,
    on_registered: Option<RegistrationHook>,
}

impl<S: LocalUserStore> StoreProvisioner<S> {
    /// Provisioner over `store`
    pub const fn new(store: S) -> Self {
        Self {
            store,
            on_registered: None,
        }
    }

    /// Call `hook` for every newly registered user
    #[must_use]
    pub fn with_registration_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&LocalUser) + Send + Sync + 'static,
    {
        self.on_registered = Some(Arc::new(hook));
        self
    }

    /// Underlying store
    pub const fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait]
impl<S: LocalUserStore> UserProvisioner for StoreProvisioner<S> {
    type User = LocalUser;

    async fn find(&self, remote: &RemoteUser) -> AuthResult<Option<LocalUser>> {
        self.store.find_by_external_id(&remote.id).await
    }

    async fn create(&self, remote: &RemoteUser) -> AuthResult<LocalUser> {
        let user = LocalUser {
            id: Uuid::new_v4(),
            name: remote.display_name(),
            email: remote.email.clone(),
            email_verified_at: Some(Utc::now()),
            external_id: Some(remote.id.clone()),
            avatar: remote.avatar.clone().unwrap_or_default(),
        };
        info!(user_id = %user.id, sub = %remote.id, "Provisioning local user");
        self.store.insert(user).await
    }

    async fn update(&self, mut user: LocalUser, remote: &RemoteUser) -> AuthResult<LocalUser> {
        user.name = remote.display_name();
        user.avatar = remote.avatar.clone().unwrap_or_default();
        debug!(user_id = %user.id, "Refreshing local user profile");
        self.store.update(user).await
    }

    async fn on_registered(&self, user: &LocalUser) {
        AuthLogger::log_auth_event(
            user.external_id.as_deref().unwrap_or_default(),
            "registered",
            true,
            None,
        );
        if let Some(hook) = &self.on_registered {
            hook(user);
        }
    }

    fn session_key(&self, user: &LocalUser) -> String {
        user.id.to_string()
    }
}

/// Concurrent in-memory [`LocalUserStore`]
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: DashMap<Uuid, LocalUser>,
}

impl InMemoryUserStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the store holds no users
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// User by local id
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<LocalUser> {
        self.users.get(&id).map(|user| user.clone())
    }
}

#[async_trait]
impl LocalUserStore for InMemoryUserStore {
    async fn find_by_external_id(&self, external_id: &str) -> AuthResult<Option<LocalUser>> {
        Ok(self
            .users
            .iter()
            .find(|entry| entry.external_id.as_deref() == Some(external_id))
            .map(|entry| entry.value().clone()))
    }

    async fn insert(&self, user: LocalUser) -> AuthResult<LocalUser> {
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: LocalUser) -> AuthResult<LocalUser> {
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> AuthResult<bool> {
        Ok(self.users.remove(&id).is_some())
    }
}

#[async_trait]
impl<T: LocalUserStore + ?Sized> LocalUserStore for Arc<T> {
    async fn find_by_external_id(&self, external_id: &str) -> AuthResult<Option<LocalUser>> {
        (**self).find_by_external_id(external_id).await
    }

    async fn insert(&self, user: LocalUser) -> AuthResult<LocalUser> {
        (**self).insert(user).await
    }

    async fn update(&self, user: LocalUser) -> AuthResult<LocalUser> {
        (**self).update(user).await
    }

    async fn delete(&self, id: Uuid) -> AuthResult<bool> {
        (**self).delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn remote() -> RemoteUser {
        RemoteUser {
            id: "sub-1".to_owned(),
            first_name: Some("Ada".to_owned()),
            last_name: Some("Lovelace".to_owned()),
            email: "ada@example.com".to_owned(),
            username: Some("ada".to_owned()),
            groups: vec![],
            roles: vec![],
            avatar: None,
            organization_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_find_by_subject() {
        let registered = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&registered);
        let provisioner = StoreProvisioner::new(InMemoryUserStore::new())
            .with_registration_hook(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        assert!(provisioner.find(&remote()).await.unwrap().is_none());

        let created = provisioner.create(&remote()).await.unwrap();
        provisioner.on_registered(&created).await;
        assert_eq!(created.name, "Ada Lovelace");
        assert_eq!(created.external_id.as_deref(), Some("sub-1"));
        assert!(created.email_verified_at.is_some());
        assert_eq!(created.avatar, "");
        assert_eq!(registered.load(Ordering::SeqCst), 1);

        let found = provisioner.find(&remote()).await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
    }

    #[tokio::test]
    async fn test_update_refreshes_name_and_avatar() {
        let provisioner = StoreProvisioner::new(InMemoryUserStore::new());
        let created = provisioner.create(&remote()).await.unwrap();

        let mut changed = remote();
        changed.first_name = None;
        changed.last_name = None;
        changed.avatar = Some("https://cdn.example.com/a.png".to_owned());

        let updated = provisioner.update(created.clone(), &changed).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "ada");
        assert_eq!(updated.avatar, "https://cdn.example.com/a.png");
        assert_eq!(provisioner.store().get(created.id).unwrap().name, "ada");
    }
}
