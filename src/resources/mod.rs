// ABOUTME: REST resource wrappers over the authenticated provider client
// ABOUTME: Generic collection accessor plus SCIM users, groups, and applications
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Thin wrappers over REST collections. One request per call: no caching,
//! pagination or retry, and provider responses pass through unmodified.

/// Application management API
pub mod applications;
/// SCIM2 groups
pub mod groups;
/// SCIM2 users
pub mod users;

pub use applications::Applications;
pub use groups::Groups;
pub use users::Users;

use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use wso2is_core::errors::{AuthError, AuthResult};

use crate::client::Wso2isClient;
pub use crate::utils::filter::eq_filter;

/// CRUD and filter lookup over one REST collection such as `/scim2/Users`
#[derive(Debug, Clone)]
pub struct ResourceAccessor {
    client: Wso2isClient,
    base_path: &'static str,
    result_key: &'static str,
}

impl ResourceAccessor {
    /// Accessor for `base_path` whose list responses carry results under `result_key`
    #[must_use]
    pub const fn new(client: Wso2isClient, base_path: &'static str, result_key: &'static str) -> Self {
        Self {
            client,
            base_path,
            result_key,
        }
    }

    /// Collection path
    #[must_use]
    pub const fn base_path(&self) -> &'static str {
        self.base_path
    }

    /// Client used for requests
    #[must_use]
    pub const fn client(&self) -> &Wso2isClient {
        &self.client
    }

    /// Path of one member, or of a sub-path below it
    #[must_use]
    pub fn item_path(&self, id: &str, suffix: &str) -> String {
        format!("{}/{}{suffix}", self.base_path, urlencoding::encode(id))
    }

    /// List the collection; `filters` is passed through as query parameters
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` on a non-success reply
    pub async fn list(&self, filters: Option<&Value>) -> AuthResult<Value> {
        self.client.get(self.base_path, filters).await
    }

    /// Fetch one member by id
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` on a non-success reply, including 404
    pub async fn get(&self, id: &str) -> AuthResult<Value> {
        self.client.get(&self.item_path(id, ""), None).await
    }

    /// Create a member
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` on a non-success reply
    pub async fn create(&self, payload: &Value) -> AuthResult<Value> {
        self.client.post(self.base_path, payload).await
    }

    /// Replace a member
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` on a non-success reply
    pub async fn update(&self, id: &str, payload: &Value) -> AuthResult<Value> {
        self.client.put(&self.item_path(id, ""), payload).await
    }

    /// Delete a member
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` on a non-success reply
    pub async fn delete(&self, id: &str) -> AuthResult<Value> {
        self.client.delete(&self.item_path(id, "")).await
    }

    /// First member matching `filter_expression`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` with `description` when the result set is empty
    pub async fn find_by_filter(&self, filter_expression: &str, description: &str) -> AuthResult<Value> {
        let query = serde_json::json!({ "filter": filter_expression });
        let response = self
            .client
            .request(Method::GET, self.base_path, Some(&query), None)
            .await?;

        debug!(path = self.base_path, filter = filter_expression, "Filter lookup");
        first_result(response, self.result_key).ok_or_else(|| AuthError::not_found(description))
    }
}

/// Take the first element of `response[key]`, if any
fn first_result(mut response: Value, key: &str) -> Option<Value> {
    match response.get_mut(key)?.take() {
        Value::Array(items) => items.into_iter().next(),
        _ => None,
    }
}
