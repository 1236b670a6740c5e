// ABOUTME: SCIM2 user management
// ABOUTME: CRUD plus lookup by username or email
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::ops::Deref;

use serde_json::Value;
use wso2is_core::constants::{endpoints, scim};
use wso2is_core::errors::AuthResult;

use super::{eq_filter, ResourceAccessor};
use crate::client::Wso2isClient;

/// `/scim2/Users`
#[derive(Debug, Clone)]
pub struct Users {
    accessor: ResourceAccessor,
}

impl Users {
    /// Users collection for `client`
    #[must_use]
    pub const fn new(client: Wso2isClient) -> Self {
        Self {
            accessor: ResourceAccessor::new(client, endpoints::SCIM_USERS, scim::RESOURCES_KEY),
        }
    }

    /// User whose `userName` equals `username`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no user matches
    pub async fn get_by_username(&self, username: &str) -> AuthResult<Value> {
        self.accessor
            .find_by_filter(
                &eq_filter("userName", username),
                &format!("User with username '{username}'"),
            )
            .await
    }

    /// User with `email` among their `emails`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no user matches
    pub async fn get_by_email(&self, email: &str) -> AuthResult<Value> {
        self.accessor
            .find_by_filter(
                &eq_filter("emails", email),
                &format!("User with email '{email}'"),
            )
            .await
    }
}

impl Deref for Users {
    type Target = ResourceAccessor;

    fn deref(&self) -> &Self::Target {
        &self.accessor
    }
}
