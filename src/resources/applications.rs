// ABOUTME: Application management API wrapper
// ABOUTME: CRUD, lookup by name, and OIDC inbound protocol configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::ops::Deref;

use reqwest::Method;
use serde_json::Value;
use wso2is_core::constants::{endpoints, scim};
use wso2is_core::errors::AuthResult;

use super::{eq_filter, ResourceAccessor};
use crate::client::Wso2isClient;

const INBOUND_PROTOCOLS: &str = "/inbound-protocols";
const OIDC_PROTOCOL: &str = "/inbound-protocols/oidc";
const REGENERATE_SECRET: &str = "/inbound-protocols/oidc/regenerate-secret";

/// `/api/server/v1/applications`
#[derive(Debug, Clone)]
pub struct Applications {
    accessor: ResourceAccessor,
}

impl Applications {
    /// Applications collection for `client`
    #[must_use]
    pub const fn new(client: Wso2isClient) -> Self {
        Self {
            accessor: ResourceAccessor::new(client, endpoints::APPLICATIONS, scim::APPLICATIONS_KEY),
        }
    }

    /// Application whose `name` equals `name`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no application matches
    pub async fn get_by_name(&self, name: &str) -> AuthResult<Value> {
        self.accessor
            .find_by_filter(
                &eq_filter("name", name),
                &format!("Application with name '{name}'"),
            )
            .await
    }

    /// All inbound protocol configurations of an application
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` on a non-success reply
    pub async fn get_inbound_config(&self, application_id: &str) -> AuthResult<Value> {
        let path = self.accessor.item_path(application_id, INBOUND_PROTOCOLS);
        self.accessor.client().get(&path, None).await
    }

    /// OIDC inbound configuration (client id, grant types, callback URLs)
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` on a non-success reply
    pub async fn get_oauth2_config(&self, application_id: &str) -> AuthResult<Value> {
        let path = self.accessor.item_path(application_id, OIDC_PROTOCOL);
        self.accessor.client().get(&path, None).await
    }

    /// Replace the OIDC inbound configuration
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` on a non-success reply
    pub async fn update_oauth2_config(&self, application_id: &str, config: &Value) -> AuthResult<Value> {
        let path = self.accessor.item_path(application_id, OIDC_PROTOCOL);
        self.accessor.client().put(&path, config).await
    }

    /// Issue a new client secret for the application
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` on a non-success reply
    pub async fn regenerate_client_secret(&self, application_id: &str) -> AuthResult<Value> {
        let path = self.accessor.item_path(application_id, REGENERATE_SECRET);
        self.accessor
            .client()
            .request(Method::POST, &path, None, None)
            .await
    }
}

impl Deref for Applications {
    type Target = ResourceAccessor;

    fn deref(&self) -> &Self::Target {
        &self.accessor
    }
}
