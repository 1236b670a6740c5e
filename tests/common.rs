// ABOUTME: Shared test utilities for integration tests
// ABOUTME: Builds configs and clients against a wiremock provider and mounts common endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `wso2is_auth`

use std::collections::HashMap;

use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wso2is_auth::client::Wso2isClient;
use wso2is_auth::config::Wso2isConfig;

pub const CLIENT_ID: &str = "cid";
pub const CLIENT_SECRET: &str = "client-secret";
pub const APP_URL: &str = "https://app.example.com";
pub const REDIRECT_URI: &str = "https://app.example.com/wso2is/callback";
pub const MANAGEMENT_TOKEN: &str = "mgmt-token";

/// Config pointing at the mock provider
pub fn test_config(server: &MockServer) -> Wso2isConfig {
    Wso2isConfig::new(server.uri(), CLIENT_ID, CLIENT_SECRET, REDIRECT_URI).with_app_url(APP_URL)
}

/// Client for the mock provider
pub fn test_client(server: &MockServer) -> Wso2isClient {
    Wso2isClient::new(test_config(server)).unwrap()
}

/// Mount a client-credentials token endpoint returning `MANAGEMENT_TOKEN`
pub async fn mount_management_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": MANAGEMENT_TOKEN,
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .mount(server)
        .await;
}

/// Userinfo claims for a typical user
pub fn userinfo_claims() -> Value {
    json!({
        "sub": "remote-123",
        "given_name": "Ada",
        "family_name": "Lovelace",
        "email": "ada@example.com",
        "preferred_username": "ada",
        "groups": ["engineering"],
        "roles": "admin"
    })
}

/// Form fields of every request the server received on `request_path`
pub async fn received_forms(server: &MockServer, request_path: &str) -> Vec<HashMap<String, String>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == request_path)
        .map(|request| serde_urlencoded::from_bytes(&request.body).unwrap())
        .collect()
}
