// ABOUTME: Client-credentials token command for wso2is-cli
// ABOUTME: Requests a management token and prints it masked or in full
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use serde_json::json;
use wso2is_auth::client::Wso2isClient;

use crate::helpers::display::{mask_secret, print_json};

/// Request a token with `scopes` (or the configured defaults)
pub async fn request(client: &Wso2isClient, scopes: &[String], show: bool) -> Result<()> {
    let requested = (!scopes.is_empty()).then_some(scopes);
    let token = client.get_access_token(requested).await?;

    let shown = if show { token } else { mask_secret(&token) };
    let effective = requested.unwrap_or_else(|| client.config().management_scope_list());
    print_json(&json!({
        "access_token": shown,
        "scope": effective.join(" "),
    }))
}
