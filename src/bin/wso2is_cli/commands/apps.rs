// ABOUTME: Application management commands for wso2is-cli
// ABOUTME: List, get, lookup by name, and OIDC inbound configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use serde_json::json;
use wso2is_auth::client::Wso2isClient;

use crate::helpers::display::print_json;

/// List applications, optionally filtered
pub async fn list(client: &Wso2isClient, filter: Option<String>) -> Result<()> {
    let query = filter.map(|filter| json!({ "filter": filter }));
    print_json(&client.applications().list(query.as_ref()).await?)
}

/// Show one application
pub async fn get(client: &Wso2isClient, id: &str) -> Result<()> {
    print_json(&client.applications().get(id).await?)
}

/// Find an application by name
pub async fn by_name(client: &Wso2isClient, name: &str) -> Result<()> {
    print_json(&client.applications().get_by_name(name).await?)
}

/// Show the OIDC inbound configuration
pub async fn oidc_config(client: &Wso2isClient, id: &str) -> Result<()> {
    print_json(&client.applications().get_oauth2_config(id).await?)
}
