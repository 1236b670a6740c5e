// ABOUTME: SCIM2 group commands for wso2is-cli
// ABOUTME: List, get, lookup by name, and membership changes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use serde_json::json;
use wso2is_auth::client::Wso2isClient;

use crate::helpers::display::print_json;

/// List groups, optionally filtered
pub async fn list(client: &Wso2isClient, filter: Option<String>) -> Result<()> {
    let query = filter.map(|filter| json!({ "filter": filter }));
    print_json(&client.groups().list(query.as_ref()).await?)
}

/// Show one group
pub async fn get(client: &Wso2isClient, id: &str) -> Result<()> {
    print_json(&client.groups().get(id).await?)
}

/// Find a group by `displayName`
pub async fn by_name(client: &Wso2isClient, name: &str) -> Result<()> {
    print_json(&client.groups().get_by_name(name).await?)
}

/// Add a member
pub async fn add_user(client: &Wso2isClient, group_id: &str, user_id: &str) -> Result<()> {
    print_json(&client.groups().add_user(group_id, user_id).await?)
}

/// Remove a member
pub async fn remove_user(client: &Wso2isClient, group_id: &str, user_id: &str) -> Result<()> {
    print_json(&client.groups().remove_user(group_id, user_id).await?)
}
