// ABOUTME: SCIM2 user commands for wso2is-cli
// ABOUTME: List, get, lookup by username or email, and delete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use serde_json::{Map, Value};
use tracing::info;
use wso2is_auth::client::Wso2isClient;

use crate::helpers::display::print_json;

/// List users, optionally filtered
pub async fn list(client: &Wso2isClient, filter: Option<String>, count: Option<u32>) -> Result<()> {
    let mut query = Map::new();
    if let Some(filter) = filter {
        query.insert("filter".to_owned(), Value::String(filter));
    }
    if let Some(count) = count {
        query.insert("count".to_owned(), Value::from(count));
    }
    let query = Value::Object(query);
    print_json(&client.users().list(Some(&query)).await?)
}

/// Show one user
pub async fn get(client: &Wso2isClient, id: &str) -> Result<()> {
    print_json(&client.users().get(id).await?)
}

/// Find a user by `userName`
pub async fn by_username(client: &Wso2isClient, username: &str) -> Result<()> {
    print_json(&client.users().get_by_username(username).await?)
}

/// Find a user by email
pub async fn by_email(client: &Wso2isClient, email: &str) -> Result<()> {
    print_json(&client.users().get_by_email(email).await?)
}

/// Delete a user
pub async fn delete(client: &Wso2isClient, id: &str) -> Result<()> {
    client.users().delete(id).await?;
    info!("Deleted user {id}");
    println!("Deleted user {id}");
    Ok(())
}
