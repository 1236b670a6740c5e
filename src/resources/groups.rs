// ABOUTME: SCIM2 group management
// ABOUTME: CRUD, lookup by display name, and membership edits via read-modify-PUT
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::ops::Deref;

use serde_json::{json, Map, Value};
use tracing::info;
use wso2is_core::constants::{endpoints, scim};
use wso2is_core::errors::AuthResult;

use super::{eq_filter, ResourceAccessor};
use crate::client::Wso2isClient;

/// `/scim2/Groups`
#[derive(Debug, Clone)]
pub struct Groups {
    accessor: ResourceAccessor,
}

impl Groups {
    /// Groups collection for `client`
    #[must_use]
    pub const fn new(client: Wso2isClient) -> Self {
        Self {
            accessor: ResourceAccessor::new(client, endpoints::SCIM_GROUPS, scim::RESOURCES_KEY),
        }
    }

    /// Group whose `displayName` equals `name`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no group matches
    pub async fn get_by_name(&self, name: &str) -> AuthResult<Value> {
        self.accessor
            .find_by_filter(
                &eq_filter("displayName", name),
                &format!("Group with name '{name}'"),
            )
            .await
    }

    /// Append `user_id` to the group's members
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` if reading or replacing the group fails
    pub async fn add_user(&self, group_id: &str, user_id: &str) -> AuthResult<Value> {
        let group = self.accessor.get(group_id).await?;
        let mut members = members_of(&group);
        members.push(json!({ "value": user_id, "display": user_id }));

        info!(group_id, user_id, "Adding user to group");
        self.replace_members(group_id, &group, members).await
    }

    /// Remove every membership entry for `user_id`
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` if reading or replacing the group fails
    pub async fn remove_user(&self, group_id: &str, user_id: &str) -> AuthResult<Value> {
        let group = self.accessor.get(group_id).await?;
        let members = members_of(&group)
            .into_iter()
            .filter(|member| member.get("value").and_then(Value::as_str) != Some(user_id))
            .collect();

        info!(group_id, user_id, "Removing user from group");
        self.replace_members(group_id, &group, members).await
    }

    async fn replace_members(&self, group_id: &str, group: &Value, members: Vec<Value>) -> AuthResult<Value> {
        let mut payload = Map::new();
        if let Some(display_name) = group.get("displayName") {
            payload.insert("displayName".to_owned(), display_name.clone());
        }
        payload.insert("members".to_owned(), Value::Array(members));
        self.accessor.update(group_id, &Value::Object(payload)).await
    }
}

fn members_of(group: &Value) -> Vec<Value> {
    group
        .get("members")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

impl Deref for Groups {
    type Target = ResourceAccessor;

    fn deref(&self) -> &Self::Target {
        &self.accessor
    }
}
