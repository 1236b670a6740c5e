// ABOUTME: Local application user record linked to a provider identity
// ABOUTME: Shape used by the default provisioning hooks and the in-memory store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Application-side user linked to a WSO2IS identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalUser {
    /// Local primary key
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// When the provider vouched for the email
    pub email_verified_at: Option<DateTime<Utc>>,
    /// Provider subject identifier (`sub`)
    pub external_id: Option<String>,
    /// Avatar URL, empty when the provider has none
    pub avatar: String,
}
