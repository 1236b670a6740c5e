// ABOUTME: Remote identity model derived from the provider's userinfo claims
// ABOUTME: Maps OIDC claim names onto RemoteUser and offers role and group checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AuthError, AuthResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// User as known to the identity provider.
///
/// Rebuilt from claims on every userinfo call and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteUser {
    /// Provider subject identifier (`sub`)
    pub id: String,
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
    /// Email address, the correlation key to local identity
    pub email: String,
    /// Login name
    pub username: Option<String>,
    /// Group memberships
    #[serde(default)]
    pub groups: Vec<String>,
    /// Role assignments
    #[serde(default)]
    pub roles: Vec<String>,
    /// Profile picture URL
    pub avatar: Option<String>,
    /// Organization the user signed in through
    pub organization_id: Option<String>,
}

/// Raw userinfo claims as returned by `/oauth2/userinfo`
#[derive(Debug, Default, Deserialize)]
struct UserInfoClaims {
    sub: Option<String>,
    id: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
    username: Option<String>,
    preferred_username: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    groups: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    roles: Vec<String>,
    picture: Option<String>,
    org_id: Option<String>,
}

/// Group and role claims: a bare string for a single entry, otherwise an
/// array whose non-string entries are skipped
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(single)) => vec![single],
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(entry) => Some(entry),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

impl RemoteUser {
    /// Map userinfo claims onto a `RemoteUser`
    ///
    /// The email is checked before anything else, so incomplete claims always
    /// surface as `MissingEmail`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingEmail` if the claims carry no usable email, or
    /// `AuthError::InvalidResponse` if they are malformed or lack a subject.
    pub fn from_claims(claims: Value) -> AuthResult<Self> {
        let email = claims
            .get("email")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .map(str::to_owned)
            .ok_or(AuthError::MissingEmail)?;

        let claims: UserInfoClaims = serde_json::from_value(claims)
            .map_err(|e| AuthError::invalid_response("userinfo claims", e))?;

        let id = claims.sub.or(claims.id).ok_or_else(|| {
            AuthError::invalid_response(
                "userinfo claims",
                <serde_json::Error as serde::de::Error>::missing_field("sub"),
            )
        })?;

        Ok(Self {
            id,
            first_name: claims.given_name,
            last_name: claims.family_name,
            email,
            username: claims.username.or(claims.preferred_username),
            groups: claims.groups,
            roles: claims.roles,
            avatar: claims.picture,
            organization_id: claims.org_id,
        })
    }

    /// Given and family name joined by a space, trimmed
    #[must_use]
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_owned()
    }

    /// Best available display name: full name, then username, then id
    #[must_use]
    pub fn display_name(&self) -> String {
        let full_name = self.full_name();
        if !full_name.is_empty() {
            return full_name;
        }
        self.username
            .as_deref()
            .filter(|username| !username.is_empty())
            .unwrap_or(&self.id)
            .to_owned()
    }

    /// Check if the user has a specific role
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Check if the user belongs to a specific group
    #[must_use]
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    /// Check if the user has any of the given roles
    #[must_use]
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }

    /// Check if the user belongs to any of the given groups
    #[must_use]
    pub fn in_any_group(&self, groups: &[&str]) -> bool {
        groups.iter().any(|group| self.in_group(group))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_claims_mapping() {
        let user = RemoteUser::from_claims(json!({
            "sub": "b7e1c2",
            "given_name": "Ada",
            "family_name": "Lovelace",
            "email": "ada@example.com",
            "preferred_username": "ada",
            "groups": ["engineering", "admins"],
            "roles": "Internal/everyone",
            "org_id": "org-1"
        }))
        .unwrap();

        assert_eq!(user.id, "b7e1c2");
        assert_eq!(user.full_name(), "Ada Lovelace");
        assert_eq!(user.username.as_deref(), Some("ada"));
        assert!(user.in_group("admins"));
        assert!(user.has_role("Internal/everyone"));
        assert!(user.has_any_role(&["nobody", "Internal/everyone"]));
        assert!(!user.in_any_group(&["sales"]));
        assert_eq!(user.organization_id.as_deref(), Some("org-1"));
    }

    #[test]
    fn test_username_claim_takes_precedence() {
        let user = RemoteUser::from_claims(json!({
            "sub": "1",
            "email": "x@example.com",
            "username": "primary",
            "preferred_username": "fallback"
        }))
        .unwrap();
        assert_eq!(user.username.as_deref(), Some("primary"));
    }

    #[test]
    fn test_missing_email_is_rejected() {
        let result = RemoteUser::from_claims(json!({ "sub": "1", "given_name": "No" }));
        assert!(matches!(result, Err(AuthError::MissingEmail)));

        let blank = RemoteUser::from_claims(json!({ "sub": "1", "email": "  " }));
        assert!(matches!(blank, Err(AuthError::MissingEmail)));

        let anonymous = RemoteUser::from_claims(json!({ "given_name": "Ada" }));
        assert!(matches!(anonymous, Err(AuthError::MissingEmail)));

        let odd_groups = RemoteUser::from_claims(json!({ "sub": "1", "groups": [1, 2] }));
        assert!(matches!(odd_groups, Err(AuthError::MissingEmail)));
    }

    #[test]
    fn test_non_string_group_entries_are_skipped() {
        let user = RemoteUser::from_claims(json!({
            "sub": "1",
            "email": "x@example.com",
            "groups": [1, "engineering", null],
            "roles": {"name": "admin"}
        }))
        .unwrap();

        assert_eq!(user.groups, vec!["engineering"]);
        assert!(user.roles.is_empty());
    }

    #[test]
    fn test_missing_subject_is_invalid_response() {
        let result = RemoteUser::from_claims(json!({ "email": "x@example.com" }));
        assert!(matches!(result, Err(AuthError::InvalidResponse { .. })));
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut user = RemoteUser::from_claims(json!({
            "sub": "subject-1",
            "email": "x@example.com"
        }))
        .unwrap();
        assert_eq!(user.display_name(), "subject-1");

        user.username = Some("jdoe".to_owned());
        assert_eq!(user.display_name(), "jdoe");

        user.last_name = Some("Doe".to_owned());
        assert_eq!(user.display_name(), "Doe");
    }
}
