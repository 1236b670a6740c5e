// ABOUTME: CSRF state and nonce generated for each login attempt
// ABOUTME: Serialized to JSON for both the wire state parameter and the session entry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::oauth::STATE_LENGTH;
use crate::errors::{AuthError, AuthResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Per-attempt login state.
///
/// The whole JSON object travels in the `state` query parameter, but only the
/// inner `state` field is compared on callback. The remaining fields are not
/// bound to it cryptographically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    /// Random CSRF token
    pub state: String,
    /// Base64 of the URL the user came from
    #[serde(default)]
    pub previous_url: String,
    /// Random OIDC nonce
    #[serde(default)]
    pub nonce: String,
}

impl AuthState {
    /// Generate fresh state and nonce values for a login attempt
    #[must_use]
    pub fn generate(previous_url: &str) -> Self {
        Self {
            state: random_token(STATE_LENGTH),
            previous_url: STANDARD.encode(previous_url),
            nonce: random_token(STATE_LENGTH),
        }
    }

    /// JSON form used on the wire and in session storage
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> AuthResult<String> {
        serde_json::to_string(self).map_err(|e| AuthError::invalid_response("auth state", e))
    }

    /// Parse a stored session entry; `None` when absent fields or bad JSON
    #[must_use]
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    /// Extract the inner `state` field from a JSON blob received on callback
    #[must_use]
    pub fn inner_state(raw: &str) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(raw).ok()?;
        value.get("state")?.as_str().map(str::to_owned)
    }

    /// Byte-for-byte comparison of the callback blob against this state
    #[must_use]
    pub fn matches(&self, callback_state: &str) -> bool {
        Self::inner_state(callback_state).is_some_and(|received| received == self.state)
    }

    /// Decode the previous URL; `None` when empty or not valid base64/UTF-8
    #[must_use]
    pub fn decoded_previous_url(&self) -> Option<String> {
        let bytes = STANDARD.decode(self.previous_url.as_bytes()).ok()?;
        let url = String::from_utf8(bytes).ok()?;
        let url = url.trim_end();
        (!url.is_empty()).then(|| url.to_owned())
    }
}

fn random_token(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_values_have_expected_shape() {
        let state = AuthState::generate("https://app.example.com/reports");
        assert_eq!(state.state.len(), 32);
        assert_eq!(state.nonce.len(), 32);
        assert!(state.state.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(state.state, state.nonce);
        assert_eq!(
            state.decoded_previous_url().as_deref(),
            Some("https://app.example.com/reports")
        );
    }

    #[test]
    fn test_json_field_order() {
        let state = AuthState {
            state: "s".to_owned(),
            previous_url: "p".to_owned(),
            nonce: "n".to_owned(),
        };
        assert_eq!(
            state.to_json().unwrap(),
            r#"{"state":"s","previous_url":"p","nonce":"n"}"#
        );
    }

    #[test]
    fn test_matches_compares_inner_state_only() {
        let stored = AuthState::generate("/");
        let tampered = format!(
            r#"{{"state":"{}","previous_url":"ZXZpbA==","nonce":"other"}}"#,
            stored.state
        );
        assert!(stored.matches(&tampered));
        assert!(!stored.matches(r#"{"state":"different"}"#));
        assert!(!stored.matches("not json"));
        assert!(!stored.matches(r#"{"nonce":"missing state"}"#));
    }
}
