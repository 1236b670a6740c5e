// ABOUTME: Token endpoint response model and the caller-owned access/refresh pair
// ABOUTME: Handles refresh-token echo when the provider does not rotate it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// OAuth 2.0 token response from the provider's token endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The access token issued by the authorization server
    pub access_token: String,
    /// Token type (usually "Bearer")
    #[serde(default)]
    pub token_type: Option<String>,
    /// Token lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Refresh token, when the grant issues one
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Space-separated list of granted scopes
    #[serde(default)]
    pub scope: Option<String>,
    /// OIDC ID token, when `openid` was requested
    #[serde(default)]
    pub id_token: Option<String>,
}

/// Access and refresh token held in the caller's session
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Bearer access token
    pub access_token: String,
    /// Refresh token used to renew `access_token`
    pub refresh_token: String,
}

impl TokenPair {
    /// Create a pair from owned strings
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Build the pair produced by a refresh grant.
    ///
    /// Some grants do not rotate the refresh token; the previous one is kept.
    #[must_use]
    pub fn from_refresh(response: TokenResponse, previous_refresh_token: &str) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response
                .refresh_token
                .unwrap_or_else(|| previous_refresh_token.to_owned()),
        }
    }
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}
