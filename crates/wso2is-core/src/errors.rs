// ABOUTME: Error taxonomy for identity provider communication and the login flow
// ABOUTME: Defines AuthError with HTTP status mapping and user-safe messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Authentication Errors
//!
//! Every failure that crosses the provider boundary surfaces as an [`AuthError`].
//! Variants that reach a browser (`InvalidState`, `MissingEmail`, ...) carry
//! HTTP semantics via [`AuthError::http_status`] and a generic
//! [`AuthError::public_message`] that never echoes provider response bodies.

/// Result alias used across the workspace
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors raised by the client, resource wrappers, and authorization flow
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A required setting is absent or empty
    #[error("Missing configuration: {key}")]
    ConfigMissing {
        /// Environment variable or setting name
        key: &'static str,
    },

    /// A setting is present but cannot be parsed
    #[error("Invalid configuration for {key}: {reason}")]
    ConfigInvalid {
        /// Environment variable or setting name
        key: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// The client-credentials token request was rejected
    #[error("Client credentials token request failed with HTTP {status}: {body}")]
    TokenRequestFailed {
        /// HTTP status returned by the token endpoint
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The authorization code could not be exchanged for tokens
    #[error("Failed to exchange authorization code for tokens (HTTP {status})")]
    TokenExchangeFailed {
        /// HTTP status returned by the token endpoint
        status: u16,
    },

    /// The refresh token grant produced no usable token pair
    #[error("Failed to refresh access token")]
    RefreshFailed {
        /// HTTP status returned by the token endpoint, when one was received
        status: Option<u16>,
        /// Transport or decoding failure, when the endpoint was not the one refusing
        #[source]
        source: Option<Box<AuthError>>,
    },

    /// The callback `state` did not match the value stored at redirect time
    #[error("Invalid state parameter")]
    InvalidState,

    /// The callback arrived without an authorization code
    #[error("Authorization code not provided")]
    MissingAuthorizationCode,

    /// The userinfo claims carry no email address
    #[error("User account must have an email address to authenticate")]
    MissingEmail,

    /// The userinfo endpoint rejected the access token
    #[error("Failed to retrieve user information (HTTP {status})")]
    UserInfoFailed {
        /// HTTP status returned by the userinfo endpoint
        status: u16,
    },

    /// A REST call against the provider returned a non-success status
    #[error("Request failed with HTTP {status}: {body}")]
    RequestFailed {
        /// HTTP status returned by the provider
        status: u16,
        /// Raw response body
        body: String,
    },

    /// A filter query returned no results
    #[error("{description} not found")]
    NotFound {
        /// Human-readable description of what was looked up
        description: String,
    },

    /// The OIDC discovery document could not be retrieved
    #[error("Failed to retrieve OIDC discovery document: {source}")]
    DiscoveryFailed {
        /// Underlying fetch, status, or decoding failure
        #[source]
        source: Box<AuthError>,
    },

    /// The JSON Web Key Set could not be retrieved
    #[error("Failed to retrieve JWKS: {source}")]
    JwksFailed {
        /// Underlying fetch, status, or decoding failure
        #[source]
        source: Box<AuthError>,
    },

    /// A URL could not be built from configuration or input
    #[error("Invalid URL: {reason}")]
    InvalidUrl {
        /// Failure detail
        reason: String,
    },

    /// Network-level failure talking to the provider
    #[cfg(feature = "transport-errors")]
    #[error("HTTP transport error during {context}")]
    Transport {
        /// Operation in progress when the failure occurred
        context: &'static str,
        /// Underlying reqwest error
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with JSON that does not match the expected shape
    #[error("Invalid response during {context}")]
    InvalidResponse {
        /// Operation in progress when the failure occurred
        context: &'static str,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

impl AuthError {
    /// Missing configuration key
    #[must_use]
    pub const fn config_missing(key: &'static str) -> Self {
        Self::ConfigMissing { key }
    }

    /// Invalid configuration value
    pub fn config_invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            key,
            reason: reason.into(),
        }
    }

    /// Filter lookup without results
    pub fn not_found(description: impl Into<String>) -> Self {
        Self::NotFound {
            description: description.into(),
        }
    }

    /// Malformed JSON in a provider response
    #[must_use]
    pub const fn invalid_response(context: &'static str, source: serde_json::Error) -> Self {
        Self::InvalidResponse { context, source }
    }

    /// Refresh grant refused by the token endpoint
    #[must_use]
    pub const fn refresh_rejected(status: u16) -> Self {
        Self::RefreshFailed {
            status: Some(status),
            source: None,
        }
    }

    /// Refresh that failed before a usable reply arrived
    #[must_use]
    pub fn refresh_failed(status: Option<u16>, source: Self) -> Self {
        Self::RefreshFailed {
            status,
            source: Some(Box::new(source)),
        }
    }

    /// Discovery document fetch failure
    #[must_use]
    pub fn discovery_failed(source: Self) -> Self {
        Self::DiscoveryFailed {
            source: Box::new(source),
        }
    }

    /// Key set fetch failure
    #[must_use]
    pub fn jwks_failed(source: Self) -> Self {
        Self::JwksFailed {
            source: Box::new(source),
        }
    }

    /// Network failure
    #[cfg(feature = "transport-errors")]
    #[must_use]
    pub const fn transport(context: &'static str, source: reqwest::Error) -> Self {
        Self::Transport { context, source }
    }

    /// HTTP status a host application should answer with when this error
    /// terminates a browser request
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidState => 403,
            Self::MissingEmail
            | Self::MissingAuthorizationCode
            | Self::TokenExchangeFailed { .. }
            | Self::UserInfoFailed { .. } => 400,
            Self::RefreshFailed { .. } => 401,
            Self::NotFound { .. } => 404,
            Self::TokenRequestFailed { .. }
            | Self::RequestFailed { .. }
            | Self::DiscoveryFailed { .. }
            | Self::JwksFailed { .. }
            | Self::InvalidResponse { .. } => 502,
            #[cfg(feature = "transport-errors")]
            Self::Transport { .. } => 502,
            Self::ConfigMissing { .. } | Self::ConfigInvalid { .. } | Self::InvalidUrl { .. } => {
                500
            }
        }
    }

    /// Generic message safe to show to end users
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidState => "Invalid state parameter.",
            Self::MissingEmail => "User account must have an email address to authenticate.",
            Self::MissingAuthorizationCode => "Authorization code not provided.",
            Self::TokenExchangeFailed { .. } => {
                "Failed to exchange authorization code for tokens."
            }
            Self::UserInfoFailed { .. } => "Failed to retrieve user information.",
            Self::RefreshFailed { .. } => "Your session has expired. Please sign in again.",
            Self::NotFound { .. } => "The requested resource was not found.",
            _ => "The identity provider could not complete the request.",
        }
    }

    /// Whether this error should force the caller to start a fresh login
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(
            self,
            Self::RefreshFailed { .. } | Self::InvalidState | Self::UserInfoFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_facing_statuses() {
        assert_eq!(AuthError::InvalidState.http_status(), 403);
        assert_eq!(AuthError::MissingEmail.http_status(), 400);
        assert_eq!(
            AuthError::TokenExchangeFailed { status: 401 }.http_status(),
            400
        );
        assert_eq!(AuthError::not_found("User").http_status(), 404);
        assert_eq!(AuthError::config_missing("WSO2IS_BASE_URL").http_status(), 500);
    }

    #[test]
    fn test_public_message_hides_provider_body() {
        let error = AuthError::RequestFailed {
            status: 500,
            body: "stack trace with internal hostnames".to_owned(),
        };

        assert!(error.to_string().contains("internal hostnames"));
        assert!(!error.public_message().contains("internal hostnames"));
    }

    #[test]
    fn test_not_found_display_uses_description() {
        let error = AuthError::not_found("User with email 'a@b.c'");
        assert_eq!(error.to_string(), "User with email 'a@b.c' not found");
    }

    #[test]
    fn test_requires_login() {
        assert!(AuthError::refresh_rejected(400).requires_login());
        assert!(!AuthError::MissingEmail.requires_login());
    }

    #[test]
    fn test_wrapped_failures_keep_their_cause() {
        use std::error::Error as _;

        let error = AuthError::discovery_failed(AuthError::RequestFailed {
            status: 503,
            body: "maintenance".to_owned(),
        });
        assert_eq!(error.http_status(), 502);
        assert!(error.to_string().contains("HTTP 503"));
        assert!(error.source().is_some());
        assert!(matches!(
            &error,
            AuthError::DiscoveryFailed { source }
                if matches!(**source, AuthError::RequestFailed { status: 503, .. })
        ));

        let refresh = AuthError::refresh_failed(Some(200), AuthError::not_found("token"));
        assert!(refresh.requires_login());
        assert!(refresh.source().is_some());
    }
}
