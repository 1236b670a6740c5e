// ABOUTME: Access token lifecycle guard for logged-in sessions
// ABOUTME: Probes userinfo, refreshes once on failure, and logs out sessions that cannot recover
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Token lifecycle management
//!
//! Each guarded request probes the provider's userinfo endpoint with the
//! session's access token. A rejected token gets exactly one refresh attempt;
//! there is no backoff or retry loop.

use tracing::{debug, info, instrument, warn};
use wso2is_core::errors::AuthResult;
use wso2is_core::models::TokenPair;

use crate::client::Wso2isClient;
use crate::logging::AuthLogger;
use crate::session::SessionStore;

/// Outcome of validating a session's tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionValidation {
    /// Tokens are usable; the session holds the current pair
    Valid(TokenPair),
    /// The session could not be recovered and was logged out
    LoggedOut,
    /// Validation is disabled by configuration
    Skipped,
}

impl SessionValidation {
    /// Whether the request may proceed as authenticated
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Keeps a session's access token usable
#[derive(Debug, Clone)]
pub struct TokenLifecycleGuard {
    client: Wso2isClient,
}

impl TokenLifecycleGuard {
    /// Guard over `client`
    #[must_use]
    pub const fn new(client: Wso2isClient) -> Self {
        Self { client }
    }

    /// Return the pair unchanged if the access token passes the userinfo probe,
    /// otherwise the result of one refresh attempt
    ///
    /// # Errors
    ///
    /// Returns `RefreshFailed` when the refresh attempt fails for any reason
    #[instrument(skip_all, fields(service = "wso2is"))]
    pub async fn ensure_valid(&self, access_token: &str, refresh_token: &str) -> AuthResult<TokenPair> {
        if self.client.probe_user_info(access_token).await {
            debug!("Access token accepted by userinfo probe");
            return Ok(TokenPair::new(access_token, refresh_token));
        }

        info!("Access token rejected, attempting refresh");
        let refreshed = self.client.refresh_access_token(refresh_token).await?;
        AuthLogger::log_auth_event("session", "token_refresh", true, None);
        Ok(refreshed)
    }

    /// Validate the tokens stored in `session`, writing refreshed tokens back
    /// and logging the session out when they cannot be recovered
    #[instrument(skip_all, fields(service = "wso2is"))]
    pub async fn validate_session<S>(&self, session: &S) -> SessionValidation
    where
        S: SessionStore + ?Sized,
    {
        if self.client.config().skip_session_validation {
            return SessionValidation::Skipped;
        }

        let Some(tokens) = session.token_pair().await else {
            debug!("Session holds no provider tokens");
            end_session(session).await;
            return SessionValidation::LoggedOut;
        };

        match self
            .ensure_valid(&tokens.access_token, &tokens.refresh_token)
            .await
        {
            Ok(current) => {
                session.store_token_pair(&current).await;
                SessionValidation::Valid(current)
            }
            Err(e) => {
                warn!(error = %e, "Session tokens could not be refreshed, logging out");
                AuthLogger::log_auth_event("session", "token_refresh", false, Some(e.public_message()));
                end_session(session).await;
                SessionValidation::LoggedOut
            }
        }
    }
}

async fn end_session<S: SessionStore + ?Sized>(session: &S) {
    session.logout().await;
    session.invalidate().await;
}
