// ABOUTME: Main library entry point for the WSO2 Identity Server integration
// ABOUTME: OIDC login flow, token lifecycle, and SCIM2/admin management client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # WSO2IS Auth
//!
//! Authenticate web application users against a WSO2 Identity Server and
//! manage its users, groups and applications.
//!
//! ## Components
//!
//! - **Client**: [`client::Wso2isClient`] caches a client-credentials token
//!   and executes authenticated SCIM/admin calls
//! - **Resources**: [`resources`] wraps `/scim2/Users`, `/scim2/Groups` and
//!   the application management API
//! - **Login flow**: [`oauth2_client::AuthorizationFlow`] builds the authorize
//!   redirect, validates the callback state, and provisions the local user
//! - **Token guard**: [`lifecycle::TokenLifecycleGuard`] keeps a session's
//!   access token usable with a single refresh attempt
//! - **Discovery**: [`discovery::OidcDiscovery`] caches the discovery
//!   document and JWKS for 12 hours
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use wso2is_auth::client::Wso2isClient;
//! use wso2is_auth::config::Wso2isConfig;
//! use wso2is_auth::oauth2_client::{AuthorizationFlow, LoginOptions};
//! use wso2is_auth::session::InMemorySession;
//! use wso2is_core::AuthResult;
//!
//! # async fn example() -> AuthResult<()> {
//! let config = Wso2isConfig::from_env()?;
//! let client = Wso2isClient::new(config)?;
//!
//! let session = InMemorySession::new();
//! let flow = AuthorizationFlow::new(client.clone());
//! let redirect = flow
//!     .build_login_redirect(&session, &LoginOptions::default())
//!     .await?;
//! println!("Send the browser to {redirect}");
//!
//! let alice = client.users().get_by_username("alice").await?;
//! println!("{alice}");
//! # Ok(())
//! # }
//! ```

/// Document cache used by discovery
pub mod cache;

/// Authenticated provider client
pub mod client;

/// Environment configuration
pub mod config;

/// OIDC discovery and JWKS
pub mod discovery;

/// Access token lifecycle guard
pub mod lifecycle;

/// Structured logging setup
pub mod logging;

/// Authorization Code flow and user provisioning
pub mod oauth2_client;

/// SCIM2 and admin REST resources
pub mod resources;

/// Session storage seam
pub mod session;

/// Shared helpers
pub mod utils;

pub use wso2is_core::{constants, errors, models};
pub use wso2is_core::{AuthError, AuthResult};
