// ABOUTME: Identity and token models shared across the workspace
// ABOUTME: Re-exports remote user, token, auth state, and local user types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// CSRF state carried through the authorization redirect
pub mod auth_state;
/// Local application user record
pub mod local_user;
/// Token endpoint responses and access/refresh pairs
pub mod token;
/// Identity derived from userinfo claims
pub mod user;

pub use auth_state::AuthState;
pub use local_user::LocalUser;
pub use token::{TokenPair, TokenResponse};
pub use user::RemoteUser;
