// ABOUTME: OpenID Connect Authorization Code flow for browser logins
// ABOUTME: Redirect and callback handling, logout, account deletion, and user provisioning
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Authorization Code Flow
//!
//! The host application wires three endpoints to this module:
//! - login: [`AuthorizationFlow::build_login_redirect`]
//! - callback: [`AuthorizationFlow::handle_callback`]
//! - logout: [`AuthorizationFlow::build_logout_redirect`]
//!
//! The wire `state` parameter carries the whole JSON state object. Only its
//! inner `state` field is checked on callback; `previous_url` and `nonce` are
//! not signed.

/// Login, callback, logout, and account deletion
pub mod flow;
/// Local user provisioning hooks
pub mod provisioning;

pub use flow::{
    AccountDeletion, AuthorizationFlow, CallbackOutcome, CallbackQuery, FlowStage, LoginOptions,
    LogoutOutcome, Prompt,
};
pub use provisioning::{InMemoryUserStore, LocalUserStore, StoreProvisioner, UserProvisioner};
