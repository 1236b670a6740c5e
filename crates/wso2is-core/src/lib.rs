// ABOUTME: Core types and constants for the WSO2 Identity Server integration
// ABOUTME: Foundation crate with error handling, endpoint constants, and identity models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # WSO2IS Core
//!
//! Foundation crate providing shared types and constants for the WSO2 Identity
//! Server integration. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: `AuthError` taxonomy with HTTP status mapping
//! - **constants**: Provider endpoint paths, session keys, scopes, and cache TTLs
//! - **models**: `RemoteUser`, `TokenPair`, `AuthState`, and `LocalUser`

/// Unified error handling for provider communication and the login flow
pub mod errors;

/// Endpoint paths, session keys, and defaults organized by domain
pub mod constants;

/// Identity and token models shared by the client and the login flow
pub mod models;

pub use errors::{AuthError, AuthResult};
