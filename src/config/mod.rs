// ABOUTME: Configuration management module for the identity provider integration
// ABOUTME: Loads settings from the environment once and exposes them immutably
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Environment-driven provider configuration
pub mod environment;

pub use environment::{ClientAuthMethod, HttpClientConfig, Wso2isConfig};
