// ABOUTME: Utility module for shared helpers
// ABOUTME: Holds HTTP client construction and SCIM filter formatting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// HTTP client construction
pub mod http_client;

/// SCIM filter expression helpers
pub mod filter;
