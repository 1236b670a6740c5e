// ABOUTME: Shared HTTP client construction with timeout and TLS configuration
// ABOUTME: Builds the reqwest client used for every identity provider call
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use wso2is_core::constants::http::USER_AGENT;
use wso2is_core::errors::{AuthError, AuthResult};

use crate::config::HttpClientConfig;

/// Create the provider HTTP client from transport settings
///
/// Certificate verification is disabled only when `verify_ssl` is false.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized
pub fn provider_client(config: &HttpClientConfig) -> AuthResult<Client> {
    create_custom_client(|builder| {
        builder
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .danger_accept_invalid_certs(!config.verify_ssl)
    })
}

/// Create a client with the crate user agent and caller-supplied settings
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized
pub fn create_custom_client<F>(config_fn: F) -> AuthResult<Client>
where
    F: FnOnce(ClientBuilder) -> ClientBuilder,
{
    config_fn(ClientBuilder::new().user_agent(USER_AGENT))
        .build()
        .map_err(|e| AuthError::transport("building HTTP client", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_client_builds_without_verification() {
        let config = HttpClientConfig {
            timeout_secs: 5,
            connect_timeout_secs: 2,
            verify_ssl: false,
        };
        assert!(provider_client(&config).is_ok());
    }
}
