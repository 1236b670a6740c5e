// ABOUTME: Discovery and JWKS commands for wso2is-cli
// ABOUTME: Prints the provider's OIDC metadata and signing keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use wso2is_auth::client::Wso2isClient;
use wso2is_auth::discovery::OidcDiscovery;

use crate::helpers::display::print_json;

/// Print the discovery document
pub async fn document(client: &Wso2isClient) -> Result<()> {
    let discovery = OidcDiscovery::new(client.clone());
    print_json(&discovery.discovery_document().await?)
}

/// Print the key set
pub async fn jwks(client: &Wso2isClient) -> Result<()> {
    let discovery = OidcDiscovery::new(client.clone());
    print_json(&discovery.jwks().await?)
}
