// ABOUTME: Integration tests for OIDC discovery and JWKS caching
// ABOUTME: Cache hits, failure handling, key lookup, and cache sharing between instances
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wso2is_auth::cache::{CacheProvider, InMemoryCache};
use wso2is_auth::discovery::OidcDiscovery;
use wso2is_core::AuthError;

use common::test_client;

async fn mount_discovery(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/oauth2/oidcdiscovery"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issuer": format!("{}/oauth2/token", server.uri()),
            "jwks_uri": format!("{}/oauth2/jwks", server.uri())
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_jwks(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/oauth2/jwks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "keys": [
                {"kid": "key-1", "kty": "RSA", "n": "abc", "e": "AQAB"},
                {"kid": "key-2", "kty": "RSA", "n": "def", "e": "AQAB"}
            ]
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_documents_are_fetched_once() -> Result<()> {
    let server = MockServer::start().await;
    mount_discovery(&server, 1).await;
    mount_jwks(&server, 1).await;

    let discovery = OidcDiscovery::new(test_client(&server));
    let first = discovery.discovery_document().await?;
    let second = discovery.discovery_document().await?;
    assert_eq!(first, second);

    discovery.jwks().await?;
    let jwks = discovery.jwks().await?;
    assert_eq!(jwks["keys"].as_array().unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_discovery_failure_is_not_cached() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/oidcdiscovery"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let discovery = OidcDiscovery::new(test_client(&server));
    for _ in 0..2 {
        match discovery.discovery_document().await {
            Err(AuthError::DiscoveryFailed { source }) => {
                assert!(matches!(*source, AuthError::RequestFailed { status: 503, .. }));
            }
            other => panic!("expected DiscoveryFailed, got {other:?}"),
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_missing_jwks_uri() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/oidcdiscovery"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"issuer": "x"})))
        .mount(&server)
        .await;

    let result = OidcDiscovery::new(test_client(&server)).jwks().await;
    match result {
        Err(AuthError::DiscoveryFailed { source }) => {
            assert!(matches!(*source, AuthError::InvalidUrl { .. }));
        }
        other => panic!("expected DiscoveryFailed, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_jwks_fetch_failure() -> Result<()> {
    let server = MockServer::start().await;
    mount_discovery(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/oauth2/jwks"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = OidcDiscovery::new(test_client(&server)).jwks().await;
    match result {
        Err(error @ AuthError::JwksFailed { .. }) => {
            assert_eq!(error.http_status(), 502);
            assert!(error.to_string().contains("HTTP 500"));
        }
        other => panic!("expected JwksFailed, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_malformed_discovery_document_keeps_parse_error() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/oidcdiscovery"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let result = OidcDiscovery::new(test_client(&server)).discovery_document().await;
    match result {
        Err(AuthError::DiscoveryFailed { source }) => {
            assert!(matches!(*source, AuthError::InvalidResponse { .. }));
        }
        other => panic!("expected DiscoveryFailed, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_find_key_by_kid() -> Result<()> {
    let server = MockServer::start().await;
    mount_discovery(&server, 1).await;
    mount_jwks(&server, 1).await;

    let discovery = OidcDiscovery::new(test_client(&server));
    let key = discovery.find_key("key-2").await?.unwrap();
    assert_eq!(key["n"], "def");
    assert!(discovery.find_key("unknown").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_invalidate_forces_refetch() -> Result<()> {
    let server = MockServer::start().await;
    mount_discovery(&server, 2).await;

    let discovery = OidcDiscovery::new(test_client(&server));
    discovery.discovery_document().await?;
    discovery.invalidate().await;
    discovery.discovery_document().await?;
    Ok(())
}

#[tokio::test]
async fn test_shared_cache_across_instances() -> Result<()> {
    let server = MockServer::start().await;
    mount_discovery(&server, 1).await;

    let cache: Arc<dyn CacheProvider> = Arc::new(InMemoryCache::default());
    let first = OidcDiscovery::with_cache(test_client(&server), Arc::clone(&cache));
    let second = OidcDiscovery::with_cache(test_client(&server), cache);

    first.discovery_document().await?;
    let document = second.discovery_document().await?;
    assert!(document["jwks_uri"].as_str().unwrap().ends_with("/oauth2/jwks"));
    Ok(())
}
