// ABOUTME: OIDC discovery document and JWKS retrieval with a shared 12-hour cache
// ABOUTME: Lets hosts validate tokens locally instead of probing userinfo
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument};
use wso2is_core::constants::{cache, endpoints};
use wso2is_core::errors::{AuthError, AuthResult};

use crate::cache::{CacheProvider, InMemoryCache};
use crate::client::{parse_json, Wso2isClient};

/// Fetches and caches the provider's discovery document and key set.
///
/// Cache keys are fixed per provider; fetch failures are returned as-is and
/// never cached or retried.
#[derive(Clone)]
pub struct OidcDiscovery {
    client: Wso2isClient,
    cache: Arc<dyn CacheProvider>,
}

impl OidcDiscovery {
    /// Discovery backed by a private in-memory cache
    #[must_use]
    pub fn new(client: Wso2isClient) -> Self {
        Self::with_cache(client, Arc::new(InMemoryCache::default()))
    }

    /// Discovery backed by a shared cache
    #[must_use]
    pub fn with_cache(client: Wso2isClient, cache: Arc<dyn CacheProvider>) -> Self {
        Self { client, cache }
    }

    /// The provider's `/oauth2/oidcdiscovery` document
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryFailed` if the document cannot be fetched or parsed
    #[instrument(skip(self), fields(service = "wso2is"))]
    pub async fn discovery_document(&self) -> AuthResult<Value> {
        if let Some(document) = self.cache.get(cache::DISCOVERY_KEY).await {
            debug!("Discovery document cache hit");
            return Ok(document);
        }

        let url = self.client.config().endpoint(endpoints::DISCOVERY);
        let document = self
            .fetch(&url, "discovery document")
            .await
            .map_err(AuthError::discovery_failed)?;

        self.cache
            .set(cache::DISCOVERY_KEY, document.clone(), cache::DOCUMENT_TTL)
            .await;
        info!("Cached OIDC discovery document");
        Ok(document)
    }

    /// The JSON Web Key Set referenced by the discovery document's `jwks_uri`
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryFailed` if the discovery document is unavailable or has
    /// no `jwks_uri`, and `JwksFailed` if the key set cannot be fetched
    #[instrument(skip(self), fields(service = "wso2is"))]
    pub async fn jwks(&self) -> AuthResult<Value> {
        if let Some(jwks) = self.cache.get(cache::JWKS_KEY).await {
            debug!("JWKS cache hit");
            return Ok(jwks);
        }

        let document = self.discovery_document().await?;
        let jwks_uri = document
            .get("jwks_uri")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AuthError::discovery_failed(AuthError::InvalidUrl {
                    reason: "discovery document has no jwks_uri".to_owned(),
                })
            })?;

        let jwks = self
            .fetch(jwks_uri, "JWKS")
            .await
            .map_err(AuthError::jwks_failed)?;

        self.cache
            .set(cache::JWKS_KEY, jwks.clone(), cache::DOCUMENT_TTL)
            .await;
        info!(jwks_uri = %jwks_uri, "Cached JWKS");
        Ok(jwks)
    }

    /// Key with the given `kid`, if present in the key set
    ///
    /// # Errors
    ///
    /// See [`OidcDiscovery::jwks`]
    pub async fn find_key(&self, kid: &str) -> AuthResult<Option<Value>> {
        let jwks = self.jwks().await?;
        Ok(jwks
            .get("keys")
            .and_then(Value::as_array)
            .and_then(|keys| {
                keys.iter()
                    .find(|key| key.get("kid").and_then(Value::as_str) == Some(kid))
            })
            .cloned())
    }

    /// Drop both cached documents so the next call refetches
    pub async fn invalidate(&self) {
        self.cache.invalidate(cache::DISCOVERY_KEY).await;
        self.cache.invalidate(cache::JWKS_KEY).await;
        info!("OIDC discovery cache cleared");
    }

    async fn fetch(&self, url: &str, context: &'static str) -> AuthResult<Value> {
        let response = self
            .client
            .http_client()
            .get(url)
            .send()
            .await
            .map_err(|e| AuthError::transport(context, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        parse_json(response, context).await
    }
}

impl std::fmt::Debug for OidcDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OidcDiscovery")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}
