// ABOUTME: Authenticated HTTP client for the WSO2 Identity Server
// ABOUTME: Caches a client-credentials token and executes SCIM/admin REST calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Identity Provider Client
//!
//! [`Wso2isClient`] owns the provider credentials and the HTTP transport. It
//! exposes the token-endpoint primitives used by the login flow and the
//! lifecycle guard, plus a generic authenticated `request` used by the
//! resource wrappers.
//!
//! Clones share one token cache. Two callers that miss the cache at the same
//! time both fetch a token and the last write wins.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use reqwest::{Method, RequestBuilder, Response};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use wso2is_core::constants::{endpoints, oauth, scim};
use wso2is_core::errors::{AuthError, AuthResult};
use wso2is_core::models::{RemoteUser, TokenPair, TokenResponse};

use crate::config::{ClientAuthMethod, Wso2isConfig};
use crate::logging::AuthLogger;
use crate::resources::{Applications, Groups, Users};
use crate::utils::http_client::provider_client;

/// Seconds shaved off `expires_in` so a token is not used right at its deadline
const EXPIRY_SKEW_SECS: i64 = 30;

/// Client-credentials token held by the client
#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    fn from_response(response: TokenResponse) -> Self {
        let expires_at = response.expires_in.map(|secs| {
            let secs = i64::try_from(secs)
                .unwrap_or(i64::MAX)
                .min(i64::from(u32::MAX));
            Utc::now() + Duration::seconds(secs.saturating_sub(EXPIRY_SKEW_SECS).max(0))
        });
        Self {
            access_token: response.access_token,
            expires_at,
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at <= Utc::now())
    }
}

/// Authenticated client for the identity provider's OAuth2, SCIM2 and admin APIs
#[derive(Clone)]
pub struct Wso2isClient {
    config: Arc<Wso2isConfig>,
    http: reqwest::Client,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
}

impl Wso2isClient {
    /// Create a client, building the HTTP transport from the config
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed
    pub fn new(config: Wso2isConfig) -> AuthResult<Self> {
        let http = provider_client(&config.http)?;
        Ok(Self::with_http_client(config, http))
    }

    /// Create a client around an existing reqwest client
    #[must_use]
    pub fn with_http_client(config: Wso2isConfig, http: reqwest::Client) -> Self {
        Self {
            config: Arc::new(config),
            http,
            token_cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Provider settings
    #[must_use]
    pub fn config(&self) -> &Wso2isConfig {
        &self.config
    }

    /// Underlying HTTP transport
    #[must_use]
    pub const fn http_client(&self) -> &reqwest::Client {
        &self.http
    }

    /// SCIM2 users
    #[must_use]
    pub fn users(&self) -> Users {
        Users::new(self.clone())
    }

    /// SCIM2 groups
    #[must_use]
    pub fn groups(&self) -> Groups {
        Groups::new(self.clone())
    }

    /// Application management API
    #[must_use]
    pub fn applications(&self) -> Applications {
        Applications::new(self.clone())
    }

    /// Get a client-credentials access token, fetching one on a cache miss
    ///
    /// Scopes are the caller's, else the configured management scopes, else
    /// the login scopes.
    ///
    /// # Errors
    ///
    /// Returns `TokenRequestFailed` when the token endpoint rejects the request
    #[instrument(skip(self, scopes), fields(service = "wso2is", grant = oauth::GRANT_CLIENT_CREDENTIALS))]
    pub async fn get_access_token(&self, scopes: Option<&[String]>) -> AuthResult<String> {
        {
            let cache = self.token_cache.read().await;
            if let Some(token) = cache.as_ref().filter(|token| !token.is_expired()) {
                debug!("Using cached client-credentials token");
                return Ok(token.access_token.clone());
            }
        }

        let scope = scopes
            .filter(|scopes| !scopes.is_empty())
            .unwrap_or_else(|| self.config.management_scope_list())
            .join(" ");

        let form = vec![
            ("grant_type", oauth::GRANT_CLIENT_CREDENTIALS.to_owned()),
            ("scope", scope),
        ];
        let response = self
            .authenticated_token_request(form)
            .send()
            .await
            .map_err(|e| AuthError::transport("client credentials token request", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Client credentials token request failed");
            return Err(AuthError::TokenRequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = parse_json(response, "client credentials token response").await?;
        let cached = CachedToken::from_response(token);
        let access_token = cached.access_token.clone();
        *self.token_cache.write().await = Some(cached);

        debug!("Cached new client-credentials token");
        Ok(access_token)
    }

    /// Drop the cached client-credentials token
    pub async fn reset_access_token(&self) {
        *self.token_cache.write().await = None;
        debug!("Client-credentials token cache cleared");
    }

    /// Exchange a refresh token for a new pair.
    ///
    /// The input refresh token is returned when the provider does not rotate it.
    ///
    /// # Errors
    ///
    /// Every failure is a `RefreshFailed`: a refusal carries the status only,
    /// while transport and decoding failures also carry the underlying error
    #[instrument(skip_all, fields(service = "wso2is", grant = oauth::GRANT_REFRESH_TOKEN))]
    pub async fn refresh_access_token(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        let form = vec![
            ("grant_type", oauth::GRANT_REFRESH_TOKEN.to_owned()),
            ("refresh_token", refresh_token.to_owned()),
        ];
        let response = self
            .authenticated_token_request(form)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Refresh token request could not be sent");
                AuthError::refresh_failed(None, AuthError::transport("refresh token request", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Refresh token grant rejected");
            return Err(AuthError::refresh_rejected(status.as_u16()));
        }

        let token: TokenResponse = parse_json(response, "refresh token response")
            .await
            .map_err(|e| {
                warn!(status = status.as_u16(), error = %e, "Unusable refresh token response");
                AuthError::refresh_failed(Some(status.as_u16()), e)
            })?;
        Ok(TokenPair::from_refresh(token, refresh_token))
    }

    /// Exchange an authorization code for the user's tokens
    ///
    /// # Errors
    ///
    /// Returns `TokenExchangeFailed` when the token endpoint rejects the code
    #[instrument(skip_all, fields(service = "wso2is", grant = oauth::GRANT_AUTHORIZATION_CODE))]
    pub async fn exchange_authorization_code(&self, code: &str) -> AuthResult<TokenResponse> {
        let form = [
            ("grant_type", oauth::GRANT_AUTHORIZATION_CODE.to_owned()),
            ("client_id", self.config.client_id.clone()),
            ("client_secret", self.config.client_secret.clone()),
            ("code", code.to_owned()),
            ("redirect_uri", self.config.redirect_uri.clone()),
            ("scope", self.config.scope_string()),
        ];

        let response = self
            .http
            .post(self.config.endpoint(endpoints::TOKEN))
            .form(&form)
            .send()
            .await
            .map_err(|e| AuthError::transport("authorization code exchange", e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Authorization code exchange failed");
            return Err(AuthError::TokenExchangeFailed {
                status: status.as_u16(),
            });
        }

        parse_json(response, "authorization code token response").await
    }

    /// Fetch and map the userinfo claims for an access token
    ///
    /// # Errors
    ///
    /// Returns `UserInfoFailed` on a non-success reply and `MissingEmail` when
    /// the claims carry no email
    #[instrument(skip_all, fields(service = "wso2is"))]
    pub async fn fetch_user_info(&self, access_token: &str) -> AuthResult<RemoteUser> {
        let response = self
            .userinfo_request(access_token)
            .send()
            .await
            .map_err(|e| AuthError::transport("userinfo request", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::UserInfoFailed {
                status: status.as_u16(),
            });
        }

        let claims: Value = parse_json(response, "userinfo response").await?;
        RemoteUser::from_claims(claims)
    }

    /// Whether the provider still accepts an access token
    pub async fn probe_user_info(&self, access_token: &str) -> bool {
        match self.userinfo_request(access_token).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, "Userinfo probe failed at transport level");
                false
            }
        }
    }

    /// Execute an authenticated REST call against the provider.
    ///
    /// GET and DELETE send `data` as query parameters; other methods send it
    /// as the JSON body. Empty response bodies come back as `{}`.
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` with the status and body on a non-success reply,
    /// or any error from obtaining the access token
    #[instrument(skip(self, data, scopes), fields(service = "wso2is", method = %method, path = %path))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        data: Option<&Value>,
        scopes: Option<&[String]>,
    ) -> AuthResult<Value> {
        let access_token = self.get_access_token(scopes).await?;
        let started = Instant::now();

        let mut builder = self
            .http
            .request(method.clone(), self.resource_url(path))
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, scim::CONTENT_TYPE)
            .header(reqwest::header::CONTENT_TYPE, scim::CONTENT_TYPE);

        if let Some(data) = data {
            builder = if method == Method::GET || method == Method::DELETE {
                builder.query(&query_pairs(data))
            } else {
                builder.body(data.to_string())
            };
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AuthError::transport("provider API request", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::transport("reading provider API response", e))?;

        let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        AuthLogger::log_api_request(method.as_str(), path, status.as_u16(), elapsed);

        if !status.is_success() {
            return Err(AuthError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(json!({}));
        }
        serde_json::from_str(&body).map_err(|e| AuthError::invalid_response("provider API", e))
    }

    /// GET with optional query parameters
    ///
    /// # Errors
    ///
    /// See [`Wso2isClient::request`]
    pub async fn get(&self, path: &str, query: Option<&Value>) -> AuthResult<Value> {
        self.request(Method::GET, path, query, None).await
    }

    /// POST a JSON body
    ///
    /// # Errors
    ///
    /// See [`Wso2isClient::request`]
    pub async fn post(&self, path: &str, body: &Value) -> AuthResult<Value> {
        self.request(Method::POST, path, Some(body), None).await
    }

    /// PUT a JSON body
    ///
    /// # Errors
    ///
    /// See [`Wso2isClient::request`]
    pub async fn put(&self, path: &str, body: &Value) -> AuthResult<Value> {
        self.request(Method::PUT, path, Some(body), None).await
    }

    /// PATCH a JSON body
    ///
    /// # Errors
    ///
    /// See [`Wso2isClient::request`]
    pub async fn patch(&self, path: &str, body: &Value) -> AuthResult<Value> {
        self.request(Method::PATCH, path, Some(body), None).await
    }

    /// DELETE a resource
    ///
    /// # Errors
    ///
    /// See [`Wso2isClient::request`]
    pub async fn delete(&self, path: &str) -> AuthResult<Value> {
        self.request(Method::DELETE, path, None, None).await
    }

    /// POST to the token endpoint with the configured client authentication
    fn authenticated_token_request(&self, mut form: Vec<(&'static str, String)>) -> RequestBuilder {
        let builder = self.http.post(self.config.endpoint(endpoints::TOKEN));
        match self.config.client_auth_method {
            ClientAuthMethod::ClientSecretPost => {
                form.push(("client_id", self.config.client_id.clone()));
                form.push(("client_secret", self.config.client_secret.clone()));
                builder.form(&form)
            }
            ClientAuthMethod::ClientSecretBasic => builder
                .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
                .form(&form),
        }
    }

    fn userinfo_request(&self, access_token: &str) -> RequestBuilder {
        self.http
            .get(self.config.endpoint(endpoints::USERINFO))
            .bearer_auth(access_token)
    }

    fn resource_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            self.config.endpoint(path)
        } else {
            format!("{}/{path}", self.config.base_url)
        }
    }
}

impl std::fmt::Debug for Wso2isClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wso2isClient")
            .field("base_url", &self.config.base_url)
            .field("client_id", &self.config.client_id)
            .finish_non_exhaustive()
    }
}

/// Flatten a JSON object into query pairs; strings pass through unquoted
fn query_pairs(data: &Value) -> Vec<(String, String)> {
    data.as_object()
        .map(|object| {
            object
                .iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| {
                    let value = value
                        .as_str()
                        .map_or_else(|| value.to_string(), str::to_owned);
                    (key.clone(), value)
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Decode a JSON response body, attributing failures to `context`
pub(crate) async fn parse_json<T: serde::de::DeserializeOwned>(
    response: Response,
    context: &'static str,
) -> AuthResult<T> {
    let body = response
        .text()
        .await
        .map_err(|e| AuthError::transport(context, e))?;
    serde_json::from_str(&body).map_err(|e| AuthError::invalid_response(context, e))
}
