// ABOUTME: Environment configuration for the WSO2 Identity Server integration
// ABOUTME: Loads provider URL, client credentials, scopes, and transport flags once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration, read once into an immutable [`Wso2isConfig`]

use std::env;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, info, warn};
use url::Url;
use wso2is_core::constants::{http, oauth};
use wso2is_core::errors::{AuthError, AuthResult};

/// Environment variable names
pub mod env_keys {
    /// Identity provider base URL
    pub const BASE_URL: &str = "WSO2IS_BASE_URL";
    /// OAuth client identifier
    pub const CLIENT_ID: &str = "WSO2IS_CLIENT_ID";
    /// OAuth client secret
    pub const CLIENT_SECRET: &str = "WSO2IS_CLIENT_SECRET";
    /// Authorization code callback URI
    pub const REDIRECT_URI: &str = "WSO2IS_REDIRECT_URI";
    /// Login scopes (space or comma separated)
    pub const SCOPES: &str = "WSO2IS_SCOPES";
    /// Scopes for client-credentials management calls
    pub const MANAGEMENT_SCOPES: &str = "WSO2IS_MANAGEMENT_SCOPES";
    /// `client_secret_post` or `client_secret_basic`
    pub const CLIENT_AUTH_METHOD: &str = "WSO2IS_CLIENT_AUTH_METHOD";
    /// Set to false to accept self-signed provider certificates
    pub const VERIFY_SSL: &str = "WSO2IS_VERIFY_SSL";
    /// Public URL of the host application
    pub const APP_URL: &str = "WSO2IS_APP_URL";
    /// Skip session validation (unit-test hosts)
    pub const SKIP_SESSION_VALIDATION: &str = "WSO2IS_SKIP_SESSION_VALIDATION";
    /// Request timeout in seconds
    pub const HTTP_TIMEOUT_SECS: &str = "WSO2IS_HTTP_TIMEOUT_SECS";
    /// Connect timeout in seconds
    pub const CONNECT_TIMEOUT_SECS: &str = "WSO2IS_CONNECT_TIMEOUT_SECS";
}

/// How the client authenticates itself at the token endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientAuthMethod {
    /// `client_id` and `client_secret` as form fields
    #[default]
    ClientSecretPost,
    /// HTTP Basic authorization header
    ClientSecretBasic,
}

impl FromStr for ClientAuthMethod {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "client_secret_post" | "post" => Ok(Self::ClientSecretPost),
            "client_secret_basic" | "basic" => Ok(Self::ClientSecretBasic),
            other => Err(AuthError::config_invalid(
                env_keys::CLIENT_AUTH_METHOD,
                format!("unknown client authentication method '{other}'"),
            )),
        }
    }
}

impl fmt::Display for ClientAuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientSecretPost => write!(f, "client_secret_post"),
            Self::ClientSecretBasic => write!(f, "client_secret_basic"),
        }
    }
}

/// HTTP transport settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Verify the provider's TLS certificate
    pub verify_ssl: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: http::DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: http::DEFAULT_CONNECT_TIMEOUT_SECS,
            verify_ssl: true,
        }
    }
}

/// Immutable settings consumed by the client, login flow, and token guard
#[derive(Clone)]
pub struct Wso2isConfig {
    /// Provider base URL without trailing slash
    pub base_url: String,
    /// OAuth client identifier
    pub client_id: String,
    /// OAuth client secret (redacted in `Debug`)
    pub client_secret: String,
    /// Authorization code callback URI
    pub redirect_uri: String,
    /// Scopes requested at login and code exchange
    pub scopes: Vec<String>,
    /// Scopes for client-credentials management calls; empty falls back to `scopes`
    pub management_scopes: Vec<String>,
    /// Token endpoint client authentication
    pub client_auth_method: ClientAuthMethod,
    /// Public URL of the host application, used to absolutize redirect paths
    pub app_url: Option<String>,
    /// Bypass session validation entirely (unit-test hosts)
    pub skip_session_validation: bool,
    /// HTTP transport settings
    pub http: HttpClientConfig,
}

impl fmt::Debug for Wso2isConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wso2isConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .field("management_scopes", &self.management_scopes)
            .field("client_auth_method", &self.client_auth_method)
            .field("app_url", &self.app_url)
            .field("skip_session_validation", &self.skip_session_validation)
            .field("http", &self.http)
            .finish()
    }
}

impl Wso2isConfig {
    /// Create a configuration with default scopes and transport settings
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scopes: default_scopes(),
            management_scopes: Vec::new(),
            client_auth_method: ClientAuthMethod::default(),
            app_url: None,
            skip_session_validation: false,
            http: HttpClientConfig::default(),
        }
    }

    /// Replace the login scopes
    #[must_use]
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the management scopes
    #[must_use]
    pub fn with_management_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.management_scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Select the token endpoint client authentication method
    #[must_use]
    pub const fn with_client_auth_method(mut self, method: ClientAuthMethod) -> Self {
        self.client_auth_method = method;
        self
    }

    /// Set the host application's public URL
    #[must_use]
    pub fn with_app_url(mut self, app_url: impl Into<String>) -> Self {
        self.app_url = Some(normalize_base_url(&app_url.into()));
        self
    }

    /// Enable or disable session validation bypass
    #[must_use]
    pub const fn with_skip_session_validation(mut self, skip: bool) -> Self {
        self.skip_session_validation = skip;
        self
    }

    /// Replace the HTTP transport settings
    #[must_use]
    pub const fn with_http(mut self, http: HttpClientConfig) -> Self {
        self.http = http;
        self
    }

    /// Load configuration from process environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` for absent required settings and `ConfigInvalid`
    /// for values that cannot be parsed
    pub fn from_env() -> AuthResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` for absent required settings and `ConfigInvalid`
    /// for values that cannot be parsed
    pub fn from_lookup<F>(lookup: F) -> AuthResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| value(key).ok_or(AuthError::config_missing(key));

        let scopes = value(env_keys::SCOPES).map_or_else(default_scopes, |raw| parse_scopes(&raw));
        let management_scopes = value(env_keys::MANAGEMENT_SCOPES)
            .map(|raw| parse_scopes(&raw))
            .unwrap_or_default();

        let client_auth_method = value(env_keys::CLIENT_AUTH_METHOD)
            .map(|raw| raw.parse())
            .transpose()?
            .unwrap_or_default();

        let http = HttpClientConfig {
            timeout_secs: parse_or(
                value(env_keys::HTTP_TIMEOUT_SECS),
                env_keys::HTTP_TIMEOUT_SECS,
                http::DEFAULT_TIMEOUT_SECS,
            )?,
            connect_timeout_secs: parse_or(
                value(env_keys::CONNECT_TIMEOUT_SECS),
                env_keys::CONNECT_TIMEOUT_SECS,
                http::DEFAULT_CONNECT_TIMEOUT_SECS,
            )?,
            verify_ssl: parse_flag(value(env_keys::VERIFY_SSL), env_keys::VERIFY_SSL, true)?,
        };

        let config = Self {
            base_url: normalize_base_url(&required(env_keys::BASE_URL)?),
            client_id: required(env_keys::CLIENT_ID)?,
            client_secret: required(env_keys::CLIENT_SECRET)?,
            redirect_uri: required(env_keys::REDIRECT_URI)?,
            scopes,
            management_scopes,
            client_auth_method,
            app_url: value(env_keys::APP_URL).map(|url| normalize_base_url(&url)),
            skip_session_validation: parse_flag(
                value(env_keys::SKIP_SESSION_VALIDATION),
                env_keys::SKIP_SESSION_VALIDATION,
                false,
            )?,
            http,
        };

        config.validate()?;
        config.log_summary();
        Ok(config)
    }

    /// Ensure required settings are present and URLs are well formed
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` or `ConfigInvalid` describing the first problem found
    pub fn validate(&self) -> AuthResult<()> {
        for (key, value) in [
            (env_keys::BASE_URL, &self.base_url),
            (env_keys::CLIENT_ID, &self.client_id),
            (env_keys::CLIENT_SECRET, &self.client_secret),
            (env_keys::REDIRECT_URI, &self.redirect_uri),
        ] {
            if value.trim().is_empty() {
                return Err(AuthError::config_missing(key));
            }
        }

        check_http_url(env_keys::BASE_URL, &self.base_url)?;
        check_http_url(env_keys::REDIRECT_URI, &self.redirect_uri)?;
        if let Some(app_url) = &self.app_url {
            check_http_url(env_keys::APP_URL, app_url)?;
        }

        if self.scopes.is_empty() {
            return Err(AuthError::config_invalid(
                env_keys::SCOPES,
                "at least one scope is required",
            ));
        }

        if !self.http.verify_ssl {
            warn!("TLS certificate verification is disabled for the identity provider");
        }

        Ok(())
    }

    /// Login scopes joined for the `scope` parameter
    #[must_use]
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }

    /// Scopes for client-credentials requests, falling back to login scopes
    #[must_use]
    pub fn management_scope_list(&self) -> &[String] {
        if self.management_scopes.is_empty() {
            &self.scopes
        } else {
            &self.management_scopes
        }
    }

    /// Absolute URL on the provider for a path such as `/oauth2/token`
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn log_summary(&self) {
        info!(
            base_url = %self.base_url,
            client_id = %self.client_id,
            scopes = %self.scope_string(),
            client_auth_method = %self.client_auth_method,
            "WSO2IS configuration loaded"
        );
        debug!(
            verify_ssl = self.http.verify_ssl,
            skip_session_validation = self.skip_session_validation,
            "WSO2IS transport settings"
        );
    }
}

fn default_scopes() -> Vec<String> {
    oauth::DEFAULT_SCOPES.iter().map(|s| (*s).to_owned()).collect()
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_owned()
}

/// Split a scope list on whitespace or commas
fn parse_scopes(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_flag(raw: Option<String>, key: &'static str, default: bool) -> AuthResult<bool> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(AuthError::config_invalid(
            key,
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

fn parse_or(raw: Option<String>, key: &'static str, default: u64) -> AuthResult<u64> {
    raw.map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e| AuthError::config_invalid(key, format!("{e}")))
    })
}

fn check_http_url(key: &'static str, raw: &str) -> AuthResult<()> {
    let url = Url::parse(raw).map_err(|e| AuthError::config_invalid(key, e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(AuthError::config_invalid(
            key,
            format!("unsupported URL scheme '{scheme}'"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scopes_accepts_spaces_and_commas() {
        assert_eq!(
            parse_scopes("openid, profile  email,internal_user_mgt_list"),
            vec!["openid", "profile", "email", "internal_user_mgt_list"]
        );
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag(Some("YES".to_owned()), "K", false).unwrap());
        assert!(!parse_flag(Some("0".to_owned()), "K", true).unwrap());
        assert!(parse_flag(None, "K", true).unwrap());
        assert!(matches!(
            parse_flag(Some("maybe".to_owned()), "K", true),
            Err(AuthError::ConfigInvalid { key: "K", .. })
        ));
    }

    #[test]
    fn test_client_auth_method_parsing() {
        assert_eq!(
            "client_secret_basic".parse::<ClientAuthMethod>().unwrap(),
            ClientAuthMethod::ClientSecretBasic
        );
        assert_eq!(
            "POST".parse::<ClientAuthMethod>().unwrap(),
            ClientAuthMethod::ClientSecretPost
        );
        assert!("private_key_jwt".parse::<ClientAuthMethod>().is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Wso2isConfig::new(
            "https://id.example.com/",
            "cid",
            "super-secret-value",
            "https://app.example.com/callback",
        );
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret-value"));
        assert_eq!(config.base_url, "https://id.example.com");
    }

    #[test]
    fn test_management_scopes_fall_back_to_login_scopes() {
        let config = Wso2isConfig::new("https://id", "c", "s", "https://app/cb");
        assert_eq!(config.management_scope_list(), config.scopes.as_slice());

        let config = config.with_management_scopes(["internal_user_mgt_view"]);
        assert_eq!(config.management_scope_list(), ["internal_user_mgt_view"]);
    }
}
