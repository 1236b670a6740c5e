// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Provider endpoint paths, session keys, OAuth defaults, and cache settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped by domain rather than kept in a single flat list.

/// Identity provider endpoint paths, relative to the configured base URL
pub mod endpoints {
    /// OAuth2 token endpoint (all grants)
    pub const TOKEN: &str = "/oauth2/token";
    /// OAuth2 authorization endpoint (browser redirect)
    pub const AUTHORIZE: &str = "/oauth2/authorize";
    /// OIDC userinfo endpoint
    pub const USERINFO: &str = "/oauth2/userinfo";
    /// OIDC discovery document
    pub const DISCOVERY: &str = "/oauth2/oidcdiscovery";
    /// OIDC RP-initiated logout endpoint (browser redirect)
    pub const LOGOUT: &str = "/oidc/logout";
    /// SCIM2 users collection
    pub const SCIM_USERS: &str = "/scim2/Users";
    /// SCIM2 groups collection
    pub const SCIM_GROUPS: &str = "/scim2/Groups";
    /// Application management API collection
    pub const APPLICATIONS: &str = "/api/server/v1/applications";
}

/// OAuth2 grant types, parameters, and defaults
pub mod oauth {
    /// Client credentials grant
    pub const GRANT_CLIENT_CREDENTIALS: &str = "client_credentials";
    /// Authorization code grant
    pub const GRANT_AUTHORIZATION_CODE: &str = "authorization_code";
    /// Refresh token grant
    pub const GRANT_REFRESH_TOKEN: &str = "refresh_token";
    /// Response type for the authorization code flow
    pub const RESPONSE_TYPE_CODE: &str = "code";
    /// Scopes requested when none are configured
    pub const DEFAULT_SCOPES: [&str; 3] = ["openid", "profile", "email"];
    /// Length of the random CSRF state and nonce values
    pub const STATE_LENGTH: usize = 32;
}

/// Session keys shared with the host application's session storage
pub mod session_keys {
    /// JSON-encoded `AuthState` stored between redirect and callback
    pub const AUTH_STATE: &str = "wso2is_state";
    /// User access token
    pub const ACCESS_TOKEN: &str = "wso2is_access_token";
    /// User refresh token
    pub const REFRESH_TOKEN: &str = "wso2is_refresh_token";
}

/// SCIM media types and list-response keys
pub mod scim {
    /// SCIM JSON media type sent as `Accept` and `Content-Type`
    pub const CONTENT_TYPE: &str = "application/scim+json";
    /// Result array key in SCIM list responses
    pub const RESOURCES_KEY: &str = "Resources";
    /// Result array key in application management list responses
    pub const APPLICATIONS_KEY: &str = "applications";
}

/// Discovery and JWKS caching
pub mod cache {
    use std::time::Duration;

    /// Discovery document cache key
    pub const DISCOVERY_KEY: &str = "wso2is:discovery";
    /// JWKS cache key
    pub const JWKS_KEY: &str = "wso2is:jwks";
    /// Lifetime of cached discovery and JWKS documents (12 hours)
    pub const DOCUMENT_TTL: Duration = Duration::from_secs(12 * 60 * 60);
    /// Upper bound on cached documents
    pub const MAX_ENTRIES: usize = 16;
}

/// HTTP client defaults
pub mod http {
    /// Request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Connect timeout in seconds
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
    /// User agent sent with every request
    pub const USER_AGENT: &str = concat!("wso2is-auth/", env!("CARGO_PKG_VERSION"));
}

/// Service identifiers used in structured logging
pub mod service_names {
    /// Library service name
    pub const WSO2IS_AUTH: &str = "wso2is-auth";
}
