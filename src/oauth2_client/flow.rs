// ABOUTME: Authorization Code flow against the identity provider
// ABOUTME: Login redirect with CSRF state, callback validation, logout, and account deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use serde::Deserialize;
use tracing::{field, info, instrument, warn, Span};
use wso2is_core::constants::{endpoints, oauth, session_keys};
use wso2is_core::errors::{AuthError, AuthResult};
use wso2is_core::models::{AuthState, LocalUser, RemoteUser, TokenResponse};

use super::provisioning::{LocalUserStore, UserProvisioner};
use crate::client::Wso2isClient;
use crate::logging::AuthLogger;
use crate::session::SessionStore;

/// Position of one login attempt in the Authorization Code flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStage {
    /// Nothing started
    Idle,
    /// Browser sent to the authorize endpoint
    Redirected,
    /// Provider redirected back with `code` and `state`
    CallbackReceived,
    /// Tokens exchanged and local user resolved
    Authenticated,
    /// Callback failed validation or exchange
    Rejected,
}

impl FlowStage {
    /// Label used in tracing fields
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Redirected => "redirected",
            Self::CallbackReceived => "callback_received",
            Self::Authenticated => "authenticated",
            Self::Rejected => "rejected",
        }
    }

    /// Whether the attempt is finished
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Authenticated | Self::Rejected)
    }
}

impl fmt::Display for FlowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OIDC `prompt` values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// No interaction; fail if the user is not already signed in
    None,
    /// Force re-authentication
    Login,
    /// Force the consent screen
    Consent,
    /// Let the user pick an account
    SelectAccount,
}

impl Prompt {
    /// Wire value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Login => "login",
            Self::Consent => "consent",
            Self::SelectAccount => "select_account",
        }
    }
}

/// Optional parameters for the authorize redirect
#[derive(Debug, Clone, Default)]
pub struct LoginOptions {
    /// `prompt`
    pub prompt: Option<Prompt>,
    /// `login_hint`
    pub login_hint: Option<String>,
    /// `domain_hint`
    pub domain_hint: Option<String>,
    /// `max_age` in seconds
    pub max_age: Option<u64>,
    /// `acr_values`
    pub acr_values: Option<String>,
    /// Where to send the user after login
    pub previous_url: Option<String>,
}

impl LoginOptions {
    /// Set `prompt`
    #[must_use]
    pub const fn prompt(mut self, prompt: Prompt) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Set `login_hint`
    #[must_use]
    pub fn login_hint(mut self, hint: impl Into<String>) -> Self {
        self.login_hint = Some(hint.into());
        self
    }

    /// Set `domain_hint`
    #[must_use]
    pub fn domain_hint(mut self, hint: impl Into<String>) -> Self {
        self.domain_hint = Some(hint.into());
        self
    }

    /// Set `max_age`
    #[must_use]
    pub const fn max_age(mut self, seconds: u64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    /// Set `acr_values`
    #[must_use]
    pub fn acr_values(mut self, values: impl Into<String>) -> Self {
        self.acr_values = Some(values.into());
        self
    }

    /// Remember the page the user came from
    #[must_use]
    pub fn previous_url(mut self, url: impl Into<String>) -> Self {
        self.previous_url = Some(url.into());
        self
    }
}

/// Query parameters of the provider's callback redirect
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code
    pub code: Option<String>,
    /// JSON state blob echoed back by the provider
    pub state: Option<String>,
    /// OAuth error code, when the provider refused
    pub error: Option<String>,
    /// Human-readable error detail
    pub error_description: Option<String>,
}

/// Result of a successful callback
pub struct CallbackOutcome<U> {
    /// Local user now logged in
    pub user: U,
    /// Provider identity the user was resolved from
    pub remote_user: RemoteUser,
    /// Tokens issued by the code exchange
    pub tokens: TokenResponse,
    /// Decoded previous URL captured before the state was cleared
    pub previous_url: Option<String>,
}

impl<U> CallbackOutcome<U> {
    /// Post-login destination: the previous URL unless it is empty or the
    /// application root, otherwise `default`
    #[must_use]
    pub fn redirect_target(&self, default: &str, app_root: &str) -> String {
        let root = app_root.trim_end_matches('/');
        match self.previous_url.as_deref() {
            Some(url) if !url.is_empty() && url.trim_end_matches('/') != root => url.to_owned(),
            _ => default.to_owned(),
        }
    }
}

/// Where to send the browser after logout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutOutcome {
    /// Redirect location
    pub location: String,
    /// Whether the location is the provider's logout endpoint
    pub single_sign_out: bool,
}

/// Result of an account deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDeletion {
    /// The provider identity was removed
    pub remote_deleted: bool,
    /// Why the remote deletion failed, for display to the user
    pub remote_error: Option<String>,
    /// A local record was removed
    pub local_deleted: bool,
}

/// Browser-facing Authorization Code flow
#[derive(Debug, Clone)]
pub struct AuthorizationFlow {
    client: Wso2isClient,
}

impl AuthorizationFlow {
    /// Flow over `client`
    #[must_use]
    pub const fn new(client: Wso2isClient) -> Self {
        Self { client }
    }

    /// Client used for token and userinfo calls
    #[must_use]
    pub const fn client(&self) -> &Wso2isClient {
        &self.client
    }

    /// Start a login: store fresh state in the session and return the
    /// authorize URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be serialized
    #[instrument(skip_all, fields(service = "wso2is", stage = FlowStage::Redirected.as_str()))]
    pub async fn build_login_redirect<S>(&self, session: &S, options: &LoginOptions) -> AuthResult<String>
    where
        S: SessionStore + ?Sized,
    {
        let config = self.client.config();
        let auth_state = AuthState::generate(options.previous_url.as_deref().unwrap_or_default());
        let state_json = auth_state.to_json()?;
        session.put(session_keys::AUTH_STATE, state_json.clone()).await;

        let mut params: Vec<(&str, String)> = vec![
            ("response_type", oauth::RESPONSE_TYPE_CODE.to_owned()),
            ("client_id", config.client_id.clone()),
            ("redirect_uri", config.redirect_uri.clone()),
            ("scope", config.scope_string()),
            ("state", state_json),
            ("nonce", auth_state.nonce),
        ];
        if let Some(prompt) = options.prompt {
            params.push(("prompt", prompt.as_str().to_owned()));
        }
        if let Some(hint) = &options.login_hint {
            params.push(("login_hint", hint.clone()));
        }
        if let Some(hint) = &options.domain_hint {
            params.push(("domain_hint", hint.clone()));
        }
        if let Some(max_age) = options.max_age {
            params.push(("max_age", max_age.to_string()));
        }
        if let Some(acr) = &options.acr_values {
            params.push(("acr_values", acr.clone()));
        }

        info!("Redirecting to identity provider for login");
        Ok(format!(
            "{}?{}",
            config.endpoint(endpoints::AUTHORIZE),
            encode_query(&params)
        ))
    }

    /// Complete a login from the provider's callback.
    ///
    /// The stored state is removed from the session whatever the outcome.
    ///
    /// # Errors
    ///
    /// - `InvalidState` when the callback state is missing, malformed, or differs
    /// - `MissingAuthorizationCode` when no code was returned
    /// - `TokenExchangeFailed`, `UserInfoFailed`, `MissingEmail` from the provider calls
    /// - any error raised by the provisioner
    #[instrument(skip_all, fields(service = "wso2is", stage = field::Empty, sub = field::Empty))]
    pub async fn handle_callback<S, P>(
        &self,
        session: &S,
        query: &CallbackQuery,
        provisioner: &P,
    ) -> AuthResult<CallbackOutcome<P::User>>
    where
        S: SessionStore + ?Sized,
        P: UserProvisioner + ?Sized,
    {
        let span = Span::current();
        span.record("stage", FlowStage::CallbackReceived.as_str());

        let result = self.complete_callback(session, query, provisioner).await;
        let stage = if result.is_ok() {
            FlowStage::Authenticated
        } else {
            FlowStage::Rejected
        };
        span.record("stage", stage.as_str());

        match &result {
            Ok(outcome) => {
                span.record("sub", outcome.remote_user.id.as_str());
                AuthLogger::log_auth_event(&outcome.remote_user.id, "login", true, None);
            }
            Err(e) => {
                warn!(error = %e, "Login callback rejected");
                AuthLogger::log_auth_event("unknown", "login", false, Some(e.public_message()));
            }
        }
        result
    }

    async fn complete_callback<S, P>(
        &self,
        session: &S,
        query: &CallbackQuery,
        provisioner: &P,
    ) -> AuthResult<CallbackOutcome<P::User>>
    where
        S: SessionStore + ?Sized,
        P: UserProvisioner + ?Sized,
    {
        let stored = session.get(session_keys::AUTH_STATE).await;
        session.forget(session_keys::AUTH_STATE).await;

        let auth_state = stored
            .as_deref()
            .and_then(AuthState::from_json)
            .ok_or(AuthError::InvalidState)?;
        let callback_state = query.state.as_deref().ok_or(AuthError::InvalidState)?;
        if !auth_state.matches(callback_state) {
            return Err(AuthError::InvalidState);
        }
        let previous_url = auth_state.decoded_previous_url();

        if let Some(error) = &query.error {
            warn!(
                error = %error,
                description = query.error_description.as_deref().unwrap_or_default(),
                "Provider returned an authorization error"
            );
        }
        let code = query
            .code
            .as_deref()
            .filter(|code| !code.is_empty())
            .ok_or(AuthError::MissingAuthorizationCode)?;

        let tokens = self.client.exchange_authorization_code(code).await?;
        let remote_user = self.client.fetch_user_info(&tokens.access_token).await?;

        let user = match provisioner.find(&remote_user).await? {
            Some(existing) => provisioner.update(existing, &remote_user).await?,
            None => {
                let created = provisioner.create(&remote_user).await?;
                provisioner.on_registered(&created).await;
                created
            }
        };

        session.login(&provisioner.session_key(&user)).await;
        session
            .put(session_keys::ACCESS_TOKEN, tokens.access_token.clone())
            .await;
        if let Some(refresh_token) = &tokens.refresh_token {
            session
                .put(session_keys::REFRESH_TOKEN, refresh_token.clone())
                .await;
        }
        session.regenerate().await;

        Ok(CallbackOutcome {
            user,
            remote_user,
            tokens,
            previous_url,
        })
    }

    /// Log out locally and, when the session held a provider token, return the
    /// provider logout URL for single sign-out
    #[instrument(skip_all, fields(service = "wso2is"))]
    pub async fn build_logout_redirect<S>(
        &self,
        session: &S,
        post_logout_redirect_to: Option<&str>,
    ) -> LogoutOutcome
    where
        S: SessionStore + ?Sized,
    {
        let access_token = session.get(session_keys::ACCESS_TOKEN).await;
        let subject = session.authenticated_user().await;

        session.logout().await;
        session.invalidate().await;
        AuthLogger::log_auth_event(subject.as_deref().unwrap_or("anonymous"), "logout", true, None);

        if access_token.is_some() {
            return LogoutOutcome {
                location: self.logout_url(post_logout_redirect_to),
                single_sign_out: true,
            };
        }

        LogoutOutcome {
            location: post_logout_redirect_to
                .filter(|target| !target.is_empty())
                .unwrap_or("/")
                .to_owned(),
            single_sign_out: false,
        }
    }

    /// Provider logout URL, without touching any session
    #[must_use]
    pub fn logout_url(&self, post_logout_redirect_to: Option<&str>) -> String {
        let base = self.client.config().endpoint(endpoints::LOGOUT);
        match post_logout_redirect_to.filter(|target| !target.is_empty()) {
            Some(target) => {
                let absolute = self.absolute_url(target);
                format!(
                    "{base}?{}",
                    encode_query(&[("post_logout_redirect_uri", absolute)])
                )
            }
            None => base,
        }
    }

    /// Delete the user's provider identity (best effort), then the local
    /// record, then end the session
    ///
    /// # Errors
    ///
    /// Returns an error only if the local deletion fails
    #[instrument(skip_all, fields(service = "wso2is", user_id = %user.id))]
    pub async fn delete_account<S, L>(
        &self,
        session: &S,
        user: &LocalUser,
        store: &L,
    ) -> AuthResult<AccountDeletion>
    where
        S: SessionStore + ?Sized,
        L: LocalUserStore + ?Sized,
    {
        let remote = self.delete_remote_identity(user).await;
        let remote_error = remote.err().map(|e| {
            warn!(error = %e, "Failed to delete identity provider account");
            e.to_string()
        });

        let local_deleted = store.delete(user.id).await?;

        session.logout().await;
        session.invalidate().await;

        AuthLogger::log_auth_event(
            user.external_id.as_deref().unwrap_or_default(),
            "account_deleted",
            remote_error.is_none(),
            remote_error.as_deref(),
        );

        Ok(AccountDeletion {
            remote_deleted: remote_error.is_none(),
            remote_error,
            local_deleted,
        })
    }

    async fn delete_remote_identity(&self, user: &LocalUser) -> AuthResult<()> {
        let users = self.client.users();
        let remote_id = match user.external_id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => id.to_owned(),
            None => users
                .get_by_email(&user.email)
                .await?
                .get("id")
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
                .ok_or_else(|| AuthError::not_found(format!("User with email '{}'", user.email)))?,
        };

        users.delete(&remote_id).await?;
        info!(remote_id = %remote_id, "Deleted identity provider account");
        Ok(())
    }

    fn absolute_url(&self, target: &str) -> String {
        if target.starts_with("http://") || target.starts_with("https://") {
            return target.to_owned();
        }
        match &self.client.config().app_url {
            Some(app_url) => format!("{app_url}/{}", target.trim_start_matches('/')),
            None => target.to_owned(),
        }
    }
}

/// Percent-encode query pairs; spaces become `%20`
fn encode_query<V: AsRef<str>>(params: &[(&str, V)]) -> String {
    params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
