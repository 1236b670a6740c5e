// ABOUTME: Login URL command for wso2is-cli
// ABOUTME: Builds an authorize URL with fresh state for manual browser testing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use wso2is_auth::client::Wso2isClient;
use wso2is_auth::oauth2_client::{AuthorizationFlow, LoginOptions, Prompt};
use wso2is_auth::session::InMemorySession;

/// Print an authorize URL; the state is not kept, so the callback cannot be completed here
pub async fn url(client: &Wso2isClient, login_hint: Option<String>, force_login: bool) -> Result<()> {
    let mut options = LoginOptions::default();
    if let Some(hint) = login_hint {
        options = options.login_hint(hint);
    }
    if force_login {
        options = options.prompt(Prompt::Login);
    }

    let session = InMemorySession::new();
    let flow = AuthorizationFlow::new(client.clone());
    println!("{}", flow.build_login_redirect(&session, &options).await?);
    Ok(())
}
