// ABOUTME: wso2is-cli - operator command-line tool for a WSO2 Identity Server tenant
// ABOUTME: Inspects users, groups, applications, discovery metadata, and login URLs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Obtain a client-credentials token (masked unless --show)
//! wso2is-cli token --scopes internal_user_mgt_view
//!
//! # Look up a user
//! wso2is-cli users by-email alice@example.com
//!
//! # Add a user to a group
//! wso2is-cli groups add-user <group-id> <user-id>
//!
//! # Print the OIDC discovery document
//! wso2is-cli discovery
//! ```

mod commands;
mod helpers;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use wso2is_auth::client::Wso2isClient;
use wso2is_auth::config::Wso2isConfig;
use wso2is_auth::logging::LoggingConfig;

#[derive(Parser)]
#[command(
    name = "wso2is-cli",
    about = "WSO2 Identity Server management CLI",
    long_about = "Command-line tool for inspecting and managing users, groups, and applications on a WSO2 Identity Server. Reads WSO2IS_* environment variables."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Request a client-credentials access token
    Token {
        /// Scopes to request (defaults to the management scopes)
        #[arg(long, value_delimiter = ',')]
        scopes: Vec<String>,

        /// Print the full token instead of a masked preview
        #[arg(long)]
        show: bool,
    },

    /// SCIM2 user management
    Users {
        #[command(subcommand)]
        action: UsersCommand,
    },

    /// SCIM2 group management
    Groups {
        #[command(subcommand)]
        action: GroupsCommand,
    },

    /// Application management
    Apps {
        #[command(subcommand)]
        action: AppsCommand,
    },

    /// Print the OIDC discovery document
    Discovery,

    /// Print the provider's JSON Web Key Set
    Jwks,

    /// Print an authorization URL for a browser login
    LoginUrl {
        /// `login_hint` passed to the provider
        #[arg(long)]
        login_hint: Option<String>,

        /// Force the provider to re-authenticate
        #[arg(long)]
        force_login: bool,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum UsersCommand {
    /// List users
    List {
        /// SCIM filter expression
        #[arg(long)]
        filter: Option<String>,

        /// Maximum number of results
        #[arg(long)]
        count: Option<u32>,
    },
    /// Get a user by id
    Get {
        /// SCIM user id
        id: String,
    },
    /// Find a user by username
    ByUsername {
        /// `userName` value
        username: String,
    },
    /// Find a user by email
    ByEmail {
        /// Email address
        email: String,
    },
    /// Delete a user by id
    Delete {
        /// SCIM user id
        id: String,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum GroupsCommand {
    /// List groups
    List {
        /// SCIM filter expression
        #[arg(long)]
        filter: Option<String>,
    },
    /// Get a group by id
    Get {
        /// SCIM group id
        id: String,
    },
    /// Find a group by display name
    ByName {
        /// `displayName` value
        name: String,
    },
    /// Add a user to a group
    AddUser {
        /// SCIM group id
        group_id: String,
        /// SCIM user id
        user_id: String,
    },
    /// Remove a user from a group
    RemoveUser {
        /// SCIM group id
        group_id: String,
        /// SCIM user id
        user_id: String,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum AppsCommand {
    /// List applications
    List {
        /// Filter expression
        #[arg(long)]
        filter: Option<String>,
    },
    /// Get an application by id
    Get {
        /// Application id
        id: String,
    },
    /// Find an application by name
    ByName {
        /// Application name
        name: String,
    },
    /// Show the OIDC inbound configuration
    OidcConfig {
        /// Application id
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    LoggingConfig::for_cli(log_level).init()?;

    let config = Wso2isConfig::from_env().context("Failed to load WSO2IS configuration")?;
    let client = Wso2isClient::new(config).context("Failed to build HTTP client")?;
    info!("wso2is-cli connected to {}", client.config().base_url);

    match cli.command {
        Command::Token { scopes, show } => commands::token::request(&client, &scopes, show).await?,
        Command::Users { action } => match action {
            UsersCommand::List { filter, count } => {
                commands::users::list(&client, filter, count).await?;
            }
            UsersCommand::Get { id } => commands::users::get(&client, &id).await?,
            UsersCommand::ByUsername { username } => {
                commands::users::by_username(&client, &username).await?;
            }
            UsersCommand::ByEmail { email } => commands::users::by_email(&client, &email).await?,
            UsersCommand::Delete { id } => commands::users::delete(&client, &id).await?,
        },
        Command::Groups { action } => match action {
            GroupsCommand::List { filter } => commands::groups::list(&client, filter).await?,
            GroupsCommand::Get { id } => commands::groups::get(&client, &id).await?,
            GroupsCommand::ByName { name } => commands::groups::by_name(&client, &name).await?,
            GroupsCommand::AddUser { group_id, user_id } => {
                commands::groups::add_user(&client, &group_id, &user_id).await?;
            }
            GroupsCommand::RemoveUser { group_id, user_id } => {
                commands::groups::remove_user(&client, &group_id, &user_id).await?;
            }
        },
        Command::Apps { action } => match action {
            AppsCommand::List { filter } => commands::apps::list(&client, filter).await?,
            AppsCommand::Get { id } => commands::apps::get(&client, &id).await?,
            AppsCommand::ByName { name } => commands::apps::by_name(&client, &name).await?,
            AppsCommand::OidcConfig { id } => commands::apps::oidc_config(&client, &id).await?,
        },
        Command::Discovery => commands::discovery::document(&client).await?,
        Command::Jwks => commands::discovery::jwks(&client).await?,
        Command::LoginUrl {
            login_hint,
            force_login,
        } => commands::login::url(&client, login_hint, force_login).await?,
    }

    Ok(())
}
