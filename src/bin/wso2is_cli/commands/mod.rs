// ABOUTME: Command modules for wso2is-cli
// ABOUTME: One module per top-level subcommand group
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod apps;
pub mod discovery;
pub mod groups;
pub mod login;
pub mod token;
pub mod users;
