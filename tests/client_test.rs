// ABOUTME: Integration tests for the authenticated provider client
// ABOUTME: Token caching, client authentication, refresh, userinfo, and REST request handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{basic_auth, bearer_token, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wso2is_auth::client::Wso2isClient;
use wso2is_auth::config::ClientAuthMethod;
use wso2is_core::AuthError;

use common::{mount_management_token, received_forms, test_client, test_config, MANAGEMENT_TOKEN};

#[tokio::test]
async fn test_access_token_is_cached() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "cc-token-1",
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    assert_eq!(client.get_access_token(None).await?, "cc-token-1");
    assert_eq!(client.get_access_token(None).await?, "cc-token-1");

    let forms = received_forms(&server, "/oauth2/token").await;
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0]["grant_type"], "client_credentials");
    assert_eq!(forms[0]["client_id"], "cid");
    assert_eq!(forms[0]["client_secret"], "client-secret");
    assert_eq!(forms[0]["scope"], "openid profile email");
    Ok(())
}

#[tokio::test]
async fn test_clones_share_the_token_cache() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "shared"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let clone = client.clone();
    client.get_access_token(None).await?;
    assert_eq!(clone.get_access_token(None).await?, "shared");
    Ok(())
}

#[tokio::test]
async fn test_scope_precedence() -> Result<()> {
    let server = MockServer::start().await;
    mount_management_token(&server).await;

    let config = test_config(&server).with_management_scopes(["internal_user_mgt_list"]);
    let client = Wso2isClient::new(config)?;
    client.get_access_token(None).await?;

    client.reset_access_token().await;
    let requested = vec!["internal_group_mgt_view".to_owned(), "openid".to_owned()];
    client.get_access_token(Some(&requested)).await?;

    let forms = received_forms(&server, "/oauth2/token").await;
    assert_eq!(forms[0]["scope"], "internal_user_mgt_list");
    assert_eq!(forms[1]["scope"], "internal_group_mgt_view openid");
    Ok(())
}

#[tokio::test]
async fn test_basic_client_authentication() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(basic_auth("cid", "client-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "basic-token"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server).with_client_auth_method(ClientAuthMethod::ClientSecretBasic);
    let client = Wso2isClient::new(config)?;
    assert_eq!(client.get_access_token(None).await?, "basic-token");

    let forms = received_forms(&server, "/oauth2/token").await;
    assert!(!forms[0].contains_key("client_secret"));
    assert!(!forms[0].contains_key("client_id"));
    Ok(())
}

#[tokio::test]
async fn test_token_request_failure() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"error":"invalid_client"}"#))
        .mount(&server)
        .await;

    let client = test_client(&server);
    match client.get_access_token(None).await {
        Err(AuthError::TokenRequestFailed { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("invalid_client"));
        }
        other => panic!("expected TokenRequestFailed, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_reset_access_token_forces_new_request() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "t"})))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client.get_access_token(None).await?;
    client.reset_access_token().await;
    client.get_access_token(None).await?;
    Ok(())
}

#[tokio::test]
async fn test_refresh_keeps_refresh_token_when_not_rotated() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "fresh"})))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let pair = client.refresh_access_token("original-refresh").await?;
    assert_eq!(pair.access_token, "fresh");
    assert_eq!(pair.refresh_token, "original-refresh");

    let forms = received_forms(&server, "/oauth2/token").await;
    assert_eq!(forms[0]["grant_type"], "refresh_token");
    assert_eq!(forms[0]["refresh_token"], "original-refresh");
    assert_eq!(forms[0]["client_id"], "cid");
    Ok(())
}

#[tokio::test]
async fn test_refresh_returns_rotated_refresh_token() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "refresh_token": "rotated"
        })))
        .mount(&server)
        .await;

    let pair = test_client(&server).refresh_access_token("old").await?;
    assert_eq!(pair.refresh_token, "rotated");
    Ok(())
}

#[tokio::test]
async fn test_refresh_failure() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})))
        .mount(&server)
        .await;

    let result = test_client(&server).refresh_access_token("expired").await;
    assert!(matches!(result, Err(AuthError::RefreshFailed { status: Some(400), source: None })));
    Ok(())
}

#[tokio::test]
async fn test_refresh_with_unparsable_reply_is_refresh_failure() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = test_client(&server).refresh_access_token("old").await;
    match result {
        Err(AuthError::RefreshFailed { status, source }) => {
            assert_eq!(status, Some(200));
            assert!(matches!(
                source.as_deref(),
                Some(AuthError::InvalidResponse { .. })
            ));
        }
        other => panic!("expected RefreshFailed, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_delete_with_empty_body_returns_empty_object() -> Result<()> {
    let server = MockServer::start().await;
    mount_management_token(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/scim2/Users/user-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let response = client.request(Method::DELETE, "/scim2/Users/user-1", None, None).await?;
    assert_eq!(response, json!({}));
    Ok(())
}

#[tokio::test]
async fn test_request_sends_bearer_and_scim_headers() -> Result<()> {
    let server = MockServer::start().await;
    mount_management_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/scim2/Users/user-1"))
        .and(bearer_token(MANAGEMENT_TOKEN))
        .and(header("accept", "application/scim+json"))
        .and(header("content-type", "application/scim+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "user-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = test_client(&server).get("/scim2/Users/user-1", None).await?;
    assert_eq!(response["id"], "user-1");
    Ok(())
}

#[tokio::test]
async fn test_get_sends_data_as_query_parameters() -> Result<()> {
    let server = MockServer::start().await;
    mount_management_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/scim2/Users"))
        .and(query_param("filter", r#"userName eq "alice""#))
        .and(query_param("count", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"totalResults": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let query = json!({"filter": r#"userName eq "alice""#, "count": 5});
    test_client(&server).get("/scim2/Users", Some(&query)).await?;
    Ok(())
}

#[tokio::test]
async fn test_post_sends_json_body() -> Result<()> {
    let server = MockServer::start().await;
    mount_management_token(&server).await;
    let payload = json!({"userName": "bob", "emails": [{"value": "bob@example.com"}]});
    Mock::given(method("POST"))
        .and(path("/scim2/Users"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "new-user"})))
        .expect(1)
        .mount(&server)
        .await;

    let created = test_client(&server).post("/scim2/Users", &payload).await?;
    assert_eq!(created["id"], "new-user");
    Ok(())
}

#[tokio::test]
async fn test_request_failure_carries_status_and_body() -> Result<()> {
    let server = MockServer::start().await;
    mount_management_token(&server).await;
    Mock::given(method("PATCH"))
        .and(path("/scim2/Users/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_string("User not found"))
        .mount(&server)
        .await;

    let result = test_client(&server)
        .patch("/scim2/Users/ghost", &json!({"Operations": []}))
        .await;
    match result {
        Err(AuthError::RequestFailed { status, body }) => {
            assert_eq!(status, 404);
            assert_eq!(body, "User not found");
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_fetch_user_info_maps_claims() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/userinfo"))
        .and(bearer_token("user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::userinfo_claims()))
        .mount(&server)
        .await;

    let user = test_client(&server).fetch_user_info("user-token").await?;
    assert_eq!(user.id, "remote-123");
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.username.as_deref(), Some("ada"));
    assert_eq!(user.roles, vec!["admin"]);
    assert!(user.in_group("engineering"));
    Ok(())
}

#[tokio::test]
async fn test_fetch_user_info_errors() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/userinfo"))
        .and(bearer_token("no-email"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sub": "x"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/oauth2/userinfo"))
        .and(bearer_token("revoked"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = test_client(&server);
    assert!(matches!(
        client.fetch_user_info("no-email").await,
        Err(AuthError::MissingEmail)
    ));
    assert!(matches!(
        client.fetch_user_info("revoked").await,
        Err(AuthError::UserInfoFailed { status: 401 })
    ));
    assert!(!client.probe_user_info("revoked").await);
    Ok(())
}
