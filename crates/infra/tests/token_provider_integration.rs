//! Integration tests for the client-credentials token provider

use std::sync::Arc;
use std::time::Duration;

use procura_domain::{AuthError, IdentityConfig};
use procura_infra::{AccessTokenProvider, HttpClient, IdentityTokenProvider};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn identity_config(server: &MockServer) -> IdentityConfig {
    IdentityConfig {
        domain: server.uri(),
        client_id: "procura-backend".to_string(),
        client_secret: "s3cret".to_string(),
        audience: "https://screening.example.com".to_string(),
    }
}

fn provider(server: &MockServer) -> IdentityTokenProvider {
    let http = HttpClient::builder().build().expect("http client");
    IdentityTokenProvider::new(identity_config(server), http).expect("provider")
}

async fn mount_token_endpoint(server: &MockServer, token: &str, expires_in: u64, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_partial_json(json!({
            "client_id": "procura-backend",
            "client_secret": "s3cret",
            "audience": "https://screening.example.com",
            "grant_type": "client_credentials",
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": token, "expires_in": expires_in })),
        )
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test]
async fn fresh_token_is_reused_across_calls() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "tok-1", 3600, 1).await;

    let provider = provider(&server);
    let first = provider.access_token().await.expect("first token");
    let second = provider.access_token().await.expect("second token");

    assert_eq!(first, "tok-1");
    assert_eq!(second, "tok-1");
    // expect(1) on the mock verifies only one upstream request happened
}

#[tokio::test]
async fn concurrent_callers_coalesce_into_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": "tok-shared", "expires_in": 3600 }))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = Arc::new(provider(&server));
    let mut handles = Vec::new();
    for _ in 0..10 {
        let provider = Arc::clone(&provider);
        handles.push(tokio::spawn(async move { provider.access_token().await }));
    }

    for handle in handles {
        let token = handle.await.expect("task").expect("token");
        assert_eq!(token, "tok-shared");
    }
}

#[tokio::test]
async fn token_inside_expiry_margin_is_refreshed() {
    let server = MockServer::start().await;
    // 300s lifetime equals the expiry margin, so the token is stale on arrival
    mount_token_endpoint(&server, "tok-short", 300, 2).await;

    let provider = provider(&server);
    provider.access_token().await.expect("first token");
    provider.access_token().await.expect("second token");
    // expect(2) on the mock verifies each call refreshed
}

#[tokio::test]
async fn token_endpoint_failure_maps_to_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(500).set_body_string("identity provider down"))
        .mount(&server)
        .await;

    let provider = provider(&server);
    let result = provider.access_token().await;

    match result {
        Err(AuthError::Request(message)) => {
            assert!(message.contains("500"), "message should carry the status: {message}");
        }
        other => panic!("expected request error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_token_body_maps_to_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let provider = provider(&server);
    let result = provider.access_token().await;
    assert!(matches!(result, Err(AuthError::Request(_))));
}
