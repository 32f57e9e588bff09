// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::message::Role;

#[test]
fn role_str_matches_wire_vocabulary() {
    assert_eq!(HttpLlmClient::role_str(Role::System), "system");
    assert_eq!(HttpLlmClient::role_str(Role::User), "user");
    assert_eq!(HttpLlmClient::role_str(Role::Assistant), "assistant");
}

#[test]
fn new_defaults_base_url_when_unset() {
    let config = LlmConfig {
        provider: "generic".into(),
        model: "m".into(),
        base_url: None,
        api_key: None,
        timeout_secs: 10,
    };
    let client = HttpLlmClient::new(&config);
    assert_eq!(client.base_url, "http://127.0.0.1:11434");
    assert_eq!(client.model, "m");
}

#[test]
fn new_respects_configured_base_url() {
    let config = LlmConfig {
        provider: "generic".into(),
        model: "m".into(),
        base_url: Some("http://example.internal:8080".into()),
        api_key: None,
        timeout_secs: 10,
    };
    let client = HttpLlmClient::new(&config);
    assert_eq!(client.base_url, "http://example.internal:8080");
}

#[tokio::test]
async fn health_check_against_unreachable_host_is_false() {
    let config = LlmConfig {
        provider: "generic".into(),
        model: "m".into(),
        base_url: Some("http://127.0.0.1:1".into()),
        api_key: None,
        timeout_secs: 1,
    };
    let client = HttpLlmClient::new(&config);
    assert!(!client.health().await);
}

#[tokio::test]
async fn health_check_against_a_live_provider_is_true() {
    let server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .and(wiremock::matchers::path("/health"))
        .respond_with(wiremock::ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let config = LlmConfig {
        provider: "generic".into(),
        model: "m".into(),
        base_url: Some(server.uri()),
        api_key: None,
        timeout_secs: 5,
    };
    let client = HttpLlmClient::new(&config);
    assert!(client.health().await);
}

#[tokio::test]
async fn chat_posts_the_wire_shape_and_parses_the_reply() {
    let server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .and(wiremock::matchers::path("/chat"))
        .and(wiremock::matchers::body_partial_json(serde_json::json!({
            "model": "m",
            "stream": false,
            "messages": [{"role": "user", "content": "hello"}],
        })))
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": "CONTINUE",
            "model": "m",
            "usage": {"prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12},
        })))
        .mount(&server)
        .await;

    let config = LlmConfig {
        provider: "generic".into(),
        model: "m".into(),
        base_url: Some(server.uri()),
        api_key: None,
        timeout_secs: 5,
    };
    let client = HttpLlmClient::new(&config);
    let response = client.chat(&[crate::message::Message::user("hello")]).await.expect("chat succeeds");

    assert_eq!(response.content, "CONTINUE");
    assert_eq!(response.model, "m");
    assert_eq!(response.usage.total_tokens, 12);
}

#[tokio::test]
async fn chat_against_a_non_success_status_is_unavailable() {
    let server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .and(wiremock::matchers::path("/chat"))
        .respond_with(wiremock::ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = LlmConfig {
        provider: "generic".into(),
        model: "m".into(),
        base_url: Some(server.uri()),
        api_key: None,
        timeout_secs: 5,
    };
    let client = HttpLlmClient::new(&config);
    let err = client.chat(&[crate::message::Message::user("hello")]).await.unwrap_err();
    assert!(matches!(err, LlmError::Unavailable(_)));
}
