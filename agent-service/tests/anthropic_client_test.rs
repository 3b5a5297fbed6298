//! Anthropic client tests against a local wiremock server.

mod common;

use agent_service::models::Pricing;
use agent_service::services::providers::anthropic::AnthropicClient;
use agent_service::services::providers::{MessagesProvider, ProviderError};
use common::{test_config, TEST_API_KEY};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn reply(text: &str, input_tokens: u32, output_tokens: u32) -> serde_json::Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "model": "claude-sonnet-4-5-20250929",
        "content": [{ "type": "text", "text": text }],
        "stop_reason": "end_turn",
        "usage": { "input_tokens": input_tokens, "output_tokens": output_tokens }
    })
}

fn client_for(server: &MockServer) -> AnthropicClient {
    let config = test_config(&server.uri());
    AnthropicClient::new(config.anthropic, config.pricing).expect("Failed to build client")
}

#[tokio::test]
async fn sends_expected_request_and_decodes_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", TEST_API_KEY))
        .and(header("anthropic-version", "2023-06-01"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("hello", 2, 3)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .create_message("system text", "User Query: hi\n\n")
        .await
        .expect("Request failed");

    assert_eq!(response.first_text(), "hello");
    assert_eq!(response.usage.input_tokens, 2);
    assert_eq!(response.usage.output_tokens, 3);

    let requests = server.received_requests().await.expect("Recording enabled");
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body,
        json!({
            "model": "claude-sonnet-4-5-20250929",
            "max_tokens": 4000,
            "system": "system text",
            "messages": [{ "role": "user", "content": "User Query: hi\n\n" }]
        })
    );
}

#[tokio::test]
async fn non_success_status_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(529)
                .set_body_string("{\"type\":\"error\",\"error\":{\"type\":\"overloaded_error\"}}"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_message("s", "u")
        .await
        .unwrap_err();

    match err {
        ProviderError::Http { status, body } => {
            assert_eq!(status, 529);
            assert!(body.contains("overloaded_error"));
        }
        other => panic!("expected Http error, got {:?}", other),
    }
}

#[tokio::test]
async fn invalid_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_message("s", "u")
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Decode(_)), "{:?}", err);
}

#[tokio::test]
async fn wrong_shape_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg", "content": [] })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_message("s", "u")
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Decode(_)), "{:?}", err);
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(reply("late", 1, 1))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let client = AnthropicClient::with_timeout(
        config.anthropic,
        config.pricing,
        Duration::from_millis(100),
    )
    .unwrap();

    let err = client.create_message("s", "u").await.unwrap_err();
    assert_eq!(err, ProviderError::Timeout(Duration::from_millis(100)));
}

#[tokio::test]
async fn unreachable_upstream_is_a_network_error() {
    // Nothing listens on the discard port.
    let config = test_config("http://127.0.0.1:9");
    let client = AnthropicClient::new(config.anthropic, config.pricing).unwrap();

    let err = client.create_message("s", "u").await.unwrap_err();
    assert!(matches!(err, ProviderError::Network(_)), "{:?}", err);
}

#[tokio::test]
async fn prices_reply_with_configured_rates() {
    let config = test_config("http://127.0.0.1:9");
    let client = AnthropicClient::new(
        config.anthropic,
        Pricing {
            input_per_million: 3.0,
            output_per_million: 15.0,
        },
    )
    .unwrap();

    assert_eq!(client.calculate_cost(2, 3), 0.0);
    assert_eq!(client.calculate_cost(1_000_000, 1_000_000), 18.0);
    assert_eq!(MessagesProvider::calculate_cost(&client, 1200, 850), 0.0163);
}
