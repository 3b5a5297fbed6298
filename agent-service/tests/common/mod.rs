#![allow(dead_code)]

use agent_service::config::AgentConfig;
use agent_service::services::providers::mock::MockMessagesProvider;
use agent_service::startup::{build_router, AppState, Application};
use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use service_core::config::Config;
use std::sync::Arc;
use tower::util::ServiceExt;

pub const TEST_API_KEY: &str = "test-api-key";

/// Agent configuration pointing at `api_url`, bound to a random port.
pub fn test_config(api_url: &str) -> AgentConfig {
    let api_url = api_url.to_string();
    AgentConfig::from_lookup(Config { port: 0 }, move |key| match key {
        "ANTHROPIC_API_KEY" => Some(TEST_API_KEY.to_string()),
        "ANTHROPIC_API_URL" => Some(api_url.clone()),
        _ => None,
    })
    .expect("Failed to build test config")
}

pub fn router_with(provider: Arc<MockMessagesProvider>) -> Router {
    build_router(AppState::new(provider))
}

/// Send one request through the router and decode the JSON reply.
pub async fn send(router: Router, request: Request<Body>) -> (Response<Body>, serde_json::Value) {
    let response = router.oneshot(request).await.expect("Router failed");
    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    let json = serde_json::from_slice(&bytes).expect("Body is not JSON");
    (Response::from_parts(parts, Body::empty()), json)
}

pub fn post_execute(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/execute")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub provider: Arc<MockMessagesProvider>,
}

impl TestApp {
    /// Spawn the full application on a random port with a mock upstream.
    pub async fn spawn(provider: MockMessagesProvider) -> Self {
        let provider = Arc::new(provider);
        let app = Application::build_with_provider(
            test_config("http://127.0.0.1:9"),
            provider.clone(),
        )
        .await
        .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to answer
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            provider,
        }
    }
}
