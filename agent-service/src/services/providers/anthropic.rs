//! Anthropic Messages API client.
//!
//! Sends one non-streaming request per call and prices the reply.

use super::{MessagesProvider, ProviderError, UpstreamMessage, UpstreamResponse};
use crate::config::AnthropicConfig;
use crate::models::Pricing;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;
use std::time::Duration;

const MESSAGES_PATH: &str = "/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Anthropic API client.
#[derive(Clone)]
pub struct AnthropicClient {
    config: AnthropicConfig,
    pricing: Pricing,
    timeout: Duration,
    client: Client,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig, pricing: Pricing) -> Result<Self, ProviderError> {
        if config.api_key.expose_secret().trim().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Anthropic API key not configured".to_string(),
            ));
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        Self::with_timeout(config, pricing, timeout)
    }

    /// Like [`AnthropicClient::new`] with an explicit request timeout.
    pub fn with_timeout(
        config: AnthropicConfig,
        pricing: Pricing,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            config,
            pricing,
            timeout,
            client,
        })
    }

    fn api_url(&self) -> String {
        format!("{}{}", self.config.api_url, MESSAGES_PATH)
    }

    pub fn calculate_cost(&self, input_tokens: u32, output_tokens: u32) -> f64 {
        self.pricing.calculate_cost(input_tokens, output_tokens)
    }

    fn map_send_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.timeout)
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl MessagesProvider for AnthropicClient {
    async fn create_message(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<UpstreamResponse, ProviderError> {
        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system: system_prompt,
            messages: vec![UpstreamMessage::user(user_message)],
        };

        tracing::debug!(
            model = %self.config.model,
            system_len = system_prompt.len(),
            message_len = user_message.len(),
            "Sending request to Anthropic API"
        );

        let response = self
            .client
            .post(self.api_url())
            .header("x-api-key", self.config.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        // The timeout covers the body as well as the headers.
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Anthropic API returned an error");
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn pricing(&self) -> Pricing {
        self.pricing
    }
}

// ============================================================================
// Anthropic API Request Types
// ============================================================================

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "str::is_empty")]
    system: &'a str,
    messages: Vec<UpstreamMessage>,
}
