//! Upstream LLM provider abstraction and implementations.
//!
//! The orchestrator talks to a [`MessagesProvider`], so the Anthropic client
//! can be swapped for the recording mock in tests.

pub mod anthropic;
pub mod mock;

use crate::models::Pricing;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Upstream request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream API error ({status}): {body}")]
    Http { status: u16, body: String },

    #[error("Failed to decode upstream response: {0}")]
    Decode(String),
}

/// A single chat message sent upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamMessage {
    pub role: String,
    pub content: String,
}

impl UpstreamMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A content block of the upstream reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    /// Empty for non-text blocks.
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Decoded upstream reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamResponse {
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

impl UpstreamResponse {
    /// Text of the first content block, or `""` when there is none.
    pub fn first_text(&self) -> &str {
        self.content
            .first()
            .map(|block| block.text.as_str())
            .unwrap_or_default()
    }
}

/// Trait for providers that turn a system prompt and a user message into a
/// single model reply.
#[async_trait]
pub trait MessagesProvider: Send + Sync {
    /// Send one request upstream. Never retried.
    async fn create_message(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<UpstreamResponse, ProviderError>;

    /// Model identifier reported in results.
    fn model(&self) -> &str;

    /// Rates used to price a reply.
    fn pricing(&self) -> Pricing;

    fn calculate_cost(&self, input_tokens: u32, output_tokens: u32) -> f64 {
        self.pricing().calculate_cost(input_tokens, output_tokens)
    }
}
