//! Mock provider implementation for testing.

use super::{ContentBlock, MessagesProvider, ProviderError, UpstreamResponse, Usage};
use crate::models::Pricing;
use async_trait::async_trait;
use std::sync::Mutex;

pub const MOCK_MODEL: &str = "mock-model";

/// A prompt pair the mock has received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub system_prompt: String,
    pub user_message: String,
}

/// Mock provider that returns a canned reply and records every call.
pub struct MockMessagesProvider {
    reply: Result<UpstreamResponse, ProviderError>,
    pricing: Pricing,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockMessagesProvider {
    /// Reply with a single text block and the given token counts.
    pub fn replying(text: &str, input_tokens: u32, output_tokens: u32) -> Self {
        Self::with_response(UpstreamResponse {
            id: "msg_mock".to_string(),
            kind: "message".to_string(),
            role: "assistant".to_string(),
            model: MOCK_MODEL.to_string(),
            content: vec![ContentBlock {
                kind: "text".to_string(),
                text: text.to_string(),
            }],
            usage: Usage {
                input_tokens,
                output_tokens,
            },
        })
    }

    pub fn with_response(response: UpstreamResponse) -> Self {
        Self {
            reply: Ok(response),
            pricing: Pricing::default(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            reply: Err(error),
            pricing: Pricing::default(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_pricing(mut self, pricing: Pricing) -> Self {
        self.pricing = pricing;
        self
    }

    /// Number of times `create_message` was invoked.
    pub fn calls(&self) -> usize {
        self.requests().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MessagesProvider for MockMessagesProvider {
    async fn create_message(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<UpstreamResponse, ProviderError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                system_prompt: system_prompt.to_string(),
                user_message: user_message.to_string(),
            });
        }

        self.reply.clone()
    }

    fn model(&self) -> &str {
        MOCK_MODEL
    }

    fn pricing(&self) -> Pricing {
        self.pricing
    }
}
