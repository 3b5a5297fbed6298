//! Agent orchestration: prompt composition, the upstream call, and result
//! assembly.

use super::interpreter;
use super::providers::{MessagesProvider, ProviderError};
use crate::models::{ExecutionResult, TokenUsage};
use serde_json::{Map, Value};
use std::fmt::Write;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

const SYSTEM_PROMPT: &str = r#"You are a helpful AI assistant specialized in data analysis and insights.

Your task is to analyze the provided information and generate actionable insights.

Respond with valid JSON in this format:
{
  "analysis": "Your detailed analysis",
  "insights": ["insight 1", "insight 2", "insight 3"],
  "recommendations": ["recommendation 1", "recommendation 2"]
}"#;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("upstream call failed: {0}")]
    Upstream(#[from] ProviderError),
}

pub struct Agent {
    provider: Arc<dyn MessagesProvider>,
}

impl Agent {
    pub fn new(provider: Arc<dyn MessagesProvider>) -> Self {
        Self { provider }
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// The fixed instruction describing the expected output schema.
    pub fn system_prompt() -> &'static str {
        SYSTEM_PROMPT
    }

    /// Render the prompt followed by one `- key: value` line per context
    /// entry, in key order.
    pub fn build_user_message(prompt: &str, context: Option<&Map<String, Value>>) -> String {
        let mut message = format!("User Query: {}\n\n", prompt);

        let Some(context) = context.filter(|c| !c.is_empty()) else {
            return message;
        };

        let mut entries: Vec<_> = context.iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        message.push_str("Additional Context:\n");
        for (key, value) in entries {
            // Writing to a String cannot fail.
            let _ = writeln!(message, "- {}: {}", key, render_value(value));
        }

        message
    }

    pub async fn execute(
        &self,
        prompt: &str,
        context: Option<&Map<String, Value>>,
    ) -> Result<ExecutionResult, AgentError> {
        let user_message = Self::build_user_message(prompt, context);

        let started = Instant::now();
        let response = self
            .provider
            .create_message(SYSTEM_PROMPT, &user_message)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, model = %self.model(), "Upstream call failed");
                AgentError::from(e)
            })?;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let usage = response.usage;
        let cost = self
            .provider
            .calculate_cost(usage.input_tokens, usage.output_tokens);
        let result = interpreter::interpret(response.first_text());

        tracing::info!(
            model = %self.model(),
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            cost,
            duration_ms,
            structured = result.is_structured(),
            "Agent execution completed"
        );

        Ok(ExecutionResult {
            result,
            cost,
            duration_ms,
            model: self.model().to_string(),
            tokens_used: TokenUsage {
                input: usage.input_tokens,
                output: usage.output_tokens,
            },
        })
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
