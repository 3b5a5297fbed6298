//! Wire types for the HTTP surface.

use crate::models::{profile, AgentResult, ExecutionResult, TokenUsage};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /execute`. Missing fields take their empty value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    #[serde(default)]
    pub input: AgentInput,
    #[serde(default)]
    pub metadata: RequestMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentInput {
    #[serde(default)]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMetadata {
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub user_id: String,
    /// Caller's budget in milliseconds. Accepted but not enforced.
    #[serde(default)]
    pub timeout: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    pub cost: f64,
    /// Milliseconds.
    pub duration: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<TokenUsage>,
}

/// Body returned by `POST /execute`; exactly one of `result` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteResponse {
    pub result: Option<AgentResult>,
    pub metadata: ResultMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecuteResponse {
    pub fn success(execution: ExecutionResult) -> Self {
        Self {
            result: Some(execution.result),
            metadata: ResultMetadata {
                cost: execution.cost,
                duration: execution.duration_ms,
                model: Some(execution.model),
                tokens_used: Some(execution.tokens_used),
            },
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            result: None,
            metadata: ResultMetadata {
                cost: 0.0,
                duration: 0,
                model: None,
                tokens_used: None,
            },
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub status: String,
}

impl RootResponse {
    pub fn running() -> Self {
        Self {
            name: profile::SERVICE_NAME.to_string(),
            version: profile::SERVICE_VERSION.to_string(),
            status: "running".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Unix seconds.
    pub timestamp: i64,
}

impl HealthResponse {
    pub fn healthy(timestamp: i64) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingEstimate {
    pub estimated_cost: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub capabilities: Vec<String>,
    pub pricing: PricingEstimate,
}

impl InfoResponse {
    pub fn current() -> Self {
        Self {
            id: profile::AGENT_ID.to_string(),
            name: profile::AGENT_NAME.to_string(),
            description: profile::AGENT_DESCRIPTION.to_string(),
            version: profile::SERVICE_VERSION.to_string(),
            capabilities: profile::AGENT_CAPABILITIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            pricing: PricingEstimate {
                estimated_cost: profile::ESTIMATED_COST,
                currency: profile::CURRENCY.to_string(),
            },
        }
    }
}
