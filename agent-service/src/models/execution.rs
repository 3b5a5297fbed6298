//! Result of a single agent execution.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What the agent produced: either a JSON object or the raw model text.
///
/// Serialized untagged on the wire, so a structured result is the object
/// itself and a text result is `{"text": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgentResult {
    Text(TextResult),
    Structured(Map<String, Value>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextResult {
    pub text: String,
}

impl AgentResult {
    pub fn text(text: impl Into<String>) -> Self {
        AgentResult::Text(TextResult { text: text.into() })
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, AgentResult::Structured(_))
    }
}

/// Token counts reported by the upstream API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input: u32,
    pub output: u32,
}

/// Normalized outcome of one successful agent run.
///
/// `result` is stored tagged (`{"kind": "text" | "structured", "value": ...}`)
/// because the untagged form cannot tell a text result from an object that
/// only holds a `text` string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    #[serde(with = "tagged_result")]
    pub result: AgentResult,
    /// USD, truncated to 4 decimal places.
    pub cost: f64,
    /// Wall-clock time of the upstream call.
    pub duration_ms: u64,
    pub model: String,
    pub tokens_used: TokenUsage,
}

mod tagged_result {
    use super::AgentResult;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::{Map, Value};

    #[derive(Serialize)]
    #[serde(tag = "kind", content = "value", rename_all = "lowercase")]
    enum Borrowed<'a> {
        Text(&'a str),
        Structured(&'a Map<String, Value>),
    }

    #[derive(Deserialize)]
    #[serde(tag = "kind", content = "value", rename_all = "lowercase")]
    enum Owned {
        Text(String),
        Structured(Map<String, Value>),
    }

    pub fn serialize<S: Serializer>(result: &AgentResult, serializer: S) -> Result<S::Ok, S::Error> {
        match result {
            AgentResult::Text(text) => Borrowed::Text(&text.text),
            AgentResult::Structured(object) => Borrowed::Structured(object),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AgentResult, D::Error> {
        Ok(match Owned::deserialize(deserializer)? {
            Owned::Text(text) => AgentResult::text(text),
            Owned::Structured(object) => AgentResult::Structured(object),
        })
    }
}
