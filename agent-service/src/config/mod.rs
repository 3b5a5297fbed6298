use crate::models::Pricing;
use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

/// Port used when neither `PORT` nor `APP__PORT` is set.
pub const DEFAULT_PORT: u16 = 8002;

const DEFAULT_API_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
const DEFAULT_MAX_TOKENS: u32 = 4000;
const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// USD per million input tokens.
const DEFAULT_INPUT_PRICE: f64 = 3.0;
/// USD per million output tokens.
const DEFAULT_OUTPUT_PRICE: f64 = 15.0;

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub common: core_config::Config,
    pub anthropic: AnthropicConfig,
    pub pricing: Pricing,
}

#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub api_key: Secret<String>,
    /// Base URL without the `/v1/messages` suffix.
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl AgentConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load(DEFAULT_PORT)?;
        Self::from_lookup(common, |key| env::var(key).ok())
    }

    /// Build the agent settings from an arbitrary key lookup.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("ANTHROPIC_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!(
                    "ANTHROPIC_API_KEY environment variable is required"
                ))
            })?;

        let pricing = Pricing {
            input_per_million: parse_env(&lookup, "PRICE_INPUT_PER_MTOK", DEFAULT_INPUT_PRICE)?,
            output_per_million: parse_env(&lookup, "PRICE_OUTPUT_PER_MTOK", DEFAULT_OUTPUT_PRICE)?,
        };
        if !pricing.is_valid() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "token prices must be finite and non-negative, got {:?}",
                pricing
            )));
        }

        Ok(AgentConfig {
            common,
            anthropic: AnthropicConfig {
                api_key: Secret::new(api_key),
                api_url: lookup("ANTHROPIC_API_URL")
                    .unwrap_or_else(|| DEFAULT_API_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                model: lookup("ANTHROPIC_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                max_tokens: parse_env(&lookup, "ANTHROPIC_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
                timeout_secs: parse_env(&lookup, "ANTHROPIC_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            },
            pricing,
        })
    }
}

fn parse_env<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
        }),
        None => Ok(default),
    }
}
