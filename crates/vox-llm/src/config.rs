//! Provider configuration for the Responses API client.
//!
//! Values are read once from the environment by the hosting binary and then
//! handed to the client and the pack generator as a plain value.
//!
//! Environment variables:
//! - `OPENAI_ENABLED`: master switch for the AI path (default: true)
//! - `OPENAI_API_KEY`: bearer credential (default: unset, AI path disabled)
//! - `OPENAI_BASE_URL`: provider base URL (default: https://api.openai.com)
//! - `OPENAI_MODEL`: model identifier (default: gpt-5)
//! - `OPENAI_TIMEOUT_SECONDS`: whole-request timeout (default: 30)
//! - `OPENAI_MAX_OUTPUT_TOKENS`: output token cap (default: 1200)
//! - `OPENAI_REASONING_EFFORT`: effort for reasoning models (default: medium)
//! - `OPENAI_TEMPERATURE`: sampling temperature for non-reasoning models (default: unset)

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-5";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1200;
pub const DEFAULT_REASONING_EFFORT: &str = "medium";

/// Model identifiers with this prefix take `reasoning.effort` and reject `temperature`.
const REASONING_MODEL_PREFIX: &str = "gpt-5";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub enabled: bool,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
    pub max_output_tokens: u32,
    pub reasoning_effort: String,
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            reasoning_effort: DEFAULT_REASONING_EFFORT.to_string(),
            temperature: None,
        }
    }
}

fn parse_bool_env(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

impl OpenAIConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unparseable numbers keep their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(enabled) = lookup("OPENAI_ENABLED") {
            config.enabled = parse_bool_env(&enabled);
        }
        config.api_key = lookup("OPENAI_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        if let Some(base_url) = lookup("OPENAI_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url.trim().to_string();
        }
        if let Some(model) = lookup("OPENAI_MODEL").filter(|v| !v.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        if let Some(timeout) = lookup("OPENAI_TIMEOUT_SECONDS").and_then(|v| v.trim().parse().ok()) {
            config.timeout_seconds = timeout;
        }
        if let Some(max_tokens) = lookup("OPENAI_MAX_OUTPUT_TOKENS").and_then(|v| v.trim().parse().ok()) {
            config.max_output_tokens = max_tokens;
        }
        if let Some(effort) = lookup("OPENAI_REASONING_EFFORT").filter(|v| !v.trim().is_empty()) {
            config.reasoning_effort = effort.trim().to_string();
        }
        config.temperature = lookup("OPENAI_TEMPERATURE").and_then(|v| v.trim().parse().ok());

        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// The credential, if one is configured and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// True when the AI path may be attempted at all.
    pub fn ai_available(&self) -> bool {
        self.enabled && self.api_key().is_some()
    }

    pub fn is_reasoning_model(&self) -> bool {
        self.model.starts_with(REASONING_MODEL_PREFIX)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// `{base_url}/v1/responses` with any trailing slash on the base trimmed.
    pub fn responses_url(&self) -> String {
        format!("{}/v1/responses", self.base_url.trim_end_matches('/'))
    }
}
