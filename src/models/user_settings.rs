use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config;

/// Closed set of supported generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Local,
    OpenaiCompatible,
}

impl Provider {
    /// Write-path coercion: anything unrecognized falls back to the default.
    pub fn parse(value: &str) -> Self {
        match value {
            "openai_compatible" => Provider::OpenaiCompatible,
            _ => Provider::Local,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Local => "local",
            Provider::OpenaiCompatible => "openai_compatible",
        }
    }
}

/// Per-user generation settings. Read-only while a generation is in flight;
/// mutated only through the settings endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub provider: Provider,
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub system_prompt: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        UserSettings {
            provider: Provider::Local,
            api_url: config::DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: config::DEFAULT_MODEL.to_string(),
            system_prompt: config::DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl UserSettings {
    /// Apply a settings form submission. Only recognized fields present in
    /// the payload are updated; the provider value is coerced to the
    /// supported set.
    pub fn apply(&mut self, form: &Value) {
        if let Some(value) = form.get("provider").and_then(Value::as_str) {
            self.provider = Provider::parse(value);
        }
        if let Some(value) = form.get("api_url").and_then(Value::as_str) {
            self.api_url = value.to_string();
        }
        if let Some(value) = form.get("api_key").and_then(Value::as_str) {
            self.api_key = value.to_string();
        }
        if let Some(value) = form.get("model").and_then(Value::as_str) {
            self.model = value.to_string();
        }
        if let Some(value) = form.get("system_prompt").and_then(Value::as_str) {
            self.system_prompt = value.to_string();
        }
    }
}
