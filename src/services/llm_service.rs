use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::models::user_settings::{Provider, UserSettings};

/// Ceiling for a single generation call; requests are never retried.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API request failed: {0}")]
    Transport(String),

    #[error("API returned status {0}")]
    BadStatus(u16),

    #[error("API returned status {0}: {1}")]
    BadStatusWithBody(u16, String),

    #[error("invalid API response: {0}")]
    Decode(String),
}

/// Dispatches one generation request to the configured backend and returns
/// the generated text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerateBackend: Send + Sync {
    async fn generate(
        &self,
        settings: &UserSettings,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, LlmError>;
}

/// HTTP client for the two supported backend shapes: a local inference
/// server's generate endpoint and an OpenAI-compatible chat completions
/// endpoint.
#[derive(Clone)]
pub struct LlmGateway {
    http: Client,
}

#[derive(Serialize)]
struct LocalGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct LocalGenerateResponse {
    response: String,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl LlmGateway {
    pub fn new() -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(LlmGateway { http })
    }

    async fn generate_local(
        &self,
        settings: &UserSettings,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, LlmError> {
        let url = local_endpoint(&settings.api_url);
        debug!("Dispatching generation request to {}", url);
        let request = LocalGenerateRequest {
            model: &settings.model,
            prompt: user_prompt,
            system: system_prompt,
            stream: false,
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::BadStatus(status.as_u16()));
        }

        let raw = response
            .text()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;
        parse_local_response(&raw)
    }

    async fn generate_chat(
        &self,
        settings: &UserSettings,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, LlmError> {
        let url = chat_endpoint(&settings.api_url);
        debug!("Dispatching generation request to {}", url);
        let request = ChatCompletionRequest {
            model: &settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: 0.7,
            max_tokens: 1000,
        };

        let mut builder = self.http.post(&url).json(&request);
        if !settings.api_key.is_empty() {
            builder = builder.bearer_auth(&settings.api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::BadStatusWithBody(status.as_u16(), body));
        }

        let raw = response
            .text()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;
        parse_chat_response(&raw)
    }
}

#[async_trait]
impl GenerateBackend for LlmGateway {
    async fn generate(
        &self,
        settings: &UserSettings,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, LlmError> {
        match settings.provider {
            Provider::Local => self.generate_local(settings, system_prompt, user_prompt).await,
            Provider::OpenaiCompatible => self.generate_chat(settings, system_prompt, user_prompt).await,
        }
    }
}

fn local_endpoint(api_url: &str) -> String {
    format!("{}/api/generate", api_url.trim_end_matches('/'))
}

fn chat_endpoint(api_url: &str) -> String {
    format!("{}/v1/chat/completions", api_url.trim_end_matches('/'))
}

fn parse_local_response(raw: &str) -> Result<String, LlmError> {
    let parsed: LocalGenerateResponse =
        serde_json::from_str(raw).map_err(|e| LlmError::Decode(e.to_string()))?;
    Ok(parsed.response)
}

fn parse_chat_response(raw: &str) -> Result<String, LlmError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(raw).map_err(|e| LlmError::Decode(e.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| LlmError::Decode("no choices in response".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_paths_strip_trailing_slashes() {
        assert_eq!(local_endpoint("http://localhost:11434"), "http://localhost:11434/api/generate");
        assert_eq!(local_endpoint("http://localhost:11434/"), "http://localhost:11434/api/generate");
        assert_eq!(
            chat_endpoint("https://api.openai.com//"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn local_response_field_is_extracted() {
        assert_eq!(parse_local_response(r#"{"response": "hello"}"#).unwrap(), "hello");
    }

    #[test]
    fn local_response_without_the_field_is_a_decode_error() {
        let err = parse_local_response(r#"{"done": true}"#).unwrap_err();
        assert!(matches!(err, LlmError::Decode(_)));

        let err = parse_local_response("not json at all").unwrap_err();
        assert!(matches!(err, LlmError::Decode(_)));
    }

    #[test]
    fn chat_response_content_is_extracted() {
        let raw = r#"{"choices": [{"message": {"content": "hi"}}]}"#;
        assert_eq!(parse_chat_response(raw).unwrap(), "hi");
    }

    #[test]
    fn chat_response_with_no_choices_is_a_decode_error() {
        let err = parse_chat_response(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, LlmError::Decode(_)));
    }

    #[test]
    fn failure_messages_carry_the_status_code_and_body() {
        assert!(LlmError::BadStatus(404).to_string().contains("404"));
        let message = LlmError::BadStatusWithBody(500, "model overloaded".to_string()).to_string();
        assert!(message.contains("500"));
        assert!(message.contains("model overloaded"));
    }
}
