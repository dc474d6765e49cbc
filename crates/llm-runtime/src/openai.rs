//! OpenAI-compatible LLM Provider
//!
//! Implementation of `LlmProvider` for any endpoint speaking the
//! `/chat/completions` protocol (OpenAI, Azure proxies, vLLM, LM Studio).

use std::time::Duration;

use async_trait::async_trait;
use llm_core::{
    error::{LlmError, Result},
    message::Message,
    provider::{
        Completion, FinishReason, GenerationOptions, LlmProvider, ModelInfo, TokenUsage,
    },
};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// OpenAI provider configuration
#[derive(Clone)]
pub struct OpenAiConfig {
    /// API root, e.g. `https://api.openai.com/v1`
    pub base_url: String,

    /// Bearer credential
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl OpenAiConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            timeout_secs: 120,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// OpenAI-compatible chat completion provider
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

impl OpenAiProvider {
    /// Create from configuration
    pub fn from_config(config: OpenAiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::Config("OpenAI API key is empty".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Convert messages to wire format
    fn convert_messages(messages: &[Message]) -> Vec<ChatMessage<'_>> {
        messages
            .iter()
            .map(|m| ChatMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
            .collect()
    }

    /// Convert wire response to completion
    fn convert_completion(response: ChatResponse, requested_model: &str) -> Result<Completion> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Parse("response contained no choices".into()))?;

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            model: response.model.unwrap_or_else(|| requested_model.to_string()),
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason.as_deref().map(FinishReason::parse),
        })
    }
}

/// Classify an unsuccessful HTTP status
fn status_error(status: StatusCode, body: &str) -> LlmError {
    let detail = format!("{status}: {}", body.chars().take(300).collect::<String>());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Auth(detail),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited(detail),
        s if s.is_server_error() => LlmError::ProviderUnavailable(detail),
        _ => LlmError::Provider(detail),
    }
}

/// Classify a transport failure
fn transport_error(err: &reqwest::Error) -> LlmError {
    if err.is_timeout() || err.is_connect() {
        LlmError::ProviderUnavailable(err.to_string())
    } else {
        LlmError::Provider(err.to_string())
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn health_check(&self) -> Result<bool> {
        match self.list_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("OpenAI health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = ChatRequest {
            model: &options.model,
            messages: Self::convert_messages(messages),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
        };

        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let completion = Self::convert_completion(body, &options.model)?;
        tracing::debug!(
            model = %completion.model,
            chars = completion.content.len(),
            "OpenAI completion received"
        );
        Ok(completion)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let response = self
            .client
            .get(self.endpoint("models"))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let list: ModelList = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        Ok(list
            .data
            .into_iter()
            .map(|m| ModelInfo {
                name: m.id.clone(),
                id: m.id,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = OpenAiConfig::new("sk-test");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.timeout_secs, 120);
        assert!(!format!("{config:?}").contains("sk-test"));
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = OpenAiProvider::from_config(OpenAiConfig::new("  "));
        assert!(matches!(result, Err(LlmError::Config(_))));
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let provider = OpenAiProvider::from_config(
            OpenAiConfig::new("sk-test").with_base_url("http://localhost:8080/v1/"),
        )
        .unwrap();
        assert_eq!(
            provider.endpoint("chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_serialization() {
        let messages = vec![Message::system("Odpowiadaj JSON-em."), Message::user("Hej")];
        let request = ChatRequest {
            model: "gpt-3.5-turbo",
            messages: OpenAiProvider::convert_messages(&messages),
            temperature: 0.7,
            max_tokens: None,
            top_p: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "Hej");
        assert!(value.get("max_tokens").is_none());
    }

    #[test]
    fn test_response_conversion() {
        let raw = r#"{
            "model": "gpt-3.5-turbo-0125",
            "choices": [{"message": {"role": "assistant", "content": "{\"BTC\": 10}"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        let completion = OpenAiProvider::convert_completion(response, "gpt-3.5-turbo").unwrap();
        assert_eq!(completion.content, "{\"BTC\": 10}");
        assert_eq!(completion.model, "gpt-3.5-turbo-0125");
        assert_eq!(completion.usage.unwrap().total_tokens, 15);
        assert_eq!(completion.finish_reason, Some(FinishReason::Stop));
    }

    #[test]
    fn test_response_without_choices_is_parse_error() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let result = OpenAiProvider::convert_completion(response, "gpt-3.5-turbo");
        assert!(matches!(result, Err(LlmError::Parse(_))));
    }

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "bad key"),
            LlmError::Auth(_)
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, ""),
            LlmError::RateLimited(_)
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, ""),
            LlmError::ProviderUnavailable(_)
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, "unknown model"),
            LlmError::Provider(_)
        ));
    }
}
