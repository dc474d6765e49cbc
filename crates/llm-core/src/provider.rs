//! LLM Provider Strategy Pattern
//!
//! Defines a common interface for chat completion backends (OpenAI-compatible
//! endpoints, Ollama, test doubles) so callers work with any of them
//! without code changes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use llm_core::{GenerationOptions, LlmProvider, Message};
//!
//! let provider = OpenAiProvider::from_config(config)?;
//! let messages = [Message::system("..."), Message::user("...")];
//! let completion = provider.complete(&messages, &GenerationOptions::default()).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Message;

/// Configuration for LLM generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "gpt-3.5-turbo", "llama3.2")
    pub model: String,

    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate; provider default when unset
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Top-p nucleus sampling; provider default when unset
    #[serde(default)]
    pub top_p: Option<f32>,
}

const fn default_temperature() -> f32 {
    0.7
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".into(),
            temperature: default_temperature(),
            max_tokens: None,
            top_p: None,
        }
    }
}

impl GenerationOptions {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Response from an LLM completion
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Completion {
    /// The generated text
    pub content: String,

    /// Model that generated this response
    pub model: String,

    /// Token usage statistics (if available)
    pub usage: Option<TokenUsage>,

    /// Finish reason
    pub finish_reason: Option<FinishReason>,
}

impl Completion {
    /// Plain text completion without usage data
    pub fn text(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
            usage: None,
            finish_reason: Some(FinishReason::Stop),
        }
    }

    /// Whether the model stopped because it ran out of tokens
    pub fn truncated(&self) -> bool {
        self.finish_reason == Some(FinishReason::Length)
    }
}

/// Token usage statistics
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Reason for completion finishing
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Other,
}

impl FinishReason {
    /// Map a provider's finish reason string
    pub fn parse(raw: &str) -> Self {
        match raw {
            "stop" => Self::Stop,
            "length" => Self::Length,
            "content_filter" => Self::ContentFilter,
            _ => Self::Other,
        }
    }
}

/// Information about a model
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
}

/// Strategy trait for LLM providers
///
/// Implement this trait to add support for new LLM backends.
/// Domain code works exclusively through this interface.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider name used in logs and health output
    fn name(&self) -> &str;

    /// Check if the provider is available and configured correctly
    async fn health_check(&self) -> Result<bool>;

    /// Generate a completion from messages
    async fn complete(&self, messages: &[Message], options: &GenerationOptions)
    -> Result<Completion>;

    /// List available models
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoProvider;

    #[async_trait]
    impl LlmProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            messages: &[Message],
            options: &GenerationOptions,
        ) -> Result<Completion> {
            let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
            Ok(Completion::text(last, &options.model))
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>> {
            Ok(vec![ModelInfo {
                id: "echo-1".into(),
                name: "echo-1".into(),
            }])
        }
    }

    #[test]
    fn test_generation_options_defaults() {
        let opts = GenerationOptions::default();
        assert!((opts.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(opts.model, "gpt-3.5-turbo");
        assert!(opts.max_tokens.is_none());
    }

    #[test]
    fn test_finish_reason_parse() {
        assert_eq!(FinishReason::parse("stop"), FinishReason::Stop);
        assert_eq!(FinishReason::parse("length"), FinishReason::Length);
        assert_eq!(FinishReason::parse("tool_calls"), FinishReason::Other);
    }

    #[tokio::test]
    async fn test_provider_through_trait_object() {
        let provider: Box<dyn LlmProvider> = Box::new(EchoProvider);
        assert_eq!(provider.name(), "echo");
        assert_eq!(provider.list_models().await.unwrap().len(), 1);

        let completion = provider
            .complete(&[Message::user("ping")], &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(completion.content, "ping");
        assert!(!completion.truncated());
    }
}
