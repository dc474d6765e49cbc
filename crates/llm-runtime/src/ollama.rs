//! Ollama LLM Provider
//!
//! Implementation of `LlmProvider` for local Ollama inference.

use async_trait::async_trait;
use llm_core::{
    error::{LlmError, Result},
    message::{Message, Role},
    provider::{
        Completion, FinishReason, GenerationOptions, LlmProvider, ModelInfo, TokenUsage,
    },
};
use ollama_rs::{
    Ollama,
    generation::{
        chat::{ChatMessage, ChatMessageResponse, MessageRole, request::ChatMessageRequest},
        options::GenerationOptions as OllamaOptions,
    },
};

/// Ollama provider configuration
#[derive(Clone, Debug)]
pub struct OllamaConfig {
    /// Ollama host URL
    pub host: String,

    /// Ollama port
    pub port: u16,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost".into(),
            port: 11434,
        }
    }
}

/// Ollama LLM provider
pub struct OllamaProvider {
    client: Ollama,
}

impl OllamaProvider {
    /// Create from configuration
    pub fn from_config(config: &OllamaConfig) -> Self {
        Self {
            client: Ollama::new(&config.host, config.port),
        }
    }

    /// Create with default localhost settings
    pub fn localhost() -> Self {
        Self::from_config(&OllamaConfig::default())
    }

    /// Convert messages to Ollama format
    fn convert_messages(messages: &[Message]) -> Vec<ChatMessage> {
        messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::System => MessageRole::System,
                    Role::User => MessageRole::User,
                    Role::Assistant => MessageRole::Assistant,
                };
                ChatMessage::new(role, m.content.clone())
            })
            .collect()
    }

    /// Convert Ollama response to completion
    fn convert_completion(response: ChatMessageResponse, model: &str) -> Completion {
        Completion {
            content: response.message.content,
            model: model.to_string(),
            usage: response.final_data.as_ref().map(|d| {
                let prompt = u32::try_from(d.prompt_eval_count.unwrap_or(0)).unwrap_or(u32::MAX);
                let completion = u32::try_from(d.eval_count.unwrap_or(0)).unwrap_or(u32::MAX);
                TokenUsage {
                    prompt_tokens: prompt,
                    completion_tokens: completion,
                    total_tokens: prompt.saturating_add(completion),
                }
            }),
            finish_reason: Some(FinishReason::Stop),
        }
    }

    /// Build Ollama generation options
    fn build_options(opts: &GenerationOptions) -> OllamaOptions {
        let mut options = OllamaOptions::default().temperature(opts.temperature);
        if let Some(top_p) = opts.top_p {
            options = options.top_p(top_p);
        }
        if let Some(max_tokens) = opts.max_tokens {
            options = options.num_predict(i32::try_from(max_tokens).unwrap_or(i32::MAX));
        }
        options
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "Ollama"
    }

    async fn health_check(&self) -> Result<bool> {
        match self.client.list_local_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Ollama health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = ChatMessageRequest::new(options.model.clone(), Self::convert_messages(messages))
            .options(Self::build_options(options));

        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| LlmError::Provider(e.to_string()))?;

        Ok(Self::convert_completion(response, &options.model))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let models = self
            .client
            .list_local_models()
            .await
            .map_err(|e| LlmError::ProviderUnavailable(e.to_string()))?;

        Ok(models
            .into_iter()
            .map(|m| ModelInfo {
                id: m.name.clone(),
                name: m.name,
            })
            .collect())
    }
}
