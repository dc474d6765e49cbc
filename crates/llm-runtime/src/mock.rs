//! Scripted LLM Provider
//!
//! For testing and offline demos. Replays queued replies in order and
//! records every request it receives.

use std::collections::VecDeque;

use async_trait::async_trait;
use llm_core::{
    error::{LlmError, Result},
    message::Message,
    provider::{Completion, GenerationOptions, LlmProvider, ModelInfo},
};
use tokio::sync::Mutex;

/// One queued reply
#[derive(Debug)]
pub enum ScriptedReply {
    /// Return this text as the completion content
    Text(String),
    /// Fail the call with this error
    Error(LlmError),
}

/// A request captured by the provider
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub messages: Vec<Message>,
    pub options: GenerationOptions,
}

/// Builds a reply from the request once the queue runs dry
pub type Responder = Box<dyn Fn(&[Message]) -> String + Send + Sync>;

/// Provider returning pre-scripted replies
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<RecordedRequest>>,
    /// `None` means fail once the queue is empty
    fallback: Option<Responder>,
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            fallback: None,
        }
    }

    /// Queue replies in the given order
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let queue = replies
            .into_iter()
            .map(|r| ScriptedReply::Text(r.into()))
            .collect();
        Self {
            replies: Mutex::new(queue),
            ..Self::new()
        }
    }

    /// Reply used whenever the queue is empty
    pub fn with_fallback(mut self, responder: Responder) -> Self {
        self.fallback = Some(responder);
        self
    }

    /// Offline demo: a fixed allocation for prompts asking for JSON,
    /// a fixed justification for everything else
    pub fn demo() -> Self {
        Self::new().with_fallback(Box::new(|messages: &[Message]| {
            let wants_json = messages.iter().any(|m| m.content.contains("JSON"));
            if wants_json {
                DEMO_ALLOCATION.to_string()
            } else {
                DEMO_EXPLANATION.to_string()
            }
        }))
    }

    pub async fn push_error(&self, error: LlmError) {
        self.replies
            .lock()
            .await
            .push_back(ScriptedReply::Error(error));
    }

    /// Snapshot of all requests received so far
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }
}

const DEMO_ALLOCATION: &str = r#"{"Złoto": 20, "Obligacje skarbowe": {"percent": 40, "examples": ["EDO", "COI"]}, "ETF-y": {"percent": 40, "examples": ["VWCE", "IWDA"]}}"#;

const DEMO_EXPLANATION: &str = "Portfel demonstracyjny: połowa w obligacjach skarbowych \
chroniących kapitał, szeroki rynek akcji przez ETF-y i złoto jako zabezpieczenie.";

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        self.requests.lock().await.push(RecordedRequest {
            messages: messages.to_vec(),
            options: options.clone(),
        });

        let next = self.replies.lock().await.pop_front();
        match next {
            Some(ScriptedReply::Text(text)) => Ok(Completion::text(text, &options.model)),
            Some(ScriptedReply::Error(err)) => Err(err),
            None => self.fallback.as_ref().map_or_else(
                || Err(LlmError::ProviderUnavailable("no scripted reply left".into())),
                |responder| Ok(Completion::text(responder(messages), &options.model)),
            ),
        }
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        Ok(vec![ModelInfo {
            id: "scripted".into(),
            name: "scripted".into(),
        }])
    }
}
