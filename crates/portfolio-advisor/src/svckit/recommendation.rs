//! Recommendation Requester
//!
//! Asks the model for an allocation over the asset universe and decodes the
//! JSON reply into a [`RawAllocation`].

use std::sync::Arc;

use llm_core::{GenerationOptions, LlmProvider, Message};
use serde_json::Value;

use crate::error::{AdvisorError, Result};
use crate::model::{RawAllocation, UserProfile};
use crate::universe::{AssetUniverse, BASKET_CATEGORIES, FLAT_ASSETS};
use crate::RECOMMENDATION_SYSTEM_PROMPT;

/// Outcome of decoding the model's reply
#[derive(Debug, PartialEq)]
pub enum ParsedReply {
    ParsedOk(RawAllocation),
    ParseFailed { reason: String },
}

/// Build the allocation prompt
pub fn recommendation_prompt(profile: &UserProfile, universe: &AssetUniverse) -> String {
    let schema = FLAT_ASSETS
        .iter()
        .map(|asset| (*asset).to_string())
        .chain(
            BASKET_CATEGORIES
                .iter()
                .map(|basket| format!("{basket}: {{percent, examples}}")),
        )
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Jesteś profesjonalnym ekspertem i doradcą finansowym. \
         Użytkownik: wiek {age}, cel {goal}, kwota {amount} PLN, ryzyko {risk}. \
         Zaproponuj maksymalnie 8 aktywów z procentami (wielokrotności 5%) dla: {assets}. \
         MUSISZ zaproponować co najmniej 2 aktywa do stworzenia portfolio. Nie uciekaj od odpowiedzi. \
         Odpowiedz wyłącznie JSON-em w strukturze: {{ {schema} }}.",
        age = profile.age(),
        goal = profile.goal(),
        amount = profile.amount().normalize(),
        risk = profile.risk(),
        assets = universe.joined(),
    )
}

/// Decode a reply; a single Markdown code fence around the JSON is tolerated
pub fn parse_reply(content: &str) -> ParsedReply {
    let body = strip_code_fence(content.trim());

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => ParsedReply::ParsedOk(RawAllocation::from_map(map)),
        Ok(other) => ParsedReply::ParseFailed {
            reason: format!("expected a JSON object, got {}", json_kind(&other)),
        },
        Err(e) => ParsedReply::ParseFailed {
            reason: e.to_string(),
        },
    }
}

fn strip_code_fence(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("```") else {
        return content;
    };
    // Skip the info string (```json)
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Sends the allocation prompt and decodes the reply
pub struct RecommendationRequester {
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
}

impl RecommendationRequester {
    pub fn new(provider: Arc<dyn LlmProvider>, options: GenerationOptions) -> Self {
        Self { provider, options }
    }

    /// One completion, no retry
    pub async fn request(
        &self,
        profile: &UserProfile,
        universe: &AssetUniverse,
    ) -> Result<RawAllocation> {
        let prompt = recommendation_prompt(profile, universe);
        tracing::trace!(%prompt, "Recommendation prompt");

        let messages = [
            Message::system(RECOMMENDATION_SYSTEM_PROMPT),
            Message::user(prompt),
        ];
        let completion = self.provider.complete(&messages, &self.options).await?;

        match parse_reply(&completion.content) {
            ParsedReply::ParsedOk(raw) => {
                tracing::info!(classes = raw.len(), model = %completion.model, "Allocation received");
                Ok(raw)
            }
            ParsedReply::ParseFailed { reason } => {
                tracing::warn!(%reason, "Model reply is not a JSON allocation");
                Err(AdvisorError::ModelResponseUnparsable(reason))
            }
        }
    }
}
