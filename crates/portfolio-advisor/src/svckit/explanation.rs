//! Explanation Requester
//!
//! Asks the model to justify the finalized allocation in prose.

use std::sync::Arc;

use llm_core::{GenerationOptions, LlmProvider, Message};

use crate::error::{AdvisorError, Result};
use crate::model::{AllocationRow, UserProfile};
use crate::EXPLANATION_SYSTEM_PROMPT;

/// Build the justification prompt from the final rows
pub fn explanation_prompt(profile: &UserProfile, rows: &[AllocationRow]) -> String {
    let assets = rows
        .iter()
        .map(|r| r.asset.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Dlaczego wybrałeś następujące aktywa: {assets} \
         dla użytkownika w wieku {age}, cel {goal}, kwota {amount} PLN, ryzyko {risk}? \
         Uzasadnij swoją rekomendację w max 200-260 słowach.",
        age = profile.age(),
        goal = profile.goal(),
        amount = profile.amount().normalize(),
        risk = profile.risk(),
    )
}

/// Sends the justification prompt
pub struct ExplanationRequester {
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
}

impl ExplanationRequester {
    pub fn new(provider: Arc<dyn LlmProvider>, options: GenerationOptions) -> Self {
        Self { provider, options }
    }

    /// Any failure here is `ExplanationUnavailable`; the caller keeps the rows
    pub async fn request(&self, profile: &UserProfile, rows: &[AllocationRow]) -> Result<String> {
        if rows.is_empty() {
            return Err(AdvisorError::ExplanationUnavailable(
                "allocation is empty".into(),
            ));
        }

        let prompt = explanation_prompt(profile, rows);
        tracing::trace!(%prompt, "Explanation prompt");

        let messages = [
            Message::system(EXPLANATION_SYSTEM_PROMPT),
            Message::user(prompt),
        ];
        let completion = self
            .provider
            .complete(&messages, &self.options)
            .await
            .map_err(|e| AdvisorError::ExplanationUnavailable(e.to_string()))?;

        let text = completion.content.trim();
        if text.is_empty() {
            return Err(AdvisorError::ExplanationUnavailable(
                "model returned an empty explanation".into(),
            ));
        }
        if completion.truncated() {
            tracing::warn!("Explanation was cut off by the token limit");
        }

        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{RawForm, validate};
    use llm_core::LlmError;
    use llm_runtime::ScriptedProvider;
    use rust_decimal_macros::dec;

    fn profile() -> UserProfile {
        validate(&RawForm::new("52", "Emerytura", "2500,50", "niskie")).unwrap()
    }

    fn rows() -> Vec<AllocationRow> {
        vec![
            AllocationRow::new("EDO", 60, dec!(2500.50)),
            AllocationRow::new("Złoto", 40, dec!(2500.50)),
        ]
    }

    #[test]
    fn test_prompt_lists_rows_in_order() {
        let prompt = explanation_prompt(&profile(), &rows());
        assert!(prompt.starts_with("Dlaczego wybrałeś następujące aktywa: EDO, Złoto dla"));
        assert!(prompt.contains("w wieku 52"));
        assert!(prompt.contains("kwota 2500.5 PLN"));
        assert!(prompt.contains("200-260"));
    }

    #[tokio::test]
    async fn test_reply_is_trimmed() {
        let provider = Arc::new(ScriptedProvider::with_replies(["  Ponieważ tak.\n"]));
        let requester = ExplanationRequester::new(provider.clone(), GenerationOptions::default());

        let text = requester.request(&profile(), &rows()).await.unwrap();
        assert_eq!(text, "Ponieważ tak.");

        let requests = provider.requests().await;
        assert_eq!(requests[0].messages[0].content, EXPLANATION_SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn test_failures_map_to_unavailable() {
        let provider = Arc::new(ScriptedProvider::with_replies(["   "]));
        provider
            .push_error(LlmError::ProviderUnavailable("timeout".into()))
            .await;
        let requester = ExplanationRequester::new(provider.clone(), GenerationOptions::default());

        let empty = requester.request(&profile(), &rows()).await;
        assert!(matches!(empty, Err(AdvisorError::ExplanationUnavailable(_))));

        let transport = requester.request(&profile(), &rows()).await;
        assert!(matches!(transport, Err(AdvisorError::ExplanationUnavailable(_))));

        let no_rows = requester.request(&profile(), &[]).await;
        assert!(matches!(no_rows, Err(AdvisorError::ExplanationUnavailable(_))));
        assert_eq!(provider.requests().await.len(), 2);
    }
}
