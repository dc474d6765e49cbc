//! Portfolio Advisor
//!
//! One submission end to end: validate, build the universe, request an
//! allocation, normalize it, request an explanation. The two model calls run
//! sequentially because the second prompt depends on the normalized rows.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use llm_core::{GenerationOptions, LlmProvider};
use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;
use crate::model::{AllocationRow, UserProfile};
use crate::strategy::AllocationNormalizer;
use crate::svckit::{ExplanationRequester, RecommendationRequester};
use crate::universe::AssetUniverse;
use crate::validation::{RawForm, validate};

/// Immutable settings built once at start-up
#[derive(Clone, Debug, Default)]
pub struct AdvisorSettings {
    /// Options for both model calls
    pub generation: GenerationOptions,
    pub normalizer: AllocationNormalizer,
}

/// Explanation outcome; never discards the allocation
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Explanation {
    Available { text: String },
    Unavailable { reason: String },
}

impl Explanation {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Available { text } => Some(text),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Terminal artifact of a submission
#[derive(Clone, Debug, Serialize)]
pub struct Recommendation {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub profile: UserProfile,
    pub universe: AssetUniverse,
    /// Display order, percents summing to 100 unless empty
    pub rows: Vec<AllocationRow>,
    pub explanation: Explanation,
}

/// Runs the submission pipeline
pub struct PortfolioAdvisor {
    recommendation: RecommendationRequester,
    explanation: ExplanationRequester,
    normalizer: AllocationNormalizer,
}

impl PortfolioAdvisor {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: AdvisorSettings) -> Self {
        Self {
            recommendation: RecommendationRequester::new(
                provider.clone(),
                settings.generation.clone(),
            ),
            explanation: ExplanationRequester::new(provider, settings.generation),
            normalizer: settings.normalizer,
        }
    }

    /// Validation, parse and transport failures of the first call end the
    /// submission; explanation failures are carried in the result.
    pub async fn advise(&self, form: &RawForm) -> Result<Recommendation> {
        let profile = validate(form).inspect_err(|e| {
            tracing::debug!(code = e.code(), "Form rejected");
        })?;

        let universe = AssetUniverse::for_risk(profile.risk());
        let raw = self.recommendation.request(&profile, &universe).await?;
        let mut rows = self.normalizer.normalize(&raw, profile.amount());

        if rows.is_empty() {
            tracing::warn!(classes = raw.len(), "Model allocation produced no usable rows");
        }

        let explanation = match self.explanation.request(&profile, &rows).await {
            Ok(text) => Explanation::Available { text },
            Err(e) => {
                tracing::warn!("Explanation unavailable: {}", e);
                Explanation::Unavailable {
                    reason: e.user_message(),
                }
            }
        };

        // The prompt lists assets in allocation order; the result is for display
        AllocationNormalizer::sort_for_display(&mut rows);

        Ok(Recommendation {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            profile,
            universe,
            rows,
            explanation,
        })
    }
}
