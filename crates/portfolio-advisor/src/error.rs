//! Error Types for Portfolio Advisor

use llm_core::LlmError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdvisorError>;

/// Rejected form input. Display text is the message shown to the user.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Podaj swój wiek.")]
    MissingAge,

    #[error("Jesteś osobą niepełnoletnią.")]
    Underage,

    #[error("Wybierz cel inwestycji.")]
    GoalNotSelected,

    #[error("Podaj kwotę oszczędności w PLN.")]
    MissingAmount,

    #[error("Kwota musi być liczbą większą od 0 (np. 10000).")]
    InvalidAmount,

    #[error("Wybierz poziom ryzyka.")]
    RiskNotSelected,
}

impl ValidationError {
    /// Stable machine-readable code
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingAge => "MISSING_AGE",
            Self::Underage => "UNDERAGE",
            Self::GoalNotSelected => "GOAL_NOT_SELECTED",
            Self::MissingAmount => "MISSING_AMOUNT",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::RiskNotSelected => "RISK_NOT_SELECTED",
        }
    }
}

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Model response is not a JSON object: {0}")]
    ModelResponseUnparsable(String),

    #[error("Explanation unavailable: {0}")]
    ExplanationUnavailable(String),

    #[error("Provider error: {0}")]
    Provider(#[from] LlmError),
}

impl AdvisorError {
    /// Stable machine-readable code
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(v) => v.code(),
            Self::ModelResponseUnparsable(_) => "MODEL_RESPONSE_UNPARSABLE",
            Self::ExplanationUnavailable(_) => "EXPLANATION_UNAVAILABLE",
            Self::Provider(e) if e.is_retryable() => "PROVIDER_UNAVAILABLE",
            Self::Provider(_) => "PROVIDER_ERROR",
        }
    }

    /// Message shown to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(v) => v.to_string(),
            Self::ModelResponseUnparsable(_) => "Nie udało się sparsować JSON z API.".into(),
            Self::ExplanationUnavailable(_) => {
                "Nie udało się wygenerować uzasadnienia rekomendacji.".into()
            }
            Self::Provider(e) if e.is_retryable() => {
                "Usługa AI jest chwilowo niedostępna. Spróbuj ponownie.".into()
            }
            Self::Provider(_) => "Usługa AI zwróciła błąd.".into(),
        }
    }
}
