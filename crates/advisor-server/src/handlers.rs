//! HTTP Handlers

use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
};
use portfolio_advisor::{
    AdvisorError, AllocationRow, DISCLAIMER, Explanation, Goal, RawForm, Recommendation,
    RiskTier,
};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub provider_available: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct RiskOption {
    pub value: RiskTier,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FormOptionsResponse {
    pub goal_placeholder: &'static str,
    pub goals: Vec<&'static str>,
    pub risk_placeholder: &'static str,
    pub risks: Vec<RiskOption>,
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub age: u32,
    pub goal: &'static str,
    pub amount: Decimal,
    pub risk: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RowView {
    pub asset: String,
    pub percent: i64,
    pub percent_label: String,
    pub amount: Decimal,
    pub amount_label: String,
}

impl From<&AllocationRow> for RowView {
    fn from(row: &AllocationRow) -> Self {
        Self {
            asset: row.asset.clone(),
            percent: row.percent,
            percent_label: row.percent_label(),
            amount: row
                .amount
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            amount_label: row.amount_label(),
        }
    }
}

/// Pie chart slice
#[derive(Debug, Serialize)]
pub struct ChartSlice {
    pub label: String,
    pub value: i64,
}

#[derive(Debug, Serialize)]
pub struct PortfolioResponse {
    pub id: String,
    pub generated_at: String,
    pub profile: ProfileView,
    pub universe: Vec<&'static str>,
    pub rows: Vec<RowView>,
    pub chart: Vec<ChartSlice>,
    pub explanation: Option<String>,
    pub explanation_error: Option<String>,
    pub disclaimer: &'static str,
}

impl From<Recommendation> for PortfolioResponse {
    fn from(rec: Recommendation) -> Self {
        let (explanation, explanation_error) = match rec.explanation {
            Explanation::Available { text } => (Some(text), None),
            Explanation::Unavailable { reason } => (None, Some(reason)),
        };

        Self {
            id: rec.id.to_string(),
            generated_at: rec.generated_at.to_rfc3339(),
            profile: ProfileView {
                age: rec.profile.age(),
                goal: rec.profile.goal().label(),
                amount: rec.profile.amount().normalize(),
                risk: rec.profile.risk().label(),
            },
            universe: rec.universe.assets().to_vec(),
            rows: rec.rows.iter().map(RowView::from).collect(),
            chart: rec
                .rows
                .iter()
                .map(|r| ChartSlice {
                    label: r.asset.clone(),
                    value: r.percent,
                })
                .collect(),
            explanation,
            explanation_error,
            disclaimer: DISCLAIMER,
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a pipeline failure onto an HTTP response
pub fn error_response(err: &AdvisorError) -> ApiError {
    let status = match err {
        AdvisorError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AdvisorError::Provider(e) if e.is_retryable() => StatusCode::SERVICE_UNAVAILABLE,
        AdvisorError::ModelResponseUnparsable(_)
        | AdvisorError::ExplanationUnavailable(_)
        | AdvisorError::Provider(_) => StatusCode::BAD_GATEWAY,
    };

    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
            code: err.code().into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_available = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider: state.provider.name().to_string(),
        provider_available,
    })
}

/// Select options for building the form
pub async fn form_options() -> Json<FormOptionsResponse> {
    Json(FormOptionsResponse {
        goal_placeholder: Goal::PLACEHOLDER,
        goals: Goal::ALL.iter().map(|g| g.label()).collect(),
        risk_placeholder: RiskTier::PLACEHOLDER,
        risks: RiskTier::ALL
            .iter()
            .map(|r| RiskOption {
                value: *r,
                label: r.label(),
            })
            .collect(),
    })
}

/// Submission as JSON
pub async fn portfolio_json(
    State(state): State<AppState>,
    Json(form): Json<RawForm>,
) -> Result<Json<PortfolioResponse>, ApiError> {
    submit(&state, &form).await
}

/// Submission as an HTML form post
pub async fn portfolio_form(
    State(state): State<AppState>,
    Form(form): Form<RawForm>,
) -> Result<Json<PortfolioResponse>, ApiError> {
    submit(&state, &form).await
}

async fn submit(state: &AppState, form: &RawForm) -> Result<Json<PortfolioResponse>, ApiError> {
    match state.advisor.advise(form).await {
        Ok(rec) => {
            tracing::info!(
                id = %rec.id,
                rows = rec.rows.len(),
                explained = rec.explanation.text().is_some(),
                "Recommendation ready"
            );
            Ok(Json(rec.into()))
        }
        Err(AdvisorError::Validation(v)) => {
            tracing::debug!(code = v.code(), "Submission rejected");
            Err(error_response(&AdvisorError::Validation(v)))
        }
        Err(e) => {
            tracing::error!("Recommendation failed: {}", e);
            Err(error_response(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm_core::LlmError;
    use portfolio_advisor::ValidationError;

    #[test]
    fn test_error_status_mapping() {
        let (status, body) = error_response(&ValidationError::InvalidAmount.into());
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code, "INVALID_AMOUNT");

        let (status, body) =
            error_response(&AdvisorError::ModelResponseUnparsable("eof".into()));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.code, "MODEL_RESPONSE_UNPARSABLE");

        let (status, _) =
            error_response(&LlmError::RateLimited("429".into()).into());
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, body) = error_response(&LlmError::Auth("401".into()).into());
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.code, "PROVIDER_ERROR");
    }
}
