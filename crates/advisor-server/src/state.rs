//! Application State

use std::sync::Arc;

use llm_core::LlmProvider;
use portfolio_advisor::PortfolioAdvisor;

/// Shared, read-only application state
#[derive(Clone)]
pub struct AppState {
    /// LLM provider (OpenAI, Ollama, scripted)
    pub provider: Arc<dyn LlmProvider>,

    /// Submission pipeline bound to `provider`
    pub advisor: Arc<PortfolioAdvisor>,
}
