//! portfolio-advisor HTTP Server
//!
//! Axum-based backend for the investment form: serves the form options,
//! accepts submissions and returns the normalized allocation with its
//! explanation.

mod config;
mod handlers;
mod state;

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use llm_core::{GenerationOptions, LlmProvider};
use llm_runtime::{OpenAiConfig, OpenAiProvider, ScriptedProvider};
use portfolio_advisor::{AdvisorSettings, PortfolioAdvisor};

use crate::config::{AppConfig, ProviderKind};
use crate::handlers::{form_options, health_check, portfolio_form, portfolio_json};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let provider = build_provider(&config)?;

    match provider.health_check().await {
        Ok(true) => {
            tracing::info!("✓ Connected to {} (model {})", provider.name(), config.model);
        }
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ {} not reachable - submissions will fail", provider.name());
        }
    }

    let settings = AdvisorSettings {
        generation: GenerationOptions::default()
            .with_model(config.model.clone())
            .with_temperature(config.temperature),
        ..AdvisorSettings::default()
    };

    let state = AppState {
        advisor: Arc::new(PortfolioAdvisor::new(provider.clone(), settings)),
        provider,
    };

    let app = build_router(state, config.static_dir.as_deref());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 portfolio-advisor running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health              - Health check");
    tracing::info!("  GET  /api/form            - Form options");
    tracing::info!("  POST /api/portfolio       - Submit form (JSON)");
    tracing::info!("  POST /api/portfolio/form  - Submit form (urlencoded)");

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_provider(config: &AppConfig) -> anyhow::Result<Arc<dyn LlmProvider>> {
    match config.provider {
        ProviderKind::OpenAi => {
            let key = config
                .openai_api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY must be set"))?;
            let openai = OpenAiConfig::new(key)
                .with_base_url(config.openai_base_url.clone())
                .with_timeout(config.timeout_secs);
            Ok(Arc::new(OpenAiProvider::from_config(openai)?))
        }
        ProviderKind::Ollama => build_ollama(config),
        ProviderKind::Mock => {
            tracing::warn!("⚠ Using scripted demo provider - recommendations are canned");
            Ok(Arc::new(ScriptedProvider::demo()))
        }
    }
}

#[cfg(feature = "ollama")]
fn build_ollama(config: &AppConfig) -> anyhow::Result<Arc<dyn LlmProvider>> {
    let ollama = llm_runtime::OllamaConfig {
        host: config.ollama_host.clone(),
        port: config.ollama_port,
    };
    Ok(Arc::new(llm_runtime::OllamaProvider::from_config(&ollama)))
}

#[cfg(not(feature = "ollama"))]
fn build_ollama(_config: &AppConfig) -> anyhow::Result<Arc<dyn LlmProvider>> {
    anyhow::bail!("LLM_PROVIDER=ollama requires building with the `ollama` feature")
}

fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/health", get(health_check))
        .route("/api/form", get(form_options))
        .route("/api/portfolio", post(portfolio_json))
        .route("/api/portfolio/form", post(portfolio_form));

    // Static form page, if one is deployed
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
