//! # llm-runtime
//!
//! Concrete chat completion providers.
//!
//! ## Providers
//!
//! - **OpenAI** (default): any `/chat/completions` compatible endpoint
//! - **Ollama** (feature `ollama`): local inference via Ollama
//! - **Scripted**: queued replies for tests and offline demos
//!
//! ## Usage
//!
//! ```rust,ignore
//! use llm_runtime::{OpenAiConfig, OpenAiProvider};
//!
//! let provider = OpenAiProvider::from_config(OpenAiConfig::new(api_key))?;
//! let advisor = PortfolioAdvisor::new(Arc::new(provider), settings);
//! ```

pub mod mock;
pub mod openai;

#[cfg(feature = "ollama")]
pub mod ollama;

pub use mock::ScriptedProvider;
pub use openai::{OpenAiConfig, OpenAiProvider};

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};

// Re-export core types for convenience
pub use llm_core::{Completion, GenerationOptions, LlmError, LlmProvider, Message, Result, Role};
