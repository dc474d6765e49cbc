//! # llm-core
//!
//! Provider-agnostic chat completion abstraction.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    Caller (advisor)                       │
//! │  ┌─────────────┐   ┌──────────────────┐   ┌───────────┐  │
//! │  │  Messages   │──▶│   LlmProvider    │──▶│ Completion│  │
//! │  │ system+user │   │    (Strategy)    │   │   text    │  │
//! │  └─────────────┘   └──────────────────┘   └───────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait lets callers swap between OpenAI-compatible
//! endpoints, Ollama, or a scripted test double without touching domain
//! logic.

pub mod error;
pub mod message;
pub mod provider;

pub use error::{LlmError, Result};
pub use message::{Message, Role};
pub use provider::{Completion, GenerationOptions, LlmProvider};
