//! Service Kit - Model Requesters
//!
//! The two outbound calls of a submission, both going through
//! `llm_core::LlmProvider`.

mod explanation;
mod recommendation;

pub use explanation::{ExplanationRequester, explanation_prompt};
pub use recommendation::{ParsedReply, RecommendationRequester, parse_reply, recommendation_prompt};
