//! # portfolio-advisor
//!
//! Form-driven portfolio recommendation backed by a chat-completion model.
//!
//! ## Flow
//!
//! ```text
//! RawForm ─▶ validate ─▶ AssetUniverse ─▶ RecommendationRequester ─▶ RawAllocation
//!                                                                        │
//!         Explanation ◀─ ExplanationRequester ◀─ AllocationRow[] ◀─ AllocationNormalizer
//! ```
//!
//! ## Example: 10 000 PLN, high risk
//!
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │  EDO   ████████████████████   30%   3000.00 PLN     │
//! │  COI   ████████████████████   30%   3000.00 PLN     │
//! │  Złoto ████████████████████   30%   3000.00 PLN     │
//! │  BTC   ███████                10%   1000.00 PLN     │
//! └────────────────────────────────────────────────────┘
//! ```
//!
//! The model only proposes; the normalizer guarantees at most eight rows
//! summing to exactly 100%.

pub mod advisor;
pub mod error;
pub mod model;
pub mod strategy;
pub mod svckit;
pub mod universe;
pub mod validation;

pub use advisor::{AdvisorSettings, Explanation, PortfolioAdvisor, Recommendation};
pub use error::{AdvisorError, Result, ValidationError};
pub use model::{AllocationRow, Goal, RawAllocation, RawAllocationEntry, RiskTier, UserProfile};
pub use strategy::AllocationNormalizer;
pub use universe::AssetUniverse;
pub use validation::{RawForm, validate};

/// System prompt for the allocation request
pub const RECOMMENDATION_SYSTEM_PROMPT: &str =
    "Jesteś doradcą finansowym AI, odpowiadaj tylko JSON-em.";

/// System prompt for the explanation request
pub const EXPLANATION_SYSTEM_PROMPT: &str = "Jesteś doradcą finansowym AI.";

/// Shown next to every recommendation
pub const DISCLAIMER: &str = "Przedstawione narzędzie oraz jego rekomendacje nie są poradą \
inwestycyjną w rozumieniu Rozporządzenia Ministra Finansów z dnia 19.10.2005 r. w sprawie \
informacji stanowiących rekomendacje dotyczące instrumentów finansowych lub ich emitentów \
(Dz. U. z 2005 r. Nr 206, poz. 1715). Treść rekomendacji ma jedynie charakter edukacyjny.";
