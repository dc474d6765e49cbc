//! Domain Models
//!
//! Data contracts for one form submission: the validated profile, the raw
//! allocation parsed from the model, and the final presentation rows.
//! Uses `rust_decimal` for all monetary values - never use f64 for money!

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Investment goal offered by the form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Goal {
    #[serde(rename = "Emerytura")]
    Retirement,
    #[serde(rename = "Ochrona przed inflacją")]
    InflationProtection,
    #[serde(rename = "Budowa kapitału")]
    CapitalGrowth,
    #[serde(rename = "Finansowanie edukacji")]
    EducationFunding,
    #[serde(rename = "Zakup mieszkania/domu")]
    HomePurchase,
    #[serde(rename = "Spekulacja i krótkoterminowy zysk")]
    Speculation,
}

impl Goal {
    /// Every selectable goal, in form order
    pub const ALL: [Self; 6] = [
        Self::Retirement,
        Self::InflationProtection,
        Self::CapitalGrowth,
        Self::EducationFunding,
        Self::HomePurchase,
        Self::Speculation,
    ];

    /// First option of the goal select; means nothing was chosen
    pub const PLACEHOLDER: &'static str = "Wybierz cel inwestycji";

    pub const fn label(self) -> &'static str {
        match self {
            Self::Retirement => "Emerytura",
            Self::InflationProtection => "Ochrona przed inflacją",
            Self::CapitalGrowth => "Budowa kapitału",
            Self::EducationFunding => "Finansowanie edukacji",
            Self::HomePurchase => "Zakup mieszkania/domu",
            Self::Speculation => "Spekulacja i krótkoterminowy zysk",
        }
    }

    /// Match a submitted label; placeholder and unknown labels give `None`
    pub fn from_label(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL.into_iter().find(|g| g.label() == raw)
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Risk tolerance selected by the user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// First option of the risk select; means nothing was chosen
    pub const PLACEHOLDER: &'static str = "Wybierz poziom ryzyka";

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "niskie",
            Self::Medium => "średnie",
            Self::High => "wysokie",
        }
    }

    /// Accepts form labels and English tier names, case-insensitively
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "niskie" | "low" => Some(Self::Low),
            "średnie" | "srednie" | "medium" => Some(Self::Medium),
            "wysokie" | "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated user input for one submission
///
/// Only the validator constructs it; fields are read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    age: u32,
    goal: Goal,
    amount: Decimal,
    risk: RiskTier,
}

impl UserProfile {
    pub(crate) const fn new(age: u32, goal: Goal, amount: Decimal, risk: RiskTier) -> Self {
        Self {
            age,
            goal,
            amount,
            risk,
        }
    }

    pub const fn age(&self) -> u32 {
        self.age
    }

    pub const fn goal(&self) -> Goal {
        self.goal
    }

    /// Savings amount in PLN
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    pub const fn risk(&self) -> RiskTier {
        self.risk
    }
}

/// One untrusted entry of the model's allocation reply
#[derive(Clone, Debug, PartialEq)]
pub enum RawAllocationEntry {
    /// `"Złoto": 20`; the value may be anything the model produced
    Bare(Value),
    /// `"Akcje": {"percent": 30, "examples": [...]}`; either field may be absent
    Basket {
        percent: Option<Value>,
        examples: Option<Value>,
    },
}

impl From<Value> for RawAllocationEntry {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(mut obj) => Self::Basket {
                percent: obj.remove("percent"),
                examples: obj.remove("examples"),
            },
            other => Self::Bare(other),
        }
    }
}

/// Asset class → entry mapping, in the order the model wrote it
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawAllocation {
    entries: Vec<(String, RawAllocationEntry)>,
}

impl RawAllocation {
    /// Build from a decoded JSON object
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self {
            entries: map
                .into_iter()
                .map(|(k, v)| (k, RawAllocationEntry::from(v)))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawAllocationEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A presentation-ready allocation line
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRow {
    /// Asset class or concrete example name
    pub asset: String,

    /// Whole percent; a multiple of 5 except possibly the rebalanced row
    pub percent: i64,

    /// Amount in PLN, unrounded
    pub amount: Decimal,
}

impl AllocationRow {
    pub fn new(asset: impl Into<String>, percent: i64, total_amount: Decimal) -> Self {
        let mut row = Self {
            asset: asset.into(),
            percent,
            amount: Decimal::ZERO,
        };
        row.recompute_amount(total_amount);
        row
    }

    /// `amount = percent / 100 × total`, saturating at `Decimal::MAX`
    pub fn recompute_amount(&mut self, total_amount: Decimal) {
        self.amount = (Decimal::from(self.percent) / Decimal::ONE_HUNDRED)
            .checked_mul(total_amount)
            .unwrap_or(Decimal::MAX);
    }

    /// e.g. `"25%"`
    pub fn percent_label(&self) -> String {
        format!("{}%", self.percent)
    }

    /// Two-decimal currency string, e.g. `"2500.00"`
    pub fn amount_label(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{rounded:.2}")
    }
}
