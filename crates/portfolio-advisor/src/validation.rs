//! Input Validator
//!
//! Turns the four raw form fields into a [`UserProfile`]. Checks run in form
//! order and stop at the first failure.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::{Goal, RiskTier, UserProfile};

/// Minimum age accepted by the form
pub const MIN_AGE: u32 = 18;

/// Raw field values exactly as submitted
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawForm {
    pub age: String,
    pub goal: String,
    pub amount: String,
    pub risk: String,
}

impl RawForm {
    pub fn new(
        age: impl Into<String>,
        goal: impl Into<String>,
        amount: impl Into<String>,
        risk: impl Into<String>,
    ) -> Self {
        Self {
            age: age.into(),
            goal: goal.into(),
            amount: amount.into(),
            risk: risk.into(),
        }
    }
}

/// Validate a submission
pub fn validate(form: &RawForm) -> Result<UserProfile, ValidationError> {
    let age = parse_age(&form.age)?;
    let goal = Goal::from_label(&form.goal).ok_or(ValidationError::GoalNotSelected)?;
    let amount = parse_amount(&form.amount)?;
    let risk = RiskTier::from_label(&form.risk).ok_or(ValidationError::RiskNotSelected)?;

    Ok(UserProfile::new(age, goal, amount, risk))
}

fn parse_age(raw: &str) -> Result<u32, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingAge);
    }

    // Negative, fractional and non-numeric input all land here
    raw.parse::<u32>()
        .ok()
        .filter(|age| *age >= MIN_AGE)
        .ok_or(ValidationError::Underage)
}

fn parse_amount(raw: &str) -> Result<Decimal, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingAmount);
    }

    let normalized = raw.replace(',', ".");
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
        .filter(|amount| *amount > Decimal::ZERO)
        .ok_or(ValidationError::InvalidAmount)
}
