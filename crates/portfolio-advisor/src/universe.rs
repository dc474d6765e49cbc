//! Asset-Universe Builder
//!
//! The candidate asset classes offered to the model, gated by risk tier.

use serde::Serialize;

use crate::model::RiskTier;

/// Asset classes offered at every risk tier, in prompt order
pub const CONVENTIONAL_ASSETS: [&str; 8] = [
    "Złoto",
    "Srebro",
    "Akcje",
    "ETF-y",
    "Obligacje skarbowe",
    "Lokaty bankowe",
    "Obligacje korporacyjne",
    "Fundusze obligacji",
];

/// Asset classes the model expands into concrete examples
pub const BASKET_CATEGORIES: [&str; 5] = [
    "Akcje",
    "ETF-y",
    "Obligacje skarbowe",
    "Obligacje korporacyjne",
    "Fundusze obligacji",
];

/// Asset classes the model answers with a bare percent
pub const FLAT_ASSETS: [&str; 4] = ["BTC", "ETH", "Złoto", "Srebro"];

/// Ordered candidate list for one submission
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AssetUniverse {
    assets: Vec<&'static str>,
}

impl AssetUniverse {
    /// `BTC` from medium risk up, `ETH` only at high risk, then the fixed tail
    pub fn for_risk(risk: RiskTier) -> Self {
        let mut assets = Vec::with_capacity(CONVENTIONAL_ASSETS.len() + 2);
        if risk >= RiskTier::Medium {
            assets.push("BTC");
        }
        if risk == RiskTier::High {
            assets.push("ETH");
        }
        assets.extend(CONVENTIONAL_ASSETS);
        Self { assets }
    }

    pub fn assets(&self) -> &[&'static str] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Comma-separated list for prompts
    pub fn joined(&self) -> String {
        self.assets.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_universe_sizes() {
        assert_eq!(AssetUniverse::for_risk(RiskTier::Low).len(), 8);
        assert_eq!(AssetUniverse::for_risk(RiskTier::Medium).len(), 9);
        assert_eq!(AssetUniverse::for_risk(RiskTier::High).len(), 10);
    }

    #[test]
    fn test_high_risk_order() {
        let universe = AssetUniverse::for_risk(RiskTier::from_label("wysokie").unwrap());
        assert_eq!(&universe.assets()[..3], &["BTC", "ETH", "Złoto"]);
        assert_eq!(universe.assets().last(), Some(&"Fundusze obligacji"));
    }

    #[test]
    fn test_low_risk_has_no_crypto() {
        let universe = AssetUniverse::for_risk(RiskTier::Low);
        assert!(!universe.assets().contains(&"BTC"));
        assert!(!universe.assets().contains(&"ETH"));
        assert_eq!(universe.assets(), &CONVENTIONAL_ASSETS);
    }

    #[test]
    fn test_deterministic() {
        for risk in RiskTier::ALL {
            assert_eq!(AssetUniverse::for_risk(risk), AssetUniverse::for_risk(risk));
        }
    }
}
