//! Allocation Normalizer
//!
//! Turns the model's untrusted allocation into at most eight rows whose
//! percents sum to exactly 100.
//!
//! Rounding uses round-half-to-even: `7.5 → 10`, `12.5 → 10`, `2.5 → 0`.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use crate::model::{AllocationRow, RawAllocation, RawAllocationEntry};

/// Percents must always add up to this
pub const TARGET_PERCENT: i64 = 100;

/// Normalization strategy for a single model reply
#[derive(Clone, Copy, Debug)]
pub struct AllocationNormalizer {
    /// Cap on asset classes kept and on rows emitted
    max_rows: usize,
    /// Percent granularity
    step: i64,
}

impl Default for AllocationNormalizer {
    fn default() -> Self {
        Self {
            max_rows: 8,
            step: 5,
        }
    }
}

/// An asset class after percent coercion
#[derive(Debug)]
struct RankedEntry<'a> {
    name: &'a str,
    percent: i64,
    examples: Vec<String>,
    basket: bool,
}

impl AllocationNormalizer {
    /// Coerce, rank, expand, filter, rebalance and price.
    ///
    /// Rows come back in allocation order, the rebalanced row last; use
    /// [`Self::sort_for_display`] before showing them.
    pub fn normalize(&self, raw: &RawAllocation, total_amount: Decimal) -> Vec<AllocationRow> {
        let ranked = self.rank(raw);
        let mut rows = self.expand(&ranked, total_amount);

        rows.retain(|r| r.percent > 0);
        rows.truncate(self.max_rows);

        Self::rebalance(&mut rows, total_amount);

        tracing::debug!(
            classes = raw.len(),
            rows = rows.len(),
            "Allocation normalized"
        );
        rows
    }

    /// Percent descending; ties keep allocation order
    pub fn sort_for_display(rows: &mut [AllocationRow]) {
        rows.sort_by(|a, b| b.percent.cmp(&a.percent));
    }

    /// Coerce and round every entry, then keep the largest `max_rows` classes
    fn rank<'a>(&self, raw: &'a RawAllocation) -> Vec<RankedEntry<'a>> {
        let mut ranked: Vec<_> = raw
            .iter()
            .map(|(name, entry)| match entry {
                RawAllocationEntry::Bare(value) => RankedEntry {
                    name,
                    percent: self.round_to_step(coerce_percent(Some(value))),
                    examples: Vec::new(),
                    basket: false,
                },
                RawAllocationEntry::Basket { percent, examples } => RankedEntry {
                    name,
                    percent: self.round_to_step(coerce_percent(percent.as_ref())),
                    examples: coerce_examples(examples.as_ref()),
                    basket: true,
                },
            })
            .collect();

        // Stable: ties keep the model's order
        ranked.sort_by(|a, b| b.percent.cmp(&a.percent));
        ranked.truncate(self.max_rows);
        ranked
    }

    /// One row per bare class, one row per example for baskets
    fn expand(&self, ranked: &[RankedEntry<'_>], total_amount: Decimal) -> Vec<AllocationRow> {
        let mut rows = Vec::new();
        for entry in ranked.iter().filter(|e| e.percent > 0) {
            if !entry.basket {
                rows.push(AllocationRow::new(entry.name, entry.percent, total_amount));
                continue;
            }
            if entry.examples.is_empty() {
                continue;
            }

            let count = Decimal::from(entry.examples.len());
            let share = self.round_to_step(Decimal::from(entry.percent) / count);
            rows.extend(
                entry
                    .examples
                    .iter()
                    .map(|name| AllocationRow::new(name.as_str(), share, total_amount)),
            );
        }
        rows
    }

    /// Push the whole difference to 100 onto the last row.
    ///
    /// A last row driven to zero or below is dropped and the correction moves
    /// to the new last row; a lone row always ends at 100.
    fn rebalance(rows: &mut Vec<AllocationRow>, total_amount: Decimal) {
        while let Some(last_index) = rows.len().checked_sub(1) {
            let sum = rows
                .iter()
                .fold(0_i64, |acc, r| acc.saturating_add(r.percent));
            let diff = TARGET_PERCENT.saturating_sub(sum);
            if diff == 0 {
                return;
            }

            let last = &mut rows[last_index];
            let corrected = last.percent.saturating_add(diff);
            if corrected > 0 {
                tracing::debug!(asset = %last.asset, diff, "Rebalancing last row");
                last.percent = corrected;
                last.recompute_amount(total_amount);
                return;
            }

            tracing::debug!(asset = %last.asset, diff, "Dropping row consumed by rebalance");
            rows.pop();
        }
    }

    /// `round(p / step) * step`, half-to-even
    fn round_to_step(&self, percent: Decimal) -> i64 {
        let step = Decimal::from(self.step);
        (percent / step)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
            .to_i64()
            .and_then(|units| units.checked_mul(self.step))
            .unwrap_or(0)
    }
}

/// Lenient percent coercion: anything unusable becomes 0, anything above
/// 100 counts as 100
fn coerce_percent(value: Option<&Value>) -> Decimal {
    match value {
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(Value::String(s)) => parse_decimal(s.trim()),
        _ => None,
    }
    .map_or(Decimal::ZERO, |p| p.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// String items of an `examples` array, trimmed, blanks skipped
fn coerce_examples(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn raw(value: Value) -> RawAllocation {
        let Value::Object(map) = value else {
            panic!("expected object");
        };
        RawAllocation::from_map(map)
    }

    fn percents(rows: &[AllocationRow]) -> Vec<i64> {
        rows.iter().map(|r| r.percent).collect()
    }

    fn displayed(mut rows: Vec<AllocationRow>) -> Vec<AllocationRow> {
        AllocationNormalizer::sort_for_display(&mut rows);
        rows
    }

    fn names(rows: &[AllocationRow]) -> Vec<&str> {
        rows.iter().map(|r| r.asset.as_str()).collect()
    }

    #[test]
    fn test_rounding_half_to_even() {
        let n = AllocationNormalizer::default();
        assert_eq!(n.round_to_step(dec!(2.5)), 0);
        assert_eq!(n.round_to_step(dec!(7.5)), 10);
        assert_eq!(n.round_to_step(dec!(12.5)), 10);
        assert_eq!(n.round_to_step(dec!(17.5)), 20);
        assert_eq!(n.round_to_step(dec!(23)), 25);
        assert_eq!(n.round_to_step(dec!(22)), 20);
    }

    #[test]
    fn test_single_bare_entry_rebalanced_to_full_amount() {
        let rows = AllocationNormalizer::default().normalize(&raw(json!({"Złoto": 23})), dec!(5000));
        assert_eq!(names(&rows), vec!["Złoto"]);
        assert_eq!(percents(&rows), vec![100]);
        assert_eq!(rows[0].amount, dec!(5000));
    }

    #[test]
    fn test_basket_expansion_and_last_row_correction() {
        let allocation = raw(json!({
            "Akcje": {"percent": 40, "examples": ["ETF1", "ETF2", "ETF3", "ETF4"]}
        }));
        let normalizer = AllocationNormalizer::default();

        let ranked = normalizer.rank(&allocation);
        let mut rows = normalizer.expand(&ranked, dec!(1000));
        assert_eq!(percents(&rows), vec![10, 10, 10, 10]);

        AllocationNormalizer::rebalance(&mut rows, dec!(1000));
        assert_eq!(percents(&rows), vec![10, 10, 10, 70]);
        assert_eq!(rows[3].asset, "ETF4");
        assert_eq!(rows[3].amount, dec!(700));

        assert_eq!(
            names(&normalizer.normalize(&allocation, dec!(1000))),
            vec!["ETF1", "ETF2", "ETF3", "ETF4"]
        );

        let display = displayed(normalizer.normalize(&allocation, dec!(1000)));
        assert_eq!(names(&display), vec!["ETF4", "ETF1", "ETF2", "ETF3"]);
        assert_eq!(percents(&display), vec![70, 10, 10, 10]);
    }

    #[test]
    fn test_invalid_percents_coerce_to_zero() {
        let allocation = raw(json!({
            "BTC": "dużo",
            "ETH": null,
            "Srebro": [5],
            "Akcje": {"examples": ["PKO"]},
            "Złoto": " 50 ",
            "ETF-y": {"percent": "50", "examples": ["VWCE"]}
        }));
        let rows = AllocationNormalizer::default().normalize(&allocation, dec!(100));
        assert_eq!(names(&rows), vec!["Złoto", "VWCE"]);
        assert_eq!(percents(&rows), vec![50, 50]);
    }

    #[test]
    fn test_non_string_examples_do_not_take_a_share() {
        let allocation = raw(json!({
            "Akcje": {"percent": 50, "examples": ["PKO", 5, null, "  "]},
            "Złoto": 50
        }));
        let rows = AllocationNormalizer::default().normalize(&allocation, dec!(100));
        assert_eq!(names(&rows), vec!["PKO", "Złoto"]);
        assert_eq!(percents(&rows), vec![50, 50]);
    }

    #[test]
    fn test_negative_and_empty_baskets_are_dropped() {
        let allocation = raw(json!({
            "BTC": -10,
            "Akcje": {"percent": 30, "examples": []},
            "Obligacje skarbowe": {"percent": 30, "examples": "EDO"},
            "Złoto": 40
        }));
        let rows = AllocationNormalizer::default().normalize(&allocation, dec!(100));
        assert_eq!(names(&rows), vec!["Złoto"]);
        assert_eq!(percents(&rows), vec![100]);
    }

    #[test]
    fn test_expansion_is_truncated_to_eight_rows() {
        let allocation = raw(json!({
            "ETF-y": {"percent": 50, "examples": ["A", "B", "C", "D", "E"]},
            "Akcje": {"percent": 50, "examples": ["F", "G", "H", "I", "J"]}
        }));
        let rows = displayed(AllocationNormalizer::default().normalize(&allocation, dec!(100)));
        assert_eq!(rows.len(), 8);
        assert_eq!(percents(&rows).iter().sum::<i64>(), 100);
        // Eight 10% rows sum to 80; H absorbs the remaining 20
        assert_eq!(rows[0].asset, "H");
        assert_eq!(rows[0].percent, 30);
    }

    #[test]
    fn test_only_top_eight_classes_kept() {
        let allocation = raw(json!({
            "A": 5, "B": 10, "C": 10, "D": 10, "E": 10,
            "F": 10, "G": 15, "H": 15, "I": 20
        }));
        let rows = AllocationNormalizer::default().normalize(&allocation, dec!(100));
        assert_eq!(names(&rows), vec!["I", "G", "H", "B", "C", "D", "E", "F"]);
        assert_eq!(percents(&rows).iter().sum::<i64>(), 100);
    }

    #[test]
    fn test_ties_keep_model_order() {
        let allocation = raw(json!({"Srebro": 50, "Złoto": 50}));
        let rows = AllocationNormalizer::default().normalize(&allocation, dec!(100));
        assert_eq!(names(&rows), vec!["Srebro", "Złoto"]);
    }

    #[test]
    fn test_overshoot_drops_consumed_rows() {
        // 100 + 100 + 5: the 5% row cannot absorb -105 and is dropped,
        // the second 100% row then absorbs -100 and is dropped too
        let allocation = raw(json!({"BTC": 100, "ETH": 100, "Złoto": 5}));
        let rows = AllocationNormalizer::default().normalize(&allocation, dec!(100));
        assert_eq!(names(&rows), vec!["BTC"]);
        assert_eq!(percents(&rows), vec![100]);
    }

    #[test]
    fn test_overshoot_absorbed_by_last_row() {
        let allocation = raw(json!({"BTC": 60, "ETH": 60}));
        let rows = AllocationNormalizer::default().normalize(&allocation, dec!(1000));
        assert_eq!(percents(&rows), vec![60, 40]);
        assert_eq!(rows[1].amount, dec!(400));
    }

    #[test]
    fn test_huge_percents_are_capped() {
        let allocation = raw(json!({
            "BTC": 9_000_000_000_000_000_000_u64,
            "ETH": 9_000_000_000_000_000_000_u64
        }));
        let rows = AllocationNormalizer::default().normalize(&allocation, dec!(1000));
        assert_eq!(names(&rows), vec!["BTC"]);
        assert_eq!(percents(&rows), vec![100]);
        assert_eq!(rows[0].amount, dec!(1000));

        let allocation = raw(json!({"BTC": "250", "ETH": 50}));
        let rows = AllocationNormalizer::default().normalize(&allocation, dec!(1000));
        assert_eq!(names(&rows), vec!["BTC"]);
        assert_eq!(percents(&rows), vec![100]);
    }

    #[test]
    fn test_oversized_percent_with_large_amount() {
        let total = Decimal::from_str("50000000000000000000000000000").unwrap();
        let rows = AllocationNormalizer::default().normalize(&raw(json!({"BTC": 200})), total);
        assert_eq!(names(&rows), vec!["BTC"]);
        assert_eq!(rows[0].percent, 100);
        assert_eq!(rows[0].amount, total);
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        let normalizer = AllocationNormalizer::default();
        assert!(normalizer.normalize(&RawAllocation::default(), dec!(100)).is_empty());
        assert!(
            normalizer
                .normalize(&raw(json!({"BTC": 0, "ETH": 2})), dec!(100))
                .is_empty()
        );
    }

    #[test]
    fn test_invariants_over_varied_inputs() {
        let inputs = [
            json!({"BTC": 33, "ETH": 33, "Złoto": 33}),
            json!({"Akcje": {"percent": 100, "examples": ["A", "B", "C"]}}),
            json!({"Akcje": {"percent": 10, "examples": ["A", "B", "C", "D"]}, "Złoto": 90}),
            json!({"ETF-y": {"percent": "45.5", "examples": ["X", "Y"]}, "Srebro": 7.5, "BTC": 12.5}),
            json!({"A": 95, "B": 95, "C": 95, "D": 95}),
            json!({"A": "12.5", "B": true, "C": 87.4}),
        ];
        let normalizer = AllocationNormalizer::default();

        for input in inputs {
            let rows = normalizer.normalize(&raw(input.clone()), dec!(12345.67));
            if rows.is_empty() {
                continue;
            }
            assert!(rows.len() <= 8, "{input}");
            assert_eq!(rows.iter().map(|r| r.percent).sum::<i64>(), 100, "{input}");
            assert!(rows.iter().all(|r| r.percent > 0), "{input}");

            let off_step = rows.iter().filter(|r| r.percent % 5 != 0).count();
            assert!(off_step <= 1, "{input}");
        }
    }
}
