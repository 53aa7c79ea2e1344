use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// Rates expressed in percentage points (5 = 5%), as entered on the dashboard.
pub type Percent = Decimal;

/// Convert percentage points into a decimal rate.
pub fn pct_to_rate(pct: Percent) -> Rate {
    pct / dec!(100)
}

/// Round to `dp` decimal places, halves away from zero.
pub fn round_dp(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Currency-style rounding (2 dp).
pub fn round_currency(value: Money) -> Money {
    round_dp(value, 2)
}

/// Round to the nearest whole unit.
pub fn round_whole(value: Money) -> Money {
    round_dp(value, 0)
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    for w in &warnings {
        tracing::warn!(methodology, warning = %w, "computation warning");
    }
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_currency_half_away_from_zero() {
        assert_eq!(round_currency(dec!(255.405)), dec!(255.41));
        assert_eq!(round_currency(dec!(-1.005)), dec!(-1.01));
        assert_eq!(round_whole(dec!(196199.7783)), dec!(196200));
    }

    #[test]
    fn test_negative_halves_round_away_from_zero() {
        // Symmetric about zero: -2.5 goes to -3, not up to -2
        assert_eq!(round_whole(dec!(-2.5)), dec!(-3));
        assert_eq!(round_whole(dec!(2.5)), dec!(3));
        assert_eq!(round_currency(dec!(-0.125)), dec!(-0.13));
    }

    #[test]
    fn test_pct_to_rate() {
        assert_eq!(pct_to_rate(dec!(9.5)), dec!(0.095));
    }

    #[test]
    fn test_with_metadata_echoes_assumptions() {
        let out = with_metadata(
            "test",
            &serde_json::json!({ "a": 1 }),
            vec!["careful".into()],
            7,
            dec!(1),
        );
        assert_eq!(out.methodology, "test");
        assert_eq!(out.assumptions["a"], 1);
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.metadata.computation_time_us, 7);
    }
}
