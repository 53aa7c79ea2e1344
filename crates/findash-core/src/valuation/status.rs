use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::bands::{lookup, Band, Cmp};
use crate::error::{AssumptionViolation, FinDashError};
use crate::types::{Money, Percent};
use crate::FinDashResult;

/// Where an intrinsic value sits relative to the market price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationStatus {
    Undervalued,
    Fair,
    Overvalued,
}

impl ValuationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ValuationStatus::Undervalued => "Undervalued",
            ValuationStatus::Fair => "Fair Value",
            ValuationStatus::Overvalued => "Overvalued",
        }
    }
}

/// Bands on the percent difference, checked top-down. Anything below the
/// last band is overvalued.
pub const STATUS_BANDS: [Band<ValuationStatus>; 2] = [
    Band::new(Cmp::Above, dec!(15), ValuationStatus::Undervalued),
    Band::new(Cmp::AtLeast, dec!(-15), ValuationStatus::Fair),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationAssessment {
    pub status: ValuationStatus,
    pub label: String,
    /// (intrinsic - price) / price * 100
    pub percent_difference: Percent,
}

/// Classify an intrinsic value against the current market price.
pub fn classify(intrinsic_value: Money, current_price: Money) -> FinDashResult<ValuationAssessment> {
    let percent_difference = percent_difference(intrinsic_value, current_price)?;
    let status = lookup(percent_difference, &STATUS_BANDS, ValuationStatus::Overvalued);
    Ok(ValuationAssessment {
        status,
        label: status.label().to_string(),
        percent_difference,
    })
}

/// Percent by which `intrinsic_value` exceeds `current_price`.
pub fn percent_difference(intrinsic_value: Money, current_price: Money) -> FinDashResult<Percent> {
    if current_price <= Decimal::ZERO {
        return Err(AssumptionViolation::CurrentPriceMustBePositive.into());
    }
    intrinsic_value
        .checked_sub(current_price)
        .and_then(|d| d.checked_div(current_price))
        .and_then(|d| d.checked_mul(dec!(100)))
        .ok_or_else(|| FinDashError::ArithmeticOverflow {
            context: "percent difference".into(),
        })
}
