use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::bands::{lookup, Band, Cmp};
use crate::error::FinDashError;
use crate::types::{round_currency, Money, Percent};
use crate::FinDashResult;

use super::{overflow, require_non_negative, require_positive};

// ---------------------------------------------------------------------------
// P/E
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeValuation {
    Undervalued,
    FairValue,
    Overvalued,
}

pub const PE_BANDS: [Band<PeValuation>; 2] = [
    Band::new(Cmp::Below, dec!(15), PeValuation::Undervalued),
    Band::new(Cmp::Above, dec!(25), PeValuation::Overvalued),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeInput {
    pub price: Money,
    pub eps: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeOutput {
    pub pe_ratio: Decimal,
    pub valuation: PeValuation,
}

pub fn pe_ratio(input: &PeInput) -> FinDashResult<PeOutput> {
    require_positive("eps", input.eps)?;
    let pe = input
        .price
        .checked_div(input.eps)
        .ok_or_else(|| overflow("p/e ratio"))?;
    Ok(PeOutput {
        pe_ratio: round_currency(pe),
        valuation: lookup(pe, &PE_BANDS, PeValuation::FairValue),
    })
}

// ---------------------------------------------------------------------------
// Profit margin
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitMarginInput {
    pub revenue: Money,
    #[serde(alias = "costs")]
    pub total_costs: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitMarginOutput {
    pub profit: Money,
    pub margin_pct: Percent,
}

pub fn profit_margin(input: &ProfitMarginInput) -> FinDashResult<ProfitMarginOutput> {
    require_positive("revenue", input.revenue)?;
    let profit = input
        .revenue
        .checked_sub(input.total_costs)
        .ok_or_else(|| overflow("profit"))?;
    let margin_pct = profit
        .checked_div(input.revenue)
        .and_then(|m| m.checked_mul(dec!(100)))
        .ok_or_else(|| overflow("profit margin"))?;
    Ok(ProfitMarginOutput {
        profit: round_currency(profit),
        margin_pct: round_currency(margin_pct),
    })
}

// ---------------------------------------------------------------------------
// Debt to equity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebtEquityHealth {
    LowRisk,
    Moderate,
    HighRisk,
}

pub const LEVERAGE_BANDS: [Band<DebtEquityHealth>; 2] = [
    Band::new(Cmp::Below, dec!(0.5), DebtEquityHealth::LowRisk),
    Band::new(Cmp::Above, dec!(2), DebtEquityHealth::HighRisk),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtToEquityInput {
    pub total_debt: Money,
    pub total_equity: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtToEquityOutput {
    pub ratio: Decimal,
    pub health: DebtEquityHealth,
}

pub fn debt_to_equity(input: &DebtToEquityInput) -> FinDashResult<DebtToEquityOutput> {
    require_positive("total_equity", input.total_equity)?;
    require_non_negative("total_debt", input.total_debt)?;
    let ratio = input
        .total_debt
        .checked_div(input.total_equity)
        .ok_or_else(|| overflow("debt-to-equity ratio"))?;
    Ok(DebtToEquityOutput {
        ratio: round_currency(ratio),
        health: lookup(ratio, &LEVERAGE_BANDS, DebtEquityHealth::Moderate),
    })
}

// ---------------------------------------------------------------------------
// Break-even
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakEvenInput {
    pub fixed_costs: Money,
    pub price_per_unit: Money,
    pub cost_per_unit: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenOutput {
    /// Whole units, rounded up
    pub units: Decimal,
    pub revenue: Money,
    pub contribution_margin: Money,
}

pub fn break_even(input: &BreakEvenInput) -> FinDashResult<BreakEvenOutput> {
    require_non_negative("fixed_costs", input.fixed_costs)?;
    let contribution = input
        .price_per_unit
        .checked_sub(input.cost_per_unit)
        .ok_or_else(|| overflow("contribution margin"))?;
    if contribution <= Decimal::ZERO {
        return Err(FinDashError::InvalidInput {
            field: "price_per_unit".into(),
            reason: "Price per unit must exceed cost per unit".into(),
        });
    }
    let units = input
        .fixed_costs
        .checked_div(contribution)
        .ok_or_else(|| overflow("break-even units"))?
        .ceil();
    let revenue = units
        .checked_mul(input.price_per_unit)
        .ok_or_else(|| overflow("break-even revenue"))?;
    Ok(BreakEvenOutput {
        units,
        revenue: round_currency(revenue),
        contribution_margin: round_currency(contribution),
    })
}
