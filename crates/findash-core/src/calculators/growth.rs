use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::FinDashError;
use crate::types::{pct_to_rate, round_currency, Money, Percent};
use crate::FinDashResult;

use super::{overflow, require_non_negative, require_positive};

/// How often interest is credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundingFrequency {
    Annually,
    SemiAnnually,
    Quarterly,
    #[default]
    Monthly,
    Daily,
}

impl CompoundingFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            CompoundingFrequency::Annually => 1,
            CompoundingFrequency::SemiAnnually => 2,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::Monthly => 12,
            CompoundingFrequency::Daily => 365,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundInterestInput {
    pub principal: Money,
    /// Annual rate in percentage points
    pub rate_pct: Percent,
    pub years: Decimal,
    #[serde(default)]
    pub frequency: CompoundingFrequency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundInterestOutput {
    pub amount: Money,
    pub interest: Money,
}

/// P (1 + r/n)^(n t)
pub fn compound_interest(input: &CompoundInterestInput) -> FinDashResult<CompoundInterestOutput> {
    require_non_negative("principal", input.principal)?;
    require_non_negative("years", input.years)?;

    let n = Decimal::from(input.frequency.periods_per_year());
    let base = Decimal::ONE + pct_to_rate(input.rate_pct) / n;
    if base <= Decimal::ZERO {
        return Err(FinDashError::InvalidInput {
            field: "rate_pct".into(),
            reason: "Periodic rate must exceed -100%".into(),
        });
    }

    let periods = n
        .checked_mul(input.years)
        .ok_or_else(|| overflow("compounding periods"))?;
    let growth = pow(base, periods, "compound growth factor")?;
    let amount = input
        .principal
        .checked_mul(growth)
        .ok_or_else(|| overflow("compound amount"))?;

    Ok(CompoundInterestOutput {
        amount: round_currency(amount),
        interest: round_currency(amount - input.principal),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CagrInput {
    pub initial_value: Money,
    pub final_value: Money,
    pub years: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CagrOutput {
    pub cagr_pct: Percent,
}

/// ((final / initial)^(1 / years) - 1) * 100
pub fn cagr(input: &CagrInput) -> FinDashResult<CagrOutput> {
    require_positive("initial_value", input.initial_value)?;
    require_positive("years", input.years)?;
    require_non_negative("final_value", input.final_value)?;

    let ratio = input
        .final_value
        .checked_div(input.initial_value)
        .ok_or_else(|| overflow("growth ratio"))?;
    let growth = if ratio.is_zero() {
        Decimal::ZERO
    } else {
        pow(ratio, Decimal::ONE / input.years, "cagr")?
    };

    let cagr_pct = (growth - Decimal::ONE)
        .checked_mul(dec!(100))
        .ok_or_else(|| overflow("cagr"))?;

    Ok(CagrOutput {
        cagr_pct: round_currency(cagr_pct),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiInput {
    pub investment: Money,
    #[serde(alias = "returns")]
    pub final_value: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiOutput {
    pub profit: Money,
    pub roi_pct: Percent,
}

pub fn roi(input: &RoiInput) -> FinDashResult<RoiOutput> {
    require_positive("investment", input.investment)?;
    let profit = input
        .final_value
        .checked_sub(input.investment)
        .ok_or_else(|| overflow("profit"))?;
    let roi_pct = profit
        .checked_div(input.investment)
        .and_then(|r| r.checked_mul(dec!(100)))
        .ok_or_else(|| overflow("roi"))?;
    Ok(RoiOutput {
        profit: round_currency(profit),
        roi_pct: round_currency(roi_pct),
    })
}

/// Integer exponents go through `checked_powi`; fractional ones through `powd`.
fn pow(base: Decimal, exponent: Decimal, context: &str) -> FinDashResult<Decimal> {
    if exponent.fract().is_zero() {
        let e = exponent.to_i64().ok_or_else(|| overflow(context))?;
        base.checked_powi(e).ok_or_else(|| overflow(context))
    } else {
        base.checked_powd(exponent).ok_or_else(|| overflow(context))
    }
}
