use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::{AssumptionViolation, FinDashError};
use crate::types::{
    pct_to_rate, round_currency, round_whole, with_metadata, ComputationOutput, Money, Percent,
    Rate,
};
use crate::FinDashResult;

/// Explicit forecast horizon used when none is given.
pub const DEFAULT_PROJECTION_YEARS: i32 = 5;

/// Market price the dashboard preset is compared against.
pub const DEFAULT_CURRENT_PRICE: Money = dec!(185.50);

const TERMINAL_VALUE_WARNING_SHARE: Rate = dec!(0.75);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Inputs to a single DCF valuation. Percent fields are percentage points
/// (`12` means 12%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationAssumptions {
    /// Base-year revenue
    pub revenue: Money,
    /// Annual revenue growth; may be negative
    #[serde(alias = "revenueGrowth")]
    pub revenue_growth_pct: Percent,
    /// Operating margin applied to projected revenue
    #[serde(alias = "ebitMargin")]
    pub ebit_margin_pct: Percent,
    /// Effective tax rate applied to EBIT
    #[serde(alias = "taxRate")]
    pub tax_rate_pct: Percent,
    /// Discount rate
    #[serde(alias = "wacc")]
    pub wacc_pct: Percent,
    /// Perpetual growth after the explicit horizon
    #[serde(alias = "terminalGrowth")]
    pub terminal_growth_pct: Percent,
    /// Divisor for the per-share value
    #[serde(alias = "shares")]
    pub shares_outstanding: Decimal,
    /// Length of the explicit forecast horizon
    #[serde(default = "default_projection_years", alias = "projectionYears")]
    pub projection_years: i32,
}

fn default_projection_years() -> i32 {
    DEFAULT_PROJECTION_YEARS
}

impl Default for ValuationAssumptions {
    /// The dashboard's preset company.
    fn default() -> Self {
        Self {
            revenue: dec!(50000),
            revenue_growth_pct: dec!(12),
            ebit_margin_pct: dec!(28),
            tax_rate_pct: dec!(21),
            wacc_pct: dec!(9.5),
            terminal_growth_pct: dec!(3.0),
            shares_outstanding: dec!(1000),
            projection_years: DEFAULT_PROJECTION_YEARS,
        }
    }
}

impl ValuationAssumptions {
    /// Copy with WACC and terminal growth replaced.
    pub fn with_rates(&self, wacc_pct: Percent, terminal_growth_pct: Percent) -> Self {
        Self {
            wacc_pct,
            terminal_growth_pct,
            ..self.clone()
        }
    }
}

/// One explicit forecast year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedYear {
    pub year: i32,
    pub revenue: Money,
    /// After-tax EBIT; no D&A, capex or working-capital adjustment
    pub free_cash_flow: Money,
    pub present_value: Money,
}

/// Output of the DCF valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// Enterprise value per share, 2 dp
    pub intrinsic_value_per_share: Money,
    /// PV(explicit FCFs) + PV(terminal value), whole units
    pub enterprise_value: Money,
    /// Sum of discounted explicit-period FCFs, whole units
    pub present_value_of_explicit_cash_flows: Money,
    /// Discounted Gordon-growth terminal value, whole units
    pub present_value_of_terminal_value: Money,
    pub projected_years: Vec<ProjectedYear>,
}

/// Percent inputs converted to fractions.
#[derive(Debug, Clone, Copy)]
struct Rates {
    growth: Rate,
    margin: Rate,
    tax: Rate,
    wacc: Rate,
    terminal_growth: Rate,
}

impl From<&ValuationAssumptions> for Rates {
    fn from(a: &ValuationAssumptions) -> Self {
        Self {
            growth: pct_to_rate(a.revenue_growth_pct),
            margin: pct_to_rate(a.ebit_margin_pct),
            tax: pct_to_rate(a.tax_rate_pct),
            wacc: pct_to_rate(a.wacc_pct),
            terminal_growth: pct_to_rate(a.terminal_growth_pct),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the simplified FCF DCF.
///
/// Free cash flow is modelled as after-tax operating profit. The terminal
/// value uses the Gordon growth model on the final year's FCF and is
/// discounted over the full horizon.
pub fn compute_valuation(assumptions: &ValuationAssumptions) -> FinDashResult<ValuationResult> {
    validate_assumptions(assumptions)?;

    let rates = Rates::from(assumptions);
    let n_years = assumptions.projection_years;

    let projected_years = project_cash_flows(assumptions.revenue, &rates, n_years)?;
    let pv_explicit: Money = projected_years
        .iter()
        .try_fold(Decimal::ZERO, |acc, y| acc.checked_add(y.present_value))
        .ok_or_else(|| overflow("sum of explicit present values"))?;
    let last = projected_years.last().ok_or_else(|| {
        FinDashError::InsufficientData("No projection years generated".into())
    })?;

    // Gordon growth on the final explicit year
    let terminal_fcf = last
        .free_cash_flow
        .checked_mul(Decimal::ONE + rates.terminal_growth)
        .ok_or_else(|| overflow("terminal cash flow"))?;
    let terminal_value = terminal_fcf
        .checked_div(rates.wacc - rates.terminal_growth)
        .ok_or_else(|| overflow("terminal value"))?;
    let pv_terminal = terminal_value
        .checked_div(discount_factor(rates.wacc, n_years)?)
        .ok_or_else(|| overflow("present value of terminal value"))?;

    let enterprise_value = pv_explicit
        .checked_add(pv_terminal)
        .ok_or_else(|| overflow("enterprise value"))?;
    let per_share = enterprise_value
        .checked_div(assumptions.shares_outstanding)
        .ok_or_else(|| overflow("per-share value"))?;

    tracing::debug!(
        years = n_years,
        %enterprise_value,
        %per_share,
        "dcf valuation computed"
    );

    Ok(ValuationResult {
        intrinsic_value_per_share: round_currency(per_share),
        enterprise_value: round_whole(enterprise_value),
        present_value_of_explicit_cash_flows: round_whole(pv_explicit),
        present_value_of_terminal_value: round_whole(pv_terminal),
        projected_years,
    })
}

/// `compute_valuation` wrapped in the standard output envelope.
pub fn run_valuation(
    assumptions: &ValuationAssumptions,
) -> FinDashResult<ComputationOutput<ValuationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = compute_valuation(assumptions)?;

    if result.enterprise_value < Decimal::ZERO {
        warnings.push(format!(
            "Enterprise value is negative ({}); check margin and growth assumptions",
            result.enterprise_value
        ));
    } else if let Some(tv_share) = result
        .present_value_of_terminal_value
        .checked_div(result.enterprise_value)
    {
        if tv_share > TERMINAL_VALUE_WARNING_SHARE {
            warnings.push(format!(
                "Terminal value represents {:.1}% of enterprise value; consider extending the explicit forecast period",
                tv_share.saturating_mul(dec!(100))
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Simplified FCF DCF (after-tax EBIT, Gordon terminal value)",
        assumptions,
        warnings,
        elapsed,
        result,
    ))
}

/// Check the assumptions a valuation cannot proceed without.
pub fn validate_assumptions(assumptions: &ValuationAssumptions) -> FinDashResult<()> {
    validate_shape(assumptions)?;
    validate_rates(assumptions.wacc_pct, assumptions.terminal_growth_pct)
}

/// Horizon and share count only; rate validity is checked per call.
pub(crate) fn validate_shape(assumptions: &ValuationAssumptions) -> FinDashResult<()> {
    if assumptions.projection_years <= 0 {
        return Err(AssumptionViolation::ProjectionYearsMustBePositive.into());
    }
    if assumptions.shares_outstanding <= Decimal::ZERO {
        return Err(AssumptionViolation::SharesMustBePositive.into());
    }
    Ok(())
}

fn validate_rates(wacc_pct: Percent, terminal_growth_pct: Percent) -> FinDashResult<()> {
    if wacc_pct <= terminal_growth_pct {
        return Err(AssumptionViolation::WaccMustExceedTerminalGrowth.into());
    }
    if wacc_pct <= dec!(-100) {
        return Err(AssumptionViolation::WaccMustExceedNegative100Pct.into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn project_cash_flows(
    base_revenue: Money,
    rates: &Rates,
    n_years: i32,
) -> FinDashResult<Vec<ProjectedYear>> {
    let mut projections = Vec::with_capacity(n_years as usize);

    for year in 1..=n_years {
        let growth_factor = (Decimal::ONE + rates.growth)
            .checked_powi(i64::from(year))
            .ok_or_else(|| overflow("revenue growth factor"))?;
        let revenue = base_revenue
            .checked_mul(growth_factor)
            .ok_or_else(|| overflow("projected revenue"))?;
        let ebit = revenue
            .checked_mul(rates.margin)
            .ok_or_else(|| overflow("operating profit"))?;
        let free_cash_flow = ebit
            .checked_mul(Decimal::ONE - rates.tax)
            .ok_or_else(|| overflow("free cash flow"))?;
        let present_value = free_cash_flow
            .checked_div(discount_factor(rates.wacc, year)?)
            .ok_or_else(|| overflow("present value"))?;

        projections.push(ProjectedYear {
            year,
            revenue,
            free_cash_flow,
            present_value,
        });
    }

    Ok(projections)
}

/// (1 + wacc)^year; positive because wacc > -100% is validated up front.
fn discount_factor(wacc: Rate, year: i32) -> FinDashResult<Decimal> {
    (Decimal::ONE + wacc)
        .checked_powi(i64::from(year))
        .ok_or_else(|| overflow("discount factor"))
}

fn overflow(context: &str) -> FinDashError {
    FinDashError::ArithmeticOverflow {
        context: context.into(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
