use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use findash_core::valuation::{
    self, run_sensitivity, run_valuation, ValuationAssumptions, DEFAULT_CURRENT_PRICE,
    SENSITIVITY_DELTAS,
};
use findash_core::round_dp;

use crate::input;

/// DCF assumptions. Flags override the input document, which overrides the
/// dashboard preset. Rates are percentage points (9.5 = 9.5%).
#[derive(Args, Debug, Clone)]
#[command(allow_hyphen_values = true)]
pub struct AssumptionArgs {
    /// Path to a JSON or YAML assumptions file
    #[arg(long)]
    pub input: Option<String>,

    /// Base-year revenue
    #[arg(long)]
    pub revenue: Option<Decimal>,

    /// Annual revenue growth (%)
    #[arg(long)]
    pub growth: Option<Decimal>,

    /// EBIT margin (%)
    #[arg(long)]
    pub margin: Option<Decimal>,

    /// Tax rate (%)
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Discount rate (%)
    #[arg(long)]
    pub wacc: Option<Decimal>,

    /// Terminal growth (%)
    #[arg(long)]
    pub terminal_growth: Option<Decimal>,

    /// Shares outstanding
    #[arg(long)]
    pub shares: Option<Decimal>,

    /// Explicit forecast years
    #[arg(long)]
    pub years: Option<i32>,
}

impl AssumptionArgs {
    pub fn resolve(&self) -> Result<ValuationAssumptions, Box<dyn std::error::Error>> {
        let mut a: ValuationAssumptions =
            input::load(self.input.as_deref())?.unwrap_or_default();

        if let Some(v) = self.revenue {
            a.revenue = v;
        }
        if let Some(v) = self.growth {
            a.revenue_growth_pct = v;
        }
        if let Some(v) = self.margin {
            a.ebit_margin_pct = v;
        }
        if let Some(v) = self.tax_rate {
            a.tax_rate_pct = v;
        }
        if let Some(v) = self.wacc {
            a.wacc_pct = v;
        }
        if let Some(v) = self.terminal_growth {
            a.terminal_growth_pct = v;
        }
        if let Some(v) = self.shares {
            a.shares_outstanding = v;
        }
        if let Some(v) = self.years {
            a.projection_years = v;
        }
        Ok(a)
    }
}

/// Arguments for the DCF valuation
#[derive(Args)]
pub struct DcfArgs {
    #[command(flatten)]
    pub assumptions: AssumptionArgs,
}

/// Arguments for the valuation status check
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct StatusArgs {
    #[command(flatten)]
    pub assumptions: AssumptionArgs,

    /// Current market price per share
    #[arg(long, default_value_t = DEFAULT_CURRENT_PRICE)]
    pub price: Decimal,

    /// Classify this value instead of running the DCF
    #[arg(long)]
    pub intrinsic_value: Option<Decimal>,
}

/// Arguments for the WACC x terminal growth grid
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SensitivityArgs {
    #[command(flatten)]
    pub assumptions: AssumptionArgs,

    /// Current market price per share
    #[arg(long, default_value_t = DEFAULT_CURRENT_PRICE)]
    pub price: Decimal,

    /// Comma-separated perturbations in percentage points (odd count, symmetric)
    #[arg(long, value_delimiter = ',')]
    pub deltas: Option<Vec<Decimal>>,
}

pub fn run_dcf(args: DcfArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions = args.assumptions.resolve()?;
    let result = run_valuation(&assumptions)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_status(args: StatusArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let intrinsic = match args.intrinsic_value {
        Some(v) => v,
        None => {
            let assumptions = args.assumptions.resolve()?;
            valuation::compute_valuation(&assumptions)?.intrinsic_value_per_share
        }
    };
    let assessment = valuation::classify(intrinsic, args.price)?;
    Ok(serde_json::json!({
        "result": {
            "intrinsic_value_per_share": intrinsic,
            "current_price": args.price,
            "percent_difference": round_dp(assessment.percent_difference, 2),
            "status": assessment.label,
        }
    }))
}

pub fn run_sensitivity_grid(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions = args.assumptions.resolve()?;
    let deltas = args.deltas.unwrap_or_else(|| SENSITIVITY_DELTAS.to_vec());
    let out = run_sensitivity(&assumptions, args.price, &deltas)?;

    // Flatten the grid so table/csv output gets one row per cell.
    let rows: Vec<Value> = out
        .result
        .cells
        .iter()
        .flatten()
        .map(|c| {
            serde_json::json!({
                "wacc_pct": c.wacc_pct,
                "terminal_growth_pct": c.terminal_growth_pct,
                "intrinsic_value": c.intrinsic_value.map_or_else(|| "N/A".to_string(), |v| v.to_string()),
                "percent_difference": c.percent_difference.map(|p| round_dp(p, 2)),
                "base_case": c.is_base_case,
            })
        })
        .collect();

    let mut value = serde_json::to_value(&out)?;
    if let Some(map) = value.as_object_mut() {
        map.insert("results".into(), Value::Array(rows));
    }
    Ok(value)
}
