use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use findash_core::portfolio::universe;
use findash_core::portfolio::{
    run_correlation_analysis, run_portfolio_analysis, CorrelationInput, Holding, HoldingsBook,
    PortfolioAssumptions, RiskTolerance,
};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ToleranceArg {
    Conservative,
    Moderate,
    Aggressive,
}

impl From<ToleranceArg> for RiskTolerance {
    fn from(t: ToleranceArg) -> Self {
        match t {
            ToleranceArg::Conservative => RiskTolerance::Conservative,
            ToleranceArg::Moderate => RiskTolerance::Moderate,
            ToleranceArg::Aggressive => RiskTolerance::Aggressive,
        }
    }
}

/// Arguments for portfolio risk analysis
#[derive(Args)]
pub struct PortfolioArgs {
    /// JSON or YAML list of holdings ({symbol, shares, avg_price})
    #[arg(long)]
    pub input: Option<String>,

    /// Holding as SYMBOL:SHARES:PRICE; repeatable
    #[arg(long = "holding")]
    pub holdings: Vec<String>,

    /// Risk appetite used to label the composite score
    #[arg(long, value_enum, default_value = "moderate")]
    pub tolerance: ToleranceArg,

    /// Expected portfolio return (fraction)
    #[arg(long)]
    pub expected_return: Option<Decimal>,

    /// Risk-free rate (fraction)
    #[arg(long)]
    pub risk_free_rate: Option<Decimal>,
}

/// Arguments for correlation analysis
#[derive(Args)]
pub struct CorrelationArgs {
    /// JSON or YAML file with `assets` and a square `matrix`
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the stock universe search
#[derive(Args)]
pub struct SearchArgs {
    /// Symbol or company name fragment
    pub query: String,
}

pub fn run_portfolio(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut book = HoldingsBook::new();

    let listed: Vec<Holding> = if args.input.is_some() || args.holdings.is_empty() {
        input::load(args.input.as_deref())?.unwrap_or_default()
    } else {
        Vec::new()
    };
    for h in &listed {
        book.add(&h.symbol, h.shares, h.avg_price)?;
    }
    for entry in &args.holdings {
        let (symbol, shares, price) = parse_holding(entry)?;
        book.add(symbol, shares, price)?;
    }

    let mut assumptions = PortfolioAssumptions::default();
    if let Some(r) = args.expected_return {
        assumptions.expected_return = r;
    }
    if let Some(r) = args.risk_free_rate {
        assumptions.risk_free_rate = r;
    }

    let out = run_portfolio_analysis(&book, &assumptions)?;
    let tolerance = RiskTolerance::from(args.tolerance);
    let score = out.result.risk_score;

    let mut value = serde_json::to_value(&out)?;
    if let Some(result) = value.get_mut("result").and_then(Value::as_object_mut) {
        result.insert("risk_tolerance".into(), serde_json::to_value(tolerance)?);
        result.insert(
            "risk_label".into(),
            Value::String(tolerance.label_risk(score).label().into()),
        );
        result.insert(
            "exceeds_tolerance".into(),
            Value::Bool(tolerance.is_concerning(score)),
        );
    }
    Ok(value)
}

pub fn run_correlation(args: CorrelationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data: CorrelationInput = input::load(args.input.as_deref())?
        .ok_or("--input is required (or pipe a correlation matrix on stdin)")?;
    let out = run_correlation_analysis(&data)?;
    Ok(serde_json::to_value(out)?)
}

pub fn run_search(args: SearchArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let hits: Vec<Value> = universe::search(&args.query)
        .into_iter()
        .map(|p| {
            serde_json::json!({
                "symbol": p.symbol,
                "name": p.name,
                "sector": p.sector.label(),
                "beta": p.beta,
                "volatility": p.volatility,
                "dividend_yield": p.dividend_yield,
                "risk": p.risk(),
            })
        })
        .collect();
    Ok(Value::Array(hits))
}

fn parse_holding(entry: &str) -> Result<(&str, Decimal, Decimal), Box<dyn std::error::Error>> {
    let parts: Vec<&str> = entry.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("Holding must be SYMBOL:SHARES:PRICE, got '{entry}'").into());
    }
    Ok((parts[0], parts[1].parse()?, parts[2].parse()?))
}
