use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use findash_core::portfolio::{self, universe, Holding, HoldingsBook, PortfolioAssumptions};
use findash_core::scenarios::{self, ScenarioBook};
use findash_core::valuation::{self, ValuationAssumptions, DEFAULT_CURRENT_PRICE};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn default_price() -> Decimal {
    DEFAULT_CURRENT_PRICE
}

// ---------------------------------------------------------------------------
// Valuation
// ---------------------------------------------------------------------------

#[napi]
pub fn run_dcf(input_json: String) -> NapiResult<String> {
    let input: ValuationAssumptions = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = valuation::run_valuation(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct StatusRequest {
    intrinsic_value: Decimal,
    #[serde(default = "default_price")]
    current_price: Decimal,
}

#[napi]
pub fn valuation_status(input_json: String) -> NapiResult<String> {
    let input: StatusRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        valuation::classify(input.intrinsic_value, input.current_price).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct SensitivityRequest {
    #[serde(default)]
    assumptions: ValuationAssumptions,
    #[serde(default = "default_price")]
    current_price: Decimal,
    #[serde(default)]
    deltas: Option<Vec<Decimal>>,
}

#[napi]
pub fn sensitivity_grid(input_json: String) -> NapiResult<String> {
    let input: SensitivityRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let deltas = input
        .deltas
        .unwrap_or_else(|| valuation::SENSITIVITY_DELTAS.to_vec());
    let output = valuation::run_sensitivity(&input.assumptions, input.current_price, &deltas)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ScenarioRequest {
    book: ScenarioBook,
    #[serde(default = "default_price")]
    current_price: Decimal,
}

#[napi]
pub fn compare_scenarios(input_json: String) -> NapiResult<String> {
    let input: ScenarioRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = scenarios::run_scenario_comparison(&input.book, input.current_price)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Portfolio
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct PortfolioRequest {
    holdings: Vec<Holding>,
    #[serde(default)]
    assumptions: PortfolioAssumptions,
}

#[napi]
pub fn analyze_portfolio(input_json: String) -> NapiResult<String> {
    let input: PortfolioRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let mut book = HoldingsBook::new();
    for h in &input.holdings {
        book.add(&h.symbol, h.shares, h.avg_price)
            .map_err(to_napi_error)?;
    }
    let output =
        portfolio::run_portfolio_analysis(&book, &input.assumptions).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_correlation(input_json: String) -> NapiResult<String> {
    let input: portfolio::CorrelationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = portfolio::run_correlation_analysis(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn search_stocks(query: String) -> NapiResult<String> {
    let hits = universe::search(&query);
    serde_json::to_string(&hits).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Calculators
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate(input_json: String) -> NapiResult<String> {
    let input: findash_core::calculators::CalculatorRequest =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = findash_core::calculators::run_calculator(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
