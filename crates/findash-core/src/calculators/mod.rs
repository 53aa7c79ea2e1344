//! Stand-alone finance calculators from the dashboard's tools page.
//!
//! Every calculator takes percentage-point inputs where the dashboard does
//! and returns figures rounded to 2 dp.

pub mod growth;
pub mod lending;
pub mod ratios;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinDashError;
use crate::types::{with_metadata, ComputationOutput};
use crate::FinDashResult;

pub use growth::{
    cagr, compound_interest, roi, CagrInput, CagrOutput, CompoundInterestInput,
    CompoundInterestOutput, CompoundingFrequency, RoiInput, RoiOutput,
};
pub use lending::{loan_emi, LoanInput, LoanOutput};
pub use ratios::{
    break_even, debt_to_equity, pe_ratio, profit_margin, BreakEvenInput, BreakEvenOutput,
    DebtEquityHealth, DebtToEquityInput, DebtToEquityOutput, PeInput, PeOutput, PeValuation,
    ProfitMarginInput, ProfitMarginOutput,
};

/// A calculator invocation, tagged by `calculator`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculatorRequest {
    CompoundInterest(CompoundInterestInput),
    Cagr(CagrInput),
    Roi(RoiInput),
    PeRatio(PeInput),
    LoanEmi(LoanInput),
    ProfitMargin(ProfitMarginInput),
    DebtToEquity(DebtToEquityInput),
    BreakEven(BreakEvenInput),
}

impl CalculatorRequest {
    pub fn methodology(&self) -> &'static str {
        match self {
            CalculatorRequest::CompoundInterest(_) => "Compound interest: P(1 + r/n)^(nt)",
            CalculatorRequest::Cagr(_) => "CAGR: (final / initial)^(1 / years) - 1",
            CalculatorRequest::Roi(_) => "Return on investment: profit / investment",
            CalculatorRequest::PeRatio(_) => "Price / earnings multiple",
            CalculatorRequest::LoanEmi(_) => "Amortising loan instalment (monthly)",
            CalculatorRequest::ProfitMargin(_) => "Net profit margin",
            CalculatorRequest::DebtToEquity(_) => "Debt-to-equity ratio",
            CalculatorRequest::BreakEven(_) => "Break-even units: fixed costs / contribution",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalculatorOutput {
    CompoundInterest(CompoundInterestOutput),
    Cagr(CagrOutput),
    Roi(RoiOutput),
    PeRatio(PeOutput),
    LoanEmi(LoanOutput),
    ProfitMargin(ProfitMarginOutput),
    DebtToEquity(DebtToEquityOutput),
    BreakEven(BreakEvenOutput),
}

/// Dispatch a request to its calculator.
pub fn calculate(request: &CalculatorRequest) -> FinDashResult<CalculatorOutput> {
    use CalculatorRequest as R;
    Ok(match request {
        R::CompoundInterest(i) => CalculatorOutput::CompoundInterest(compound_interest(i)?),
        R::Cagr(i) => CalculatorOutput::Cagr(cagr(i)?),
        R::Roi(i) => CalculatorOutput::Roi(roi(i)?),
        R::PeRatio(i) => CalculatorOutput::PeRatio(pe_ratio(i)?),
        R::LoanEmi(i) => CalculatorOutput::LoanEmi(loan_emi(i)?),
        R::ProfitMargin(i) => CalculatorOutput::ProfitMargin(profit_margin(i)?),
        R::DebtToEquity(i) => CalculatorOutput::DebtToEquity(debt_to_equity(i)?),
        R::BreakEven(i) => CalculatorOutput::BreakEven(break_even(i)?),
    })
}

/// `calculate` wrapped in the standard output envelope.
pub fn run_calculator(
    request: &CalculatorRequest,
) -> FinDashResult<ComputationOutput<CalculatorOutput>> {
    let start = Instant::now();
    let result = calculate(request)?;
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        request.methodology(),
        request,
        Vec::new(),
        elapsed,
        result,
    ))
}

pub(crate) fn overflow(context: &str) -> FinDashError {
    FinDashError::ArithmeticOverflow {
        context: context.into(),
    }
}

pub(crate) fn require_positive(field: &str, value: Decimal) -> FinDashResult<()> {
    if value <= Decimal::ZERO {
        return Err(FinDashError::InvalidInput {
            field: field.into(),
            reason: "Must be greater than zero".into(),
        });
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &str, value: Decimal) -> FinDashResult<()> {
    if value < Decimal::ZERO {
        return Err(FinDashError::InvalidInput {
            field: field.into(),
            reason: "Must not be negative".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tagged_request_dispatch() {
        let json = r#"{ "calculator": "pe_ratio", "price": 150, "eps": 5 }"#;
        let req: CalculatorRequest = serde_json::from_str(json).unwrap();
        let out = run_calculator(&req).unwrap();
        match out.result {
            CalculatorOutput::PeRatio(pe) => {
                assert_eq!(pe.pe_ratio, dec!(30));
                assert_eq!(pe.valuation, PeValuation::Overvalued);
            }
            other => panic!("unexpected output {other:?}"),
        }
        assert_eq!(out.assumptions["calculator"], "pe_ratio");
    }

    #[test]
    fn test_errors_carry_field() {
        let req = CalculatorRequest::Roi(RoiInput {
            investment: Decimal::ZERO,
            final_value: dec!(10),
        });
        match calculate(&req) {
            Err(FinDashError::InvalidInput { field, .. }) => assert_eq!(field, "investment"),
            other => panic!("expected invalid input, got {other:?}"),
        }
    }
}
