use findash_core::calculators::{
    break_even, cagr, calculate, compound_interest, debt_to_equity, loan_emi, run_calculator,
    BreakEvenInput, CagrInput, CalculatorOutput, CalculatorRequest, CompoundInterestInput,
    CompoundingFrequency, DebtEquityHealth, DebtToEquityInput, LoanInput,
};
use findash_core::FinDashError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Growth
// ===========================================================================

#[test]
fn test_compound_interest_quarterly() {
    let out = compound_interest(&CompoundInterestInput {
        principal: dec!(1000),
        rate_pct: dec!(4),
        years: dec!(1),
        frequency: CompoundingFrequency::Quarterly,
    })
    .unwrap();
    // 1000 * 1.01^4 = 1040.604
    assert_eq!(out.amount, dec!(1040.60));
    assert_eq!(out.interest, dec!(40.60));
}

#[test]
fn test_compound_interest_fractional_years() {
    let out = compound_interest(&CompoundInterestInput {
        principal: dec!(1000),
        rate_pct: dec!(10),
        years: dec!(0.5),
        frequency: CompoundingFrequency::Annually,
    })
    .unwrap();
    // sqrt(1.1) = 1.0488088
    assert_eq!(out.amount, dec!(1048.81));
}

#[test]
fn test_compound_interest_zero_rate() {
    let out = compound_interest(&CompoundInterestInput {
        principal: dec!(2500),
        rate_pct: Decimal::ZERO,
        years: dec!(10),
        frequency: CompoundingFrequency::Daily,
    })
    .unwrap();
    assert_eq!(out.amount, dec!(2500));
    assert_eq!(out.interest, Decimal::ZERO);
}

#[test]
fn test_cagr_declining_investment() {
    let out = cagr(&CagrInput {
        initial_value: dec!(1000),
        final_value: dec!(810),
        years: dec!(2),
    })
    .unwrap();
    // 0.81^(1/2) = 0.9
    assert_eq!(out.cagr_pct, dec!(-10));
}

// ===========================================================================
// Lending and ratios
// ===========================================================================

#[test]
fn test_emi_from_json_request() {
    let req: CalculatorRequest = serde_json::from_str(
        r#"{ "calculator": "loan_emi", "principal": 500000, "annual_rate_pct": 8, "years": 20 }"#,
    )
    .unwrap();
    match calculate(&req).unwrap() {
        CalculatorOutput::LoanEmi(out) => assert_eq!(out.emi, dec!(4182.20)),
        other => panic!("unexpected output {other:?}"),
    }
}

#[test]
fn test_longer_tenure_lowers_emi_raises_interest() {
    let short = loan_emi(&LoanInput {
        principal: dec!(200000),
        annual_rate_pct: dec!(7),
        years: 10,
    })
    .unwrap();
    let long = loan_emi(&LoanInput {
        principal: dec!(200000),
        annual_rate_pct: dec!(7),
        years: 30,
    })
    .unwrap();
    assert!(long.emi < short.emi);
    assert!(long.total_interest > short.total_interest);
}

#[test]
fn test_debt_to_equity_requires_equity() {
    let err = debt_to_equity(&DebtToEquityInput {
        total_debt: dec!(100),
        total_equity: Decimal::ZERO,
    })
    .unwrap_err();
    assert!(matches!(err, FinDashError::InvalidInput { ref field, .. } if field == "total_equity"));

    let ok = debt_to_equity(&DebtToEquityInput {
        total_debt: dec!(300),
        total_equity: dec!(100),
    })
    .unwrap();
    assert_eq!(ok.ratio, dec!(3));
    assert_eq!(ok.health, DebtEquityHealth::HighRisk);
}

#[test]
fn test_break_even_envelope() {
    let out = run_calculator(&CalculatorRequest::BreakEven(BreakEvenInput {
        fixed_costs: dec!(50000),
        price_per_unit: dec!(100),
        cost_per_unit: dec!(60),
    }))
    .unwrap();
    assert_eq!(out.assumptions["calculator"], "break_even");
    assert!(out.warnings.is_empty());
    assert_eq!(
        out.result,
        CalculatorOutput::BreakEven(
            break_even(&BreakEvenInput {
                fixed_costs: dec!(50000),
                price_per_unit: dec!(100),
                cost_per_unit: dec!(60),
            })
            .unwrap()
        )
    );
}

#[test]
fn test_emi_tenure_too_long_for_months() {
    let err = loan_emi(&LoanInput {
        principal: dec!(1000),
        annual_rate_pct: Decimal::ZERO,
        years: 400_000_000,
    })
    .unwrap_err();
    match err {
        FinDashError::InvalidInput { field, .. } => assert_eq!(field, "years"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_emi_overflow_is_reported() {
    let result = loan_emi(&LoanInput {
        principal: dec!(10000000000000000000000000000),
        annual_rate_pct: dec!(100),
        years: 30,
    });
    assert!(matches!(result, Err(FinDashError::ArithmeticOverflow { .. })));
}

#[test]
fn test_tenure_overflow_through_json_request() {
    let req: CalculatorRequest = serde_json::from_str(
        r#"{ "calculator": "loan_emi", "principal": 1000, "annual_rate_pct": 0, "years": 400000000 }"#,
    )
    .unwrap();
    assert!(matches!(calculate(&req), Err(FinDashError::InvalidInput { .. })));
}
