use findash_core::scenarios::{compare_scenarios, run_scenario_comparison, ScenarioBook, ScenarioKind};
use findash_core::valuation::{compute_valuation, ValuationAssumptions, ValuationStatus};
use findash_core::FinDashError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn with_growth(growth: Decimal, margin: Decimal) -> ValuationAssumptions {
    ValuationAssumptions {
        revenue_growth_pct: growth,
        ebit_margin_pct: margin,
        ..ValuationAssumptions::default()
    }
}

#[test]
fn test_full_book_comparison() {
    let mut book = ScenarioBook::new();
    book.save(ScenarioKind::Bear, &with_growth(dec!(3), dec!(20)));
    book.save(ScenarioKind::Base, &ValuationAssumptions::default());
    book.save(ScenarioKind::Bull, &with_growth(dec!(20), dec!(33)));

    let out = run_scenario_comparison(&book, dec!(185.50)).unwrap();
    assert!(out.warnings.is_empty());

    let cmp = out.result;
    assert_eq!(cmp.outcomes.len(), 3);
    let labels: Vec<_> = cmp.outcomes.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["Bear Case", "Base Case", "Bull Case"]);

    let base = cmp.outcomes[1].assessment.as_ref().unwrap();
    assert_eq!(base.status, ValuationStatus::Undervalued);

    let highest = cmp.highest_value.unwrap();
    let lowest = cmp.lowest_value.unwrap();
    assert_eq!(
        highest,
        cmp.outcomes[2].valuation.as_ref().unwrap().intrinsic_value_per_share
    );
    assert_eq!(
        lowest,
        cmp.outcomes[0].valuation.as_ref().unwrap().intrinsic_value_per_share
    );
    assert_eq!(cmp.spread, Some(highest - lowest));
}

#[test]
fn test_loaded_assumptions_reproduce_valuation() {
    let mut book = ScenarioBook::new();
    let bull = with_growth(dec!(15), dec!(30));
    book.save(ScenarioKind::Bull, &bull);

    let loaded = book.load(ScenarioKind::Bull).unwrap().clone();
    assert_eq!(
        compute_valuation(&loaded).unwrap(),
        compute_valuation(&bull).unwrap()
    );
}

#[test]
fn test_partial_book_only_values_saved_slots() {
    let mut book = ScenarioBook::new();
    book.save(ScenarioKind::Bull, &with_growth(dec!(15), dec!(30)));

    let cmp = compare_scenarios(&book, dec!(185.50)).unwrap();
    assert_eq!(cmp.outcomes.len(), 1);
    assert_eq!(cmp.outcomes[0].kind, ScenarioKind::Bull);
    assert_eq!(cmp.spread, Some(Decimal::ZERO));
}

#[test]
fn test_book_serialises_round_trip() {
    let mut book = ScenarioBook::new();
    book.save(ScenarioKind::Base, &ValuationAssumptions::default());
    let json = serde_json::to_string(&book).unwrap();
    let back: ScenarioBook = serde_json::from_str(&json).unwrap();
    assert_eq!(back, book);
    assert!(!back.is_saved(ScenarioKind::Bear));
}

#[test]
fn test_non_positive_price_rejected() {
    let mut book = ScenarioBook::new();
    book.save(ScenarioKind::Base, &ValuationAssumptions::default());
    let err = compare_scenarios(&book, Decimal::ZERO).unwrap_err();
    assert!(matches!(err, FinDashError::InvalidAssumption(_)));
}
