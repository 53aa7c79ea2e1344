use findash_core::portfolio::correlation::DiversificationRating;
use findash_core::portfolio::risk::{RiskLevel, Severity};
use findash_core::portfolio::universe::{self, Sector, StockRisk};
use findash_core::portfolio::{
    analyze_correlation, analyze_portfolio, run_portfolio_analysis, CorrelationInput,
    HoldingsBook, PortfolioAssumptions, RiskLabel, RiskTolerance,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn diversified() -> HoldingsBook {
    let mut book = HoldingsBook::new();
    // 2000 each across six sectors
    for (symbol, shares, price) in [
        ("MSFT", dec!(5), dec!(400)),
        ("JNJ", dec!(10), dec!(200)),
        ("JPM", dec!(10), dec!(200)),
        ("KO", dec!(40), dec!(50)),
        ("XOM", dec!(20), dec!(100)),
        ("HON", dec!(10), dec!(200)),
    ] {
        book.add(symbol, shares, price).unwrap();
    }
    book
}

#[test]
fn test_diversified_portfolio_is_quiet() {
    let a = analyze_portfolio(&diversified(), &PortfolioAssumptions::default()).unwrap();

    assert_eq!(a.total_value, dec!(12000));
    assert_eq!(a.sector_allocation.len(), 6);
    assert!(a.sector_allocation.iter().all(|s| s.amount == dec!(2000)));
    // mean of 0.92, 0.55, 1.15, 0.58, 0.92, 1.02
    assert_eq!(a.beta.round_dp(4), dec!(0.8567));
    assert_eq!(a.risk_level, RiskLevel::Low);
    assert!(a.alerts.is_empty(), "unexpected alerts: {:?}", a.alerts);
}

#[test]
fn test_concentrated_tech_portfolio_alerts() {
    let mut book = HoldingsBook::new();
    book.add("NVDA", dec!(10), dec!(900)).unwrap();
    book.add("AMD", dec!(20), dec!(150)).unwrap();

    let a = analyze_portfolio(&book, &PortfolioAssumptions::default()).unwrap();
    assert_eq!(a.max_concentration, dec!(100));
    assert!(a.beta > dec!(1.7));
    assert_eq!(a.risk_level, RiskLevel::High);

    let high = a.alerts.iter().filter(|x| x.severity == Severity::High).count();
    assert_eq!(high, 2);
    assert!(a.alerts.iter().any(|x| x.title == "Elevated Volatility"));
    assert!(a.alerts.iter().any(|x| x.title == "Limited Diversification"));
}

#[test]
fn test_merging_positions_changes_weights() {
    let mut book = HoldingsBook::new();
    book.add("KO", dec!(10), dec!(60)).unwrap();
    book.add("TSLA", dec!(1), dec!(600)).unwrap();
    let before = analyze_portfolio(&book, &PortfolioAssumptions::default()).unwrap();

    book.add("KO", dec!(10), dec!(60)).unwrap();
    let after = analyze_portfolio(&book, &PortfolioAssumptions::default()).unwrap();

    assert_eq!(book.len(), 2);
    assert!(after.beta < before.beta);
    assert_eq!(after.sector_allocation[0].sector, Sector::Consumer);
}

#[test]
fn test_sharpe_uses_assumptions() {
    let mut book = HoldingsBook::new();
    book.add("PG", dec!(10), dec!(150)).unwrap();
    let a = analyze_portfolio(
        &book,
        &PortfolioAssumptions {
            expected_return: dec!(0.10),
            risk_free_rate: dec!(0.04),
        },
    )
    .unwrap();
    // 0.06 / 0.12
    assert_eq!(a.sharpe_ratio, dec!(0.5));
}

#[test]
fn test_envelope_for_empty_portfolio() {
    let out = run_portfolio_analysis(&HoldingsBook::new(), &PortfolioAssumptions::default())
        .unwrap();
    assert_eq!(out.result.total_value, Decimal::ZERO);
    assert_eq!(out.warnings, vec!["Portfolio has no holdings".to_string()]);
}

#[test]
fn test_tolerance_applied_to_analysis_score() {
    let a = analyze_portfolio(&diversified(), &PortfolioAssumptions::default()).unwrap();
    for tolerance in RiskTolerance::ALL {
        assert_eq!(tolerance.label_risk(a.risk_score), RiskLabel::LowRisk);
        assert!(!tolerance.is_concerning(a.risk_score));
    }
}

#[test]
fn test_universe_search_and_tiers() {
    let hits = universe::search("bank");
    assert!(hits.iter().all(|p| p.sector == Sector::Financial));
    assert!(hits.len() >= 4);
    assert_eq!(universe::lookup("ba").unwrap().risk(), StockRisk::High);
}

#[test]
fn test_correlation_from_json() {
    let input: CorrelationInput = serde_json::from_str(
        r#"{
            "assets": ["AAPL", "MSFT", "XOM"],
            "matrix": [[1, 0.8, 0.3], [0.8, 1, 0.2], [0.3, 0.2, 1]]
        }"#,
    )
    .unwrap();
    let a = analyze_correlation(&input).unwrap();
    // (0.8 + 0.3 + 0.2) / 3
    assert_eq!(a.average_correlation.round_dp(4), dec!(0.4333));
    assert_eq!(a.rating, DiversificationRating::Moderate);
    let top = a.max_pair.unwrap();
    assert_eq!((top.first.as_str(), top.second.as_str()), ("AAPL", "MSFT"));
}
