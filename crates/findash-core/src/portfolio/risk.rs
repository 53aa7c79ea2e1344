use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::bands::{lookup, Band, Cmp};
use crate::error::FinDashError;
use crate::types::*;
use crate::FinDashResult;

use super::holdings::HoldingsBook;
use super::universe::{Sector, DEFAULT_BETA, DEFAULT_DIVIDEND_YIELD, DEFAULT_VOLATILITY};

/// Market assumptions behind the Sharpe ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAssumptions {
    #[serde(default = "default_expected_return")]
    pub expected_return: Rate,
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: Rate,
}

fn default_expected_return() -> Rate {
    dec!(0.12)
}

fn default_risk_free_rate() -> Rate {
    dec!(0.05)
}

impl Default for PortfolioAssumptions {
    fn default() -> Self {
        Self {
            expected_return: default_expected_return(),
            risk_free_rate: default_risk_free_rate(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Composite score bands. Anything above the last band is high.
pub const RISK_LEVEL_BANDS: [Band<RiskLevel>; 2] = [
    Band::new(Cmp::AtMost, dec!(3), RiskLevel::Low),
    Band::new(Cmp::AtMost, dec!(6), RiskLevel::Medium),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAlert {
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorWeight {
    pub sector: Sector,
    pub amount: Money,
    /// Share of total value in percentage points
    pub weight_pct: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    pub total_value: Money,
    pub holdings_count: usize,
    /// Value-weighted beta
    pub beta: Decimal,
    /// Value-weighted volatility (no correlation effects)
    pub volatility: Rate,
    pub sharpe_ratio: Decimal,
    /// Composite 0-10 score, 1 dp
    pub risk_score: Decimal,
    pub risk_level: RiskLevel,
    /// Largest sector first
    pub sector_allocation: Vec<SectorWeight>,
    pub max_concentration: Percent,
    /// Value-weighted dividend yield in percentage points
    pub dividend_yield: Percent,
    pub alerts: Vec<RiskAlert>,
}

/// Compute value-weighted risk metrics and alerts for a set of holdings.
pub fn analyze_portfolio(
    book: &HoldingsBook,
    assumptions: &PortfolioAssumptions,
) -> FinDashResult<PortfolioAnalysis> {
    let mut total_value = Decimal::ZERO;
    for h in book.holdings() {
        total_value = total_value
            .checked_add(h.value()?)
            .ok_or_else(|| FinDashError::ArithmeticOverflow {
                context: "total portfolio value".into(),
            })?;
    }

    let mut beta = Decimal::ZERO;
    let mut volatility = Decimal::ZERO;
    let mut dividend_yield = Decimal::ZERO;
    let mut by_sector: BTreeMap<Sector, Money> = BTreeMap::new();

    for h in book.holdings() {
        let profile = h.profile();
        let value = h.value()?;
        let sector_total = by_sector
            .entry(profile.map_or(Sector::Other, |p| p.sector))
            .or_default();
        *sector_total = sector_total
            .checked_add(value)
            .ok_or_else(|| FinDashError::ArithmeticOverflow {
                context: "sector allocation".into(),
            })?;

        if total_value.is_zero() {
            continue;
        }
        let weight = value
            .checked_div(total_value)
            .ok_or_else(|| FinDashError::ArithmeticOverflow {
                context: "holding weight".into(),
            })?;
        beta += weight * profile.map_or(DEFAULT_BETA, |p| p.beta);
        volatility += weight * profile.map_or(DEFAULT_VOLATILITY, |p| p.volatility);
        dividend_yield += weight * profile.map_or(DEFAULT_DIVIDEND_YIELD, |p| p.dividend_yield);
    }

    let mut sector_allocation: Vec<SectorWeight> = by_sector
        .into_iter()
        .map(|(sector, amount)| SectorWeight {
            sector,
            amount,
            weight_pct: if total_value.is_zero() {
                Decimal::ZERO
            } else {
                amount / total_value * dec!(100)
            },
        })
        .collect();
    sector_allocation.sort_by(|a, b| b.weight_pct.cmp(&a.weight_pct));
    let max_concentration = sector_allocation
        .first()
        .map_or(Decimal::ZERO, |s| s.weight_pct);

    let sharpe_ratio = if volatility.is_zero() {
        Decimal::ZERO
    } else {
        (assumptions.expected_return - assumptions.risk_free_rate) / volatility
    };
    let risk_score = risk_score(beta, volatility, max_concentration);
    let risk_level = lookup(risk_score, &RISK_LEVEL_BANDS, RiskLevel::High);

    let mut analysis = PortfolioAnalysis {
        total_value,
        holdings_count: book.len(),
        beta,
        volatility,
        sharpe_ratio,
        risk_score,
        risk_level,
        sector_allocation,
        max_concentration,
        dividend_yield,
        alerts: Vec::new(),
    };
    analysis.alerts = risk_alerts(&analysis);

    tracing::debug!(
        holdings = analysis.holdings_count,
        %total_value,
        %risk_score,
        alerts = analysis.alerts.len(),
        "portfolio analysed"
    );

    Ok(analysis)
}

/// `analyze_portfolio` wrapped in the standard output envelope.
pub fn run_portfolio_analysis(
    book: &HoldingsBook,
    assumptions: &PortfolioAssumptions,
) -> FinDashResult<ComputationOutput<PortfolioAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let analysis = analyze_portfolio(book, assumptions)?;

    if book.is_empty() {
        warnings.push("Portfolio has no holdings".into());
    }
    for h in book.holdings() {
        if h.profile().is_none() {
            warnings.push(format!(
                "{} is not in the reference universe; default beta, volatility and yield used",
                h.symbol
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Value-weighted portfolio risk (beta, volatility, sector concentration)",
        &serde_json::json!({
            "holdings": book,
            "assumptions": assumptions,
        }),
        warnings,
        elapsed,
        analysis,
    ))
}

/// min(10, (min(3 * beta, 10) + 20 * volatility + concentration / 10) / 3), 1 dp.
pub fn risk_score(beta: Decimal, volatility: Rate, max_concentration: Percent) -> Decimal {
    let beta_score = (beta * dec!(3)).min(dec!(10));
    let vol_score = volatility * dec!(20);
    let conc_score = max_concentration / dec!(100) * dec!(10);
    round_dp(((beta_score + vol_score + conc_score) / dec!(3)).min(dec!(10)), 1)
}

fn risk_alerts(a: &PortfolioAnalysis) -> Vec<RiskAlert> {
    let mut alerts = Vec::new();
    let count = a.holdings_count;

    if a.max_concentration > dec!(40) {
        let sector = a
            .sector_allocation
            .first()
            .map_or("Other", |s| s.sector.label());
        alerts.push(alert(
            Severity::High,
            "High Sector Concentration",
            format!("{sector} sector is {:.1}% of portfolio", a.max_concentration),
            "Consider diversifying into other sectors",
        ));
    }
    if a.beta > dec!(1.3) {
        alerts.push(alert(
            Severity::High,
            "High Portfolio Beta",
            format!(
                "Portfolio beta of {:.2} indicates higher market sensitivity",
                a.beta
            ),
            "Add defensive stocks to reduce beta",
        ));
    }
    if a.volatility > dec!(0.35) {
        alerts.push(alert(
            Severity::Medium,
            "Elevated Volatility",
            format!(
                "Portfolio volatility of {:.1}% is above average",
                a.volatility * dec!(100)
            ),
            "Include low-volatility stocks for stability",
        ));
    }
    if count > 0 && count < 5 {
        alerts.push(alert(
            Severity::Medium,
            "Limited Diversification",
            format!("Only {count} holdings may not provide adequate diversification"),
            "Aim for 10-15 holdings across different sectors",
        ));
    }
    if count > 0 && a.dividend_yield < Decimal::ONE {
        alerts.push(alert(
            Severity::Low,
            "Low Dividend Yield",
            format!("Portfolio dividend yield of {:.2}% is low", a.dividend_yield),
            "Consider adding dividend-paying stocks for income",
        ));
    }

    alerts
}

fn alert(severity: Severity, title: &str, message: String, recommendation: &str) -> RiskAlert {
    RiskAlert {
        severity,
        title: title.into(),
        message,
        recommendation: recommendation.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::holdings::Holding;
    use rust_decimal_macros::dec;

    fn book(entries: &[(&str, Decimal, Decimal)]) -> HoldingsBook {
        let mut b = HoldingsBook::new();
        for (s, n, p) in entries {
            b.add(s, *n, *p).unwrap();
        }
        b
    }

    #[test]
    fn test_empty_portfolio() {
        let a = analyze_portfolio(&HoldingsBook::new(), &PortfolioAssumptions::default()).unwrap();
        assert_eq!(a.total_value, Decimal::ZERO);
        assert_eq!(a.beta, Decimal::ZERO);
        assert_eq!(a.sharpe_ratio, Decimal::ZERO);
        assert_eq!(a.risk_score, Decimal::ZERO);
        assert_eq!(a.risk_level, RiskLevel::Low);
        assert!(a.sector_allocation.is_empty());
        assert!(a.alerts.is_empty());
    }

    #[test]
    fn test_single_high_beta_holding() {
        let b = book(&[("TSLA", dec!(10), dec!(100))]);
        let a = analyze_portfolio(&b, &PortfolioAssumptions::default()).unwrap();

        assert_eq!(a.total_value, dec!(1000));
        assert_eq!(a.beta, dec!(2.08));
        assert_eq!(a.volatility, dec!(0.55));
        assert_eq!(a.max_concentration, dec!(100));
        // (6.24 + 11 + 10) / 3 = 9.08
        assert_eq!(a.risk_score, dec!(9.1));
        assert_eq!(a.risk_level, RiskLevel::High);

        let titles: Vec<_> = a.alerts.iter().map(|x| x.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "High Sector Concentration",
                "High Portfolio Beta",
                "Elevated Volatility",
                "Limited Diversification",
                "Low Dividend Yield",
            ]
        );
        assert_eq!(a.alerts[0].message, "Technology sector is 100.0% of portfolio");
    }

    #[test]
    fn test_weighted_metrics_two_sectors() {
        // KO 6000, JNJ 4000
        let b = book(&[("KO", dec!(100), dec!(60)), ("JNJ", dec!(25), dec!(160))]);
        let a = analyze_portfolio(&b, &PortfolioAssumptions::default()).unwrap();

        assert_eq!(a.beta, dec!(0.568)); // 0.6*0.58 + 0.4*0.55
        assert_eq!(a.volatility, dec!(0.14));
        assert_eq!(a.dividend_yield, dec!(3.02));
        assert_eq!(a.sharpe_ratio, dec!(0.5));
        assert_eq!(a.sector_allocation[0].sector, Sector::Consumer);
        assert_eq!(a.sector_allocation[0].weight_pct, dec!(60));
        assert_eq!(a.sector_allocation[1].weight_pct, dec!(40));
    }

    #[test]
    fn test_unknown_symbol_uses_defaults() {
        let b = HoldingsBook::from(vec![Holding {
            symbol: "PRIVATE".into(),
            shares: dec!(1),
            avg_price: dec!(100),
        }]);
        let out = run_portfolio_analysis(&b, &PortfolioAssumptions::default()).unwrap();
        assert_eq!(out.result.beta, DEFAULT_BETA);
        assert_eq!(out.result.volatility, DEFAULT_VOLATILITY);
        assert_eq!(out.result.sector_allocation[0].sector, Sector::Other);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_risk_score_is_capped() {
        assert_eq!(risk_score(dec!(5), dec!(1), dec!(100)), dec!(10));
        assert_eq!(lookup(dec!(3), &RISK_LEVEL_BANDS, RiskLevel::High), RiskLevel::Low);
        assert_eq!(lookup(dec!(6), &RISK_LEVEL_BANDS, RiskLevel::High), RiskLevel::Medium);
        assert_eq!(lookup(dec!(6.1), &RISK_LEVEL_BANDS, RiskLevel::High), RiskLevel::High);
    }
}
