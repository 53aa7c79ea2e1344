pub mod correlation;
pub mod holdings;
pub mod risk;
pub mod tolerance;
pub mod universe;

pub use correlation::{analyze_correlation, run_correlation_analysis, CorrelationInput};
pub use holdings::{Holding, HoldingsBook};
pub use risk::{analyze_portfolio, run_portfolio_analysis, PortfolioAnalysis, PortfolioAssumptions};
pub use tolerance::{RiskLabel, RiskTolerance};
pub use universe::{Sector, StockProfile, StockRisk};
