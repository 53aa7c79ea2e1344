use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Percent, Rate};

/// Maximum number of matches returned by [`search`].
pub const MAX_SEARCH_RESULTS: usize = 8;

/// Beta assumed for symbols outside the universe.
pub const DEFAULT_BETA: Decimal = dec!(1);
/// Annualised volatility assumed for symbols outside the universe.
pub const DEFAULT_VOLATILITY: Rate = dec!(0.25);
/// Dividend yield assumed for symbols outside the universe.
pub const DEFAULT_DIVIDEND_YIELD: Percent = dec!(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sector {
    Technology,
    Healthcare,
    Financial,
    Consumer,
    Energy,
    Industrial,
    Other,
}

impl Sector {
    pub fn label(&self) -> &'static str {
        match self {
            Sector::Technology => "Technology",
            Sector::Healthcare => "Healthcare",
            Sector::Financial => "Financial",
            Sector::Consumer => "Consumer",
            Sector::Energy => "Energy",
            Sector::Industrial => "Industrial",
            Sector::Other => "Other",
        }
    }
}

/// Tier assigned to a single stock from its beta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockRisk {
    Low,
    Medium,
    High,
}

/// Reference data for one listed stock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StockProfile {
    pub symbol: &'static str,
    pub name: &'static str,
    pub sector: Sector,
    pub beta: Decimal,
    /// Annualised volatility as a fraction
    pub volatility: Rate,
    /// Dividend yield in percentage points
    pub dividend_yield: Percent,
}

impl StockProfile {
    const fn new(
        symbol: &'static str,
        name: &'static str,
        sector: Sector,
        beta: Decimal,
        volatility: Rate,
        dividend_yield: Percent,
    ) -> Self {
        Self {
            symbol,
            name,
            sector,
            beta,
            volatility,
            dividend_yield,
        }
    }

    pub fn risk(&self) -> StockRisk {
        stock_risk(self.beta)
    }
}

/// Beta tiers: above 1.3 high, above 0.8 medium.
pub fn stock_risk(beta: Decimal) -> StockRisk {
    if beta > dec!(1.3) {
        StockRisk::High
    } else if beta > dec!(0.8) {
        StockRisk::Medium
    } else {
        StockRisk::Low
    }
}

use Sector::*;

pub static UNIVERSE: [StockProfile; 47] = [
    // Technology
    StockProfile::new("AAPL", "Apple Inc", Technology, dec!(1.28), dec!(0.24), dec!(0.5)),
    StockProfile::new("MSFT", "Microsoft Corp", Technology, dec!(0.92), dec!(0.22), dec!(0.8)),
    StockProfile::new("GOOGL", "Alphabet Inc", Technology, dec!(1.05), dec!(0.26), dec!(0)),
    StockProfile::new("NVDA", "NVIDIA Corp", Technology, dec!(1.72), dec!(0.45), dec!(0.04)),
    StockProfile::new("TSLA", "Tesla Inc", Technology, dec!(2.08), dec!(0.55), dec!(0)),
    StockProfile::new("META", "Meta Platforms", Technology, dec!(1.35), dec!(0.38), dec!(0.4)),
    StockProfile::new("AMZN", "Amazon.com Inc", Technology, dec!(1.18), dec!(0.30), dec!(0)),
    StockProfile::new("AMD", "AMD Inc", Technology, dec!(1.85), dec!(0.48), dec!(0)),
    StockProfile::new("INTC", "Intel Corp", Technology, dec!(0.98), dec!(0.32), dec!(1.5)),
    StockProfile::new("CRM", "Salesforce Inc", Technology, dec!(1.15), dec!(0.28), dec!(0)),
    StockProfile::new("TCS", "Tata Consultancy", Technology, dec!(0.75), dec!(0.18), dec!(1.2)),
    StockProfile::new("INFY", "Infosys Ltd", Technology, dec!(0.82), dec!(0.20), dec!(2.1)),
    StockProfile::new("WIPRO", "Wipro Ltd", Technology, dec!(0.78), dec!(0.22), dec!(1.8)),
    StockProfile::new("HCLTECH", "HCL Technologies", Technology, dec!(0.68), dec!(0.19), dec!(3.2)),
    // Healthcare
    StockProfile::new("UNH", "UnitedHealth Group", Healthcare, dec!(0.72), dec!(0.18), dec!(1.4)),
    StockProfile::new("JNJ", "Johnson & Johnson", Healthcare, dec!(0.55), dec!(0.14), dec!(2.9)),
    StockProfile::new("PFE", "Pfizer Inc", Healthcare, dec!(0.65), dec!(0.22), dec!(5.8)),
    StockProfile::new("LLY", "Eli Lilly", Healthcare, dec!(0.42), dec!(0.25), dec!(0.8)),
    StockProfile::new("MRK", "Merck & Co", Healthcare, dec!(0.48), dec!(0.18), dec!(2.5)),
    // Financial
    StockProfile::new("JPM", "JPMorgan Chase", Financial, dec!(1.15), dec!(0.25), dec!(2.4)),
    StockProfile::new("BAC", "Bank of America", Financial, dec!(1.42), dec!(0.32), dec!(2.8)),
    StockProfile::new("V", "Visa Inc", Financial, dec!(0.95), dec!(0.20), dec!(0.8)),
    StockProfile::new("MA", "Mastercard Inc", Financial, dec!(1.05), dec!(0.22), dec!(0.6)),
    StockProfile::new("GS", "Goldman Sachs", Financial, dec!(1.35), dec!(0.30), dec!(2.5)),
    StockProfile::new("HDFCBANK", "HDFC Bank", Financial, dec!(0.92), dec!(0.22), dec!(1.1)),
    StockProfile::new("ICICIBANK", "ICICI Bank", Financial, dec!(1.08), dec!(0.25), dec!(0.8)),
    StockProfile::new("KOTAKBANK", "Kotak Mahindra Bank", Financial, dec!(0.95), dec!(0.23), dec!(0.1)),
    StockProfile::new("SBIN", "State Bank of India", Financial, dec!(1.25), dec!(0.28), dec!(1.8)),
    // Consumer
    StockProfile::new("KO", "Coca-Cola Co", Consumer, dec!(0.58), dec!(0.14), dec!(3.1)),
    StockProfile::new("PG", "Procter & Gamble", Consumer, dec!(0.45), dec!(0.12), dec!(2.4)),
    StockProfile::new("WMT", "Walmart Inc", Consumer, dec!(0.52), dec!(0.15), dec!(1.4)),
    StockProfile::new("NKE", "Nike Inc", Consumer, dec!(1.10), dec!(0.28), dec!(1.5)),
    StockProfile::new("MCD", "McDonald's Corp", Consumer, dec!(0.65), dec!(0.16), dec!(2.2)),
    StockProfile::new("HINDUNILVR", "Hindustan Unilever", Consumer, dec!(0.45), dec!(0.15), dec!(1.6)),
    StockProfile::new("ITC", "ITC Ltd", Consumer, dec!(0.72), dec!(0.18), dec!(3.2)),
    StockProfile::new("ASIANPAINT", "Asian Paints", Consumer, dec!(0.85), dec!(0.22), dec!(0.8)),
    // Energy
    StockProfile::new("XOM", "Exxon Mobil", Energy, dec!(0.92), dec!(0.28), dec!(3.5)),
    StockProfile::new("CVX", "Chevron Corp", Energy, dec!(1.05), dec!(0.26), dec!(4.0)),
    StockProfile::new("OXY", "Occidental Petroleum", Energy, dec!(1.85), dec!(0.42), dec!(1.2)),
    StockProfile::new("RELIANCE", "Reliance Industries", Energy, dec!(0.95), dec!(0.22), dec!(0.4)),
    StockProfile::new("ONGC", "Oil & Natural Gas Corp", Energy, dec!(1.15), dec!(0.28), dec!(4.5)),
    // Industrial
    StockProfile::new("CAT", "Caterpillar Inc", Industrial, dec!(1.05), dec!(0.25), dec!(1.6)),
    StockProfile::new("HON", "Honeywell Intl", Industrial, dec!(1.02), dec!(0.22), dec!(2.0)),
    StockProfile::new("UPS", "United Parcel Service", Industrial, dec!(1.15), dec!(0.24), dec!(4.2)),
    StockProfile::new("BA", "Boeing Co", Industrial, dec!(1.45), dec!(0.38), dec!(0)),
    StockProfile::new("LT", "Larsen & Toubro", Industrial, dec!(1.18), dec!(0.25), dec!(0.9)),
    StockProfile::new("TATASTEEL", "Tata Steel", Industrial, dec!(1.45), dec!(0.35), dec!(2.5)),
];

/// Case-insensitive lookup by ticker.
pub fn lookup(symbol: &str) -> Option<&'static StockProfile> {
    UNIVERSE
        .iter()
        .find(|p| p.symbol.eq_ignore_ascii_case(symbol.trim()))
}

/// Substring match on symbol or company name, in universe order.
pub fn search(query: &str) -> Vec<&'static StockProfile> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return Vec::new();
    }
    UNIVERSE
        .iter()
        .filter(|p| p.symbol.to_lowercase().contains(&q) || p.name.to_lowercase().contains(&q))
        .take(MAX_SEARCH_RESULTS)
        .collect()
}
