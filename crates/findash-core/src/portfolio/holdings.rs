use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FinDashError;
use crate::types::Money;
use crate::FinDashResult;

use super::universe::{self, StockProfile};

/// A position in one stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub shares: Decimal,
    #[serde(alias = "avgPrice")]
    pub avg_price: Money,
}

impl Holding {
    /// Cost basis: shares x average price.
    pub fn value(&self) -> FinDashResult<Money> {
        self.shares
            .checked_mul(self.avg_price)
            .ok_or_else(|| overflow(&self.symbol))
    }

    /// Reference profile, if the symbol is in the universe.
    pub fn profile(&self) -> Option<&'static StockProfile> {
        universe::lookup(&self.symbol)
    }
}

/// Ordered collection of holdings, at most one per symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HoldingsBook {
    holdings: Vec<Holding>,
}

impl HoldingsBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn get(&self, symbol: &str) -> Option<&Holding> {
        self.holdings
            .iter()
            .find(|h| h.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Add a position. Buying a symbol already held merges into it at the
    /// share-weighted average price.
    pub fn add(&mut self, symbol: &str, shares: Decimal, price: Money) -> FinDashResult<&Holding> {
        let profile = universe::lookup(symbol)
            .ok_or_else(|| FinDashError::UnknownSymbol(symbol.trim().to_uppercase()))?;
        validate_position(shares, price)?;

        let idx = match self.position(profile.symbol) {
            Some(idx) => {
                let h = &mut self.holdings[idx];
                let bought = shares.checked_mul(price).ok_or_else(|| overflow(&h.symbol))?;
                let total_shares = h.shares.checked_add(shares).ok_or_else(|| overflow(&h.symbol))?;
                let total_cost = h.value()?.checked_add(bought).ok_or_else(|| overflow(&h.symbol))?;
                h.avg_price = total_cost / total_shares;
                h.shares = total_shares;
                idx
            }
            None => {
                self.holdings.push(Holding {
                    symbol: profile.symbol.to_string(),
                    shares,
                    avg_price: price,
                });
                self.holdings.len() - 1
            }
        };

        tracing::debug!(symbol = profile.symbol, %shares, %price, "holding added");
        Ok(&self.holdings[idx])
    }

    /// Replace shares and average price of an existing position.
    pub fn update(&mut self, symbol: &str, shares: Decimal, avg_price: Money) -> FinDashResult<()> {
        validate_position(shares, avg_price)?;
        let idx = self
            .position(symbol)
            .ok_or_else(|| FinDashError::UnknownSymbol(symbol.trim().to_uppercase()))?;
        let h = &mut self.holdings[idx];
        h.shares = shares;
        h.avg_price = avg_price;
        Ok(())
    }

    pub fn remove(&mut self, symbol: &str) -> Option<Holding> {
        self.position(symbol).map(|idx| self.holdings.remove(idx))
    }

    fn position(&self, symbol: &str) -> Option<usize> {
        let symbol = symbol.trim();
        self.holdings
            .iter()
            .position(|h| h.symbol.eq_ignore_ascii_case(symbol))
    }
}

impl From<Vec<Holding>> for HoldingsBook {
    fn from(holdings: Vec<Holding>) -> Self {
        Self { holdings }
    }
}

fn overflow(symbol: &str) -> FinDashError {
    FinDashError::ArithmeticOverflow {
        context: format!("position value for {symbol}"),
    }
}

fn validate_position(shares: Decimal, price: Money) -> FinDashResult<()> {
    if shares <= Decimal::ZERO {
        return Err(FinDashError::InvalidInput {
            field: "shares".into(),
            reason: "Shares must be positive".into(),
        });
    }
    if price <= Decimal::ZERO {
        return Err(FinDashError::InvalidInput {
            field: "avg_price".into(),
            reason: "Price must be positive".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_add_normalises_symbol() {
        let mut book = HoldingsBook::new();
        let h = book.add(" msft", dec!(10), dec!(400)).unwrap();
        assert_eq!(h.symbol, "MSFT");
        assert_eq!(h.value().unwrap(), dec!(4000));
    }

    #[test]
    fn test_add_merges_at_weighted_price() {
        let mut book = HoldingsBook::new();
        book.add("AAPL", dec!(10), dec!(150)).unwrap();
        let h = book.add("aapl", dec!(30), dec!(190)).unwrap().clone();
        assert_eq!(book.len(), 1);
        assert_eq!(h.shares, dec!(40));
        // (1500 + 5700) / 40
        assert_eq!(h.avg_price, dec!(180));
        assert_eq!(h.value().unwrap(), dec!(7200));
    }

    #[test]
    fn test_add_rejects_bad_input() {
        let mut book = HoldingsBook::new();
        assert!(matches!(
            book.add("NOPE", dec!(1), dec!(1)),
            Err(FinDashError::UnknownSymbol(_))
        ));
        assert!(matches!(
            book.add("KO", Decimal::ZERO, dec!(60)),
            Err(FinDashError::InvalidInput { .. })
        ));
        assert!(book.add("KO", dec!(5), dec!(-1)).is_err());
        assert!(book.is_empty());
    }

    #[test]
    fn test_update_and_remove() {
        let mut book = HoldingsBook::new();
        book.add("JPM", dec!(10), dec!(200)).unwrap();
        book.update("jpm", dec!(12), dec!(210)).unwrap();
        assert_eq!(book.get("JPM").unwrap().value().unwrap(), dec!(2520));
        assert!(book.update("XOM", dec!(1), dec!(1)).is_err());

        let removed = book.remove("JPM").unwrap();
        assert_eq!(removed.shares, dec!(12));
        assert!(book.remove("JPM").is_none());
    }
}
