//! Ordered threshold tables.
//!
//! Dashboard labels (valuation status, risk tiers, ratio health) are all
//! "first band whose bound matches wins, otherwise fall back". Keeping them
//! as data makes each profile a plain table that can be listed and tested.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a value is compared against a band's bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cmp {
    /// value > bound
    Above,
    /// value >= bound
    AtLeast,
    /// value < bound
    Below,
    /// value <= bound
    AtMost,
}

impl Cmp {
    pub fn holds(self, value: Decimal, bound: Decimal) -> bool {
        match self {
            Cmp::Above => value > bound,
            Cmp::AtLeast => value >= bound,
            Cmp::Below => value < bound,
            Cmp::AtMost => value <= bound,
        }
    }
}

/// One row of a threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band<T> {
    pub cmp: Cmp,
    pub bound: Decimal,
    pub value: T,
}

impl<T> Band<T> {
    pub const fn new(cmp: Cmp, bound: Decimal, value: T) -> Self {
        Self { cmp, bound, value }
    }
}

/// Walk `bands` in order and return the first matching value, else `fallback`.
pub fn lookup<T: Copy>(value: Decimal, bands: &[Band<T>], fallback: T) -> T {
    bands
        .iter()
        .find(|b| b.cmp.holds(value, b.bound))
        .map(|b| b.value)
        .unwrap_or(fallback)
}
