pub mod calculators;
pub mod portfolio;
pub mod scenarios;
pub mod valuation;
