//! Discounted-cash-flow valuation: the engine, the market-price status
//! classifier and the WACC x terminal-growth sensitivity grid.

pub mod dcf;
pub mod sensitivity;
pub mod status;

pub use dcf::{
    compute_valuation, run_valuation, validate_assumptions, ProjectedYear, ValuationAssumptions,
    ValuationResult, DEFAULT_CURRENT_PRICE,
};
pub use sensitivity::{
    generate_grid, run_sensitivity, SensitivityCell, SensitivityGrid, SENSITIVITY_DELTAS,
};
pub use status::{classify, percent_difference, ValuationAssessment, ValuationStatus};
