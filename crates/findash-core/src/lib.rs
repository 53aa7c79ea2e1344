pub mod bands;
pub mod error;
pub mod types;

#[cfg(feature = "valuation")]
pub mod valuation;

#[cfg(feature = "scenarios")]
pub mod scenarios;

#[cfg(feature = "portfolio")]
pub mod portfolio;

#[cfg(feature = "calculators")]
pub mod calculators;

pub use error::{AssumptionViolation, FinDashError};
pub use types::*;

/// Standard result type for all findash operations
pub type FinDashResult<T> = Result<T, FinDashError>;
