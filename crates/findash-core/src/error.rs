use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Machine-readable reason attached to an `InvalidAssumption` error.
///
/// The serialized form (and `Display`) is the stable snake_case code that
/// callers match on, e.g. `wacc_must_exceed_terminal_growth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssumptionViolation {
    WaccMustExceedTerminalGrowth,
    #[serde(rename = "wacc_must_exceed_negative_100_pct")]
    WaccMustExceedNegative100Pct,
    SharesMustBePositive,
    ProjectionYearsMustBePositive,
    CurrentPriceMustBePositive,
    DeltasMustBeOddAndSymmetric,
}

impl AssumptionViolation {
    pub fn code(&self) -> &'static str {
        match self {
            Self::WaccMustExceedTerminalGrowth => "wacc_must_exceed_terminal_growth",
            Self::WaccMustExceedNegative100Pct => "wacc_must_exceed_negative_100_pct",
            Self::SharesMustBePositive => "shares_must_be_positive",
            Self::ProjectionYearsMustBePositive => "projection_years_must_be_positive",
            Self::CurrentPriceMustBePositive => "current_price_must_be_positive",
            Self::DeltasMustBeOddAndSymmetric => "deltas_must_be_odd_and_symmetric",
        }
    }
}

impl fmt::Display for AssumptionViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error)]
pub enum FinDashError {
    #[error("Invalid assumption: {0}")]
    InvalidAssumption(AssumptionViolation),

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Arithmetic overflow in {context}")]
    ArithmeticOverflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl FinDashError {
    /// The violation code when this is an `InvalidAssumption`.
    pub fn violation(&self) -> Option<AssumptionViolation> {
        match self {
            FinDashError::InvalidAssumption(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<AssumptionViolation> for FinDashError {
    fn from(v: AssumptionViolation) -> Self {
        FinDashError::InvalidAssumption(v)
    }
}

impl From<serde_json::Error> for FinDashError {
    fn from(e: serde_json::Error) -> Self {
        FinDashError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_codes_round_trip_through_serde() {
        let json = serde_json::to_string(&AssumptionViolation::WaccMustExceedNegative100Pct).unwrap();
        assert_eq!(json, "\"wacc_must_exceed_negative_100_pct\"");
        let json = serde_json::to_string(&AssumptionViolation::SharesMustBePositive).unwrap();
        assert_eq!(json, "\"shares_must_be_positive\"");
    }

    #[test]
    fn test_invalid_assumption_display() {
        let err = FinDashError::from(AssumptionViolation::WaccMustExceedTerminalGrowth);
        assert_eq!(
            err.to_string(),
            "Invalid assumption: wacc_must_exceed_terminal_growth"
        );
        assert_eq!(
            err.violation(),
            Some(AssumptionViolation::WaccMustExceedTerminalGrowth)
        );
    }
}
