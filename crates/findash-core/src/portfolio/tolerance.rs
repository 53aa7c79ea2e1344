use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::bands::{lookup, Band, Cmp};
use crate::error::FinDashError;

/// Investor risk appetite; each profile shifts the score thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

/// Score thresholds for one tolerance profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub low: Decimal,
    pub medium: Decimal,
    pub high: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLabel {
    LowRisk,
    ModerateRisk,
    HighRisk,
}

impl RiskLabel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLabel::LowRisk => "Low Risk",
            RiskLabel::ModerateRisk => "Moderate Risk",
            RiskLabel::HighRisk => "High Risk",
        }
    }
}

impl RiskTolerance {
    pub const ALL: [RiskTolerance; 3] = [
        RiskTolerance::Conservative,
        RiskTolerance::Moderate,
        RiskTolerance::Aggressive,
    ];

    pub fn thresholds(&self) -> RiskThresholds {
        match self {
            RiskTolerance::Conservative => RiskThresholds {
                low: dec!(3),
                medium: dec!(5),
                high: dec!(7),
            },
            RiskTolerance::Moderate => RiskThresholds {
                low: dec!(4),
                medium: dec!(6),
                high: dec!(8),
            },
            RiskTolerance::Aggressive => RiskThresholds {
                low: dec!(5),
                medium: dec!(7),
                high: dec!(9),
            },
        }
    }

    fn bands(&self) -> [Band<RiskLabel>; 2] {
        let t = self.thresholds();
        [
            Band::new(Cmp::AtMost, t.low, RiskLabel::LowRisk),
            Band::new(Cmp::AtMost, t.medium, RiskLabel::ModerateRisk),
        ]
    }

    pub fn label_risk(&self, score: Decimal) -> RiskLabel {
        lookup(score, &self.bands(), RiskLabel::HighRisk)
    }

    /// True once the score is past the profile's medium threshold.
    pub fn is_concerning(&self, score: Decimal) -> bool {
        score > self.thresholds().medium
    }
}

impl std::str::FromStr for RiskTolerance {
    type Err = FinDashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "conservative" => Ok(RiskTolerance::Conservative),
            "moderate" => Ok(RiskTolerance::Moderate),
            "aggressive" => Ok(RiskTolerance::Aggressive),
            other => Err(FinDashError::InvalidInput {
                field: "risk_tolerance".into(),
                reason: format!("Unknown tolerance '{other}'"),
            }),
        }
    }
}
