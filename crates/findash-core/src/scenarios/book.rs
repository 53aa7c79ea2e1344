use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::{AssumptionViolation, FinDashError};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::valuation::{
    classify, compute_valuation, ValuationAssessment, ValuationAssumptions, ValuationResult,
};
use crate::FinDashResult;

/// The three saved-assumption slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Bear,
    Base,
    Bull,
}

impl ScenarioKind {
    /// Display order.
    pub const ALL: [ScenarioKind; 3] = [ScenarioKind::Bear, ScenarioKind::Base, ScenarioKind::Bull];

    pub fn label(&self) -> &'static str {
        match self {
            ScenarioKind::Bear => "Bear Case",
            ScenarioKind::Base => "Base Case",
            ScenarioKind::Bull => "Bull Case",
        }
    }
}

impl std::str::FromStr for ScenarioKind {
    type Err = FinDashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bear" => Ok(ScenarioKind::Bear),
            "base" => Ok(ScenarioKind::Base),
            "bull" => Ok(ScenarioKind::Bull),
            other => Err(FinDashError::InvalidInput {
                field: "scenario".into(),
                reason: format!("Unknown scenario '{other}' (expected bear, base or bull)"),
            }),
        }
    }
}

/// Saved assumption sets keyed by scenario. Each slot holds an independent
/// copy, so later edits to the working assumptions do not leak in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioBook {
    #[serde(default)]
    bear: Option<ValuationAssumptions>,
    #[serde(default)]
    base: Option<ValuationAssumptions>,
    #[serde(default)]
    bull: Option<ValuationAssumptions>,
}

impl ScenarioBook {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, kind: ScenarioKind) -> &mut Option<ValuationAssumptions> {
        match kind {
            ScenarioKind::Bear => &mut self.bear,
            ScenarioKind::Base => &mut self.base,
            ScenarioKind::Bull => &mut self.bull,
        }
    }

    /// Store a copy of `assumptions`. Returns true if an earlier set was replaced.
    pub fn save(&mut self, kind: ScenarioKind, assumptions: &ValuationAssumptions) -> bool {
        tracing::debug!(scenario = kind.label(), "scenario saved");
        self.slot_mut(kind).replace(assumptions.clone()).is_some()
    }

    pub fn load(&self, kind: ScenarioKind) -> Option<&ValuationAssumptions> {
        match kind {
            ScenarioKind::Bear => self.bear.as_ref(),
            ScenarioKind::Base => self.base.as_ref(),
            ScenarioKind::Bull => self.bull.as_ref(),
        }
    }

    pub fn is_saved(&self, kind: ScenarioKind) -> bool {
        self.load(kind).is_some()
    }

    /// Remove the saved set, returning it.
    pub fn clear(&mut self, kind: ScenarioKind) -> Option<ValuationAssumptions> {
        self.slot_mut(kind).take()
    }

    /// Saved slots in bear, base, bull order.
    pub fn saved(&self) -> impl Iterator<Item = (ScenarioKind, &ValuationAssumptions)> {
        ScenarioKind::ALL
            .into_iter()
            .filter_map(move |k| self.load(k).map(|a| (k, a)))
    }

    pub fn len(&self) -> usize {
        self.saved().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Evaluation of one saved scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub kind: ScenarioKind,
    pub label: String,
    pub assumptions: ValuationAssumptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valuation: Option<ValuationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<ValuationAssessment>,
    /// Set instead of `valuation` when the saved assumptions are rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<AssumptionViolation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub outcomes: Vec<ScenarioOutcome>,
    pub current_price: Money,
    pub highest_value: Option<Money>,
    pub lowest_value: Option<Money>,
    /// highest - lowest per-share value across valued scenarios
    pub spread: Option<Money>,
}

/// Value every saved scenario against `current_price`.
pub fn compare_scenarios(
    book: &ScenarioBook,
    current_price: Money,
) -> FinDashResult<ScenarioComparison> {
    if current_price <= Decimal::ZERO {
        return Err(AssumptionViolation::CurrentPriceMustBePositive.into());
    }
    if book.is_empty() {
        return Err(FinDashError::InsufficientData(
            "At least one saved scenario required".into(),
        ));
    }

    let mut outcomes = Vec::with_capacity(book.len());
    for (kind, assumptions) in book.saved() {
        let mut outcome = ScenarioOutcome {
            kind,
            label: kind.label().to_string(),
            assumptions: assumptions.clone(),
            valuation: None,
            assessment: None,
            error: None,
        };
        match compute_valuation(assumptions) {
            Ok(valuation) => {
                outcome.assessment =
                    Some(classify(valuation.intrinsic_value_per_share, current_price)?);
                outcome.valuation = Some(valuation);
            }
            Err(FinDashError::InvalidAssumption(v)) => outcome.error = Some(v),
            Err(e) => return Err(e),
        }
        outcomes.push(outcome);
    }

    let values: Vec<Money> = outcomes
        .iter()
        .filter_map(|o| o.valuation.as_ref().map(|v| v.intrinsic_value_per_share))
        .collect();
    let highest_value = values.iter().copied().max();
    let lowest_value = values.iter().copied().min();
    let spread = highest_value
        .zip(lowest_value)
        .map(|(h, l)| {
            h.checked_sub(l).ok_or_else(|| FinDashError::ArithmeticOverflow {
                context: "scenario spread".into(),
            })
        })
        .transpose()?;

    Ok(ScenarioComparison {
        outcomes,
        current_price,
        highest_value,
        lowest_value,
        spread,
    })
}

/// `compare_scenarios` wrapped in the standard output envelope.
pub fn run_scenario_comparison(
    book: &ScenarioBook,
    current_price: Money,
) -> FinDashResult<ComputationOutput<ScenarioComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let comparison = compare_scenarios(book, current_price)?;

    for o in &comparison.outcomes {
        if let Some(code) = o.error {
            warnings.push(format!("{} could not be valued: {code}", o.label));
        }
    }
    for kind in ScenarioKind::ALL {
        if !book.is_saved(kind) {
            warnings.push(format!("{} has not been saved", kind.label()));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Bear/Base/Bull Scenario Comparison",
        &serde_json::json!({
            "saved_scenarios": book.len(),
            "current_price": current_price.to_string(),
        }),
        warnings,
        elapsed,
        comparison,
    ))
}
