use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::bands::{lookup, Band, Cmp};
use crate::error::FinDashError;
use crate::types::{with_metadata, ComputationOutput};
use crate::FinDashResult;

/// Average pairwise correlation above which a warning is raised.
pub const HIGH_CORRELATION_THRESHOLD: Decimal = dec!(0.6);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiversificationRating {
    Good,
    Moderate,
    Poor,
}

pub const DIVERSIFICATION_BANDS: [Band<DiversificationRating>; 2] = [
    Band::new(Cmp::Above, dec!(0.6), DiversificationRating::Poor),
    Band::new(Cmp::Above, dec!(0.4), DiversificationRating::Moderate),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationInput {
    /// Asset labels, one per row/column
    #[serde(default)]
    pub assets: Vec<String>,
    /// Square correlation matrix
    pub matrix: Vec<Vec<Decimal>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationAnalysis {
    pub asset_count: usize,
    /// Mean of the strict upper triangle
    pub average_correlation: Decimal,
    pub max_pair: Option<CorrelatedPair>,
    pub rating: DiversificationRating,
    pub high_correlation: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelatedPair {
    pub first: String,
    pub second: String,
    pub correlation: Decimal,
}

/// Summarise how diversified a set of assets is from their correlations.
pub fn analyze_correlation(input: &CorrelationInput) -> FinDashResult<CorrelationAnalysis> {
    let n = input.matrix.len();
    if n < 2 {
        return Err(FinDashError::InsufficientData(
            "At least 2 assets required for correlation analysis".into(),
        ));
    }
    if let Some(bad) = input.matrix.iter().position(|row| row.len() != n) {
        return Err(FinDashError::InvalidInput {
            field: "matrix".into(),
            reason: format!("Row {bad} has {} entries, expected {n}", input.matrix[bad].len()),
        });
    }
    if !input.assets.is_empty() && input.assets.len() != n {
        return Err(FinDashError::InvalidInput {
            field: "assets".into(),
            reason: format!("Expected {n} asset labels, got {}", input.assets.len()),
        });
    }

    let label = |i: usize| -> String {
        input
            .assets
            .get(i)
            .cloned()
            .unwrap_or_else(|| format!("Asset {}", i + 1))
    };

    let mut sum = Decimal::ZERO;
    let mut pairs = 0u32;
    let mut max_pair: Option<CorrelatedPair> = None;

    for i in 0..n {
        for j in (i + 1)..n {
            let c = input.matrix[i][j];
            if c < dec!(-1) || c > Decimal::ONE {
                return Err(FinDashError::InvalidInput {
                    field: format!("matrix[{i}][{j}]"),
                    reason: "Correlation must be between -1 and 1".into(),
                });
            }
            sum += c;
            pairs += 1;
            if max_pair.as_ref().map_or(true, |p| c > p.correlation) {
                max_pair = Some(CorrelatedPair {
                    first: label(i),
                    second: label(j),
                    correlation: c,
                });
            }
        }
    }

    let average_correlation = sum / Decimal::from(pairs);
    let rating = lookup(
        average_correlation,
        &DIVERSIFICATION_BANDS,
        DiversificationRating::Good,
    );

    Ok(CorrelationAnalysis {
        asset_count: n,
        average_correlation,
        max_pair,
        rating,
        high_correlation: average_correlation > HIGH_CORRELATION_THRESHOLD,
    })
}

/// `analyze_correlation` wrapped in the standard output envelope.
pub fn run_correlation_analysis(
    input: &CorrelationInput,
) -> FinDashResult<ComputationOutput<CorrelationAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let analysis = analyze_correlation(input)?;

    if analysis.high_correlation {
        warnings.push(format!(
            "Average correlation of {:.2} is high; holdings tend to move together",
            analysis.average_correlation
        ));
    }
    let asymmetric = (0..analysis.asset_count).any(|i| {
        (0..i).any(|j| input.matrix[i][j] != input.matrix[j][i])
    });
    if asymmetric {
        warnings.push("Matrix is not symmetric; only the upper triangle was used".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Average pairwise correlation (upper triangle)",
        input,
        warnings,
        elapsed,
        analysis,
    ))
}
