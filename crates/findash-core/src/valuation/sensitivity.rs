use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::AssumptionViolation;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::FinDashResult;

use super::dcf::{compute_valuation, validate_shape, ValuationAssumptions};
use super::status::{classify, ValuationStatus};

/// Perturbations (percentage points) applied to both axes by the dashboard.
pub const SENSITIVITY_DELTAS: [Decimal; 5] = [dec!(-1), dec!(-0.5), dec!(0), dec!(0.5), dec!(1)];

/// One WACC / terminal-growth combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityCell {
    pub wacc_pct: Percent,
    pub terminal_growth_pct: Percent,
    /// Intrinsic value per share; `None` when the rate pair is not applicable
    pub intrinsic_value: Option<Money>,
    /// Difference versus the current price; `None` when not applicable
    pub percent_difference: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ValuationStatus>,
    pub is_base_case: bool,
}

impl SensitivityCell {
    pub fn is_defined(&self) -> bool {
        self.intrinsic_value.is_some()
    }
}

/// WACC (rows) x terminal growth (columns) grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityGrid {
    pub wacc_values: Vec<Percent>,
    pub terminal_growth_values: Vec<Percent>,
    /// cells[i][j] uses wacc_values[i] and terminal_growth_values[j]
    pub cells: Vec<Vec<SensitivityCell>>,
    /// Position of the unperturbed assumptions (row, col)
    pub base_case_position: (usize, usize),
    pub base_case_value: Option<Money>,
    pub current_price: Money,
    pub valid_cells: usize,
    pub undefined_cells: usize,
}

impl SensitivityGrid {
    pub fn cell(&self, row: usize, col: usize) -> Option<&SensitivityCell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    pub fn base_case(&self) -> &SensitivityCell {
        let (row, col) = self.base_case_position;
        &self.cells[row][col]
    }
}

/// Re-run the valuation over every (WACC + d_i, terminal growth + d_j) pair.
///
/// `deltas` must have odd length and mirror around zero, so the centre
/// cell is the unperturbed case. Pairs where WACC does not exceed terminal
/// growth, WACC is not positive, or terminal growth is negative produce an
/// empty cell instead of a number.
pub fn generate_grid(
    assumptions: &ValuationAssumptions,
    current_price: Money,
    deltas: &[Decimal],
) -> FinDashResult<SensitivityGrid> {
    validate_deltas(deltas)?;
    validate_shape(assumptions)?;
    if current_price <= Decimal::ZERO {
        return Err(AssumptionViolation::CurrentPriceMustBePositive.into());
    }

    let wacc_values: Vec<Percent> = deltas.iter().map(|d| assumptions.wacc_pct + d).collect();
    let tg_values: Vec<Percent> = deltas
        .iter()
        .map(|d| assumptions.terminal_growth_pct + d)
        .collect();
    let centre = deltas.len() / 2;

    let mut cells = Vec::with_capacity(wacc_values.len());
    let mut valid_cells = 0;

    for (row, wacc) in wacc_values.iter().enumerate() {
        let mut cells_row = Vec::with_capacity(tg_values.len());
        for (col, tg) in tg_values.iter().enumerate() {
            let cell = evaluate_cell(assumptions, *wacc, *tg, current_price, row == centre && col == centre)?;
            if cell.is_defined() {
                valid_cells += 1;
            }
            cells_row.push(cell);
        }
        cells.push(cells_row);
    }

    let total = wacc_values.len() * tg_values.len();
    let base_case_value = cells[centre][centre].intrinsic_value;

    tracing::debug!(
        size = deltas.len(),
        valid_cells,
        undefined_cells = total - valid_cells,
        "sensitivity grid generated"
    );

    Ok(SensitivityGrid {
        wacc_values,
        terminal_growth_values: tg_values,
        cells,
        base_case_position: (centre, centre),
        base_case_value,
        current_price,
        valid_cells,
        undefined_cells: total - valid_cells,
    })
}

/// `generate_grid` wrapped in the standard output envelope.
pub fn run_sensitivity(
    assumptions: &ValuationAssumptions,
    current_price: Money,
    deltas: &[Decimal],
) -> FinDashResult<ComputationOutput<SensitivityGrid>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let grid = generate_grid(assumptions, current_price, deltas)?;

    if grid.undefined_cells > 0 {
        warnings.push(format!(
            "{} of {} cells are not applicable (WACC must exceed terminal growth, WACC > 0, terminal growth >= 0)",
            grid.undefined_cells,
            grid.undefined_cells + grid.valid_cells
        ));
    }
    if grid.base_case_value.is_none() {
        warnings.push("Base case assumptions do not produce a valuation".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "WACC x Terminal Growth Sensitivity Grid",
        &serde_json::json!({
            "assumptions": assumptions,
            "current_price": current_price.to_string(),
            "deltas": deltas.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
        }),
        warnings,
        elapsed,
        grid,
    ))
}

fn evaluate_cell(
    assumptions: &ValuationAssumptions,
    wacc_pct: Percent,
    terminal_growth_pct: Percent,
    current_price: Money,
    is_base_case: bool,
) -> FinDashResult<SensitivityCell> {
    let applicable = wacc_pct > terminal_growth_pct
        && wacc_pct > Decimal::ZERO
        && terminal_growth_pct >= Decimal::ZERO;

    if !applicable {
        return Ok(SensitivityCell {
            wacc_pct,
            terminal_growth_pct,
            intrinsic_value: None,
            percent_difference: None,
            status: None,
            is_base_case,
        });
    }

    let perturbed = assumptions.with_rates(wacc_pct, terminal_growth_pct);
    let value = compute_valuation(&perturbed)?.intrinsic_value_per_share;
    let assessment = classify(value, current_price)?;

    Ok(SensitivityCell {
        wacc_pct,
        terminal_growth_pct,
        intrinsic_value: Some(value),
        percent_difference: Some(assessment.percent_difference),
        status: Some(assessment.status),
        is_base_case,
    })
}

fn validate_deltas(deltas: &[Decimal]) -> FinDashResult<()> {
    let n = deltas.len();
    let mirrored = deltas
        .iter()
        .zip(deltas.iter().rev())
        .all(|(a, b)| *a == -*b);
    if n % 2 == 0 || !mirrored {
        return Err(AssumptionViolation::DeltasMustBeOddAndSymmetric.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FinDashError;
    use crate::valuation::dcf::DEFAULT_CURRENT_PRICE;
    use rust_decimal_macros::dec;

    #[test]
    fn test_grid_dimensions_and_axes() {
        let a = ValuationAssumptions::default();
        let grid = generate_grid(&a, DEFAULT_CURRENT_PRICE, &SENSITIVITY_DELTAS).unwrap();

        assert_eq!(grid.cells.len(), 5);
        assert!(grid.cells.iter().all(|r| r.len() == 5));
        assert_eq!(
            grid.wacc_values,
            vec![dec!(8.5), dec!(9.0), dec!(9.5), dec!(10.0), dec!(10.5)]
        );
        assert_eq!(
            grid.terminal_growth_values,
            vec![dec!(2.0), dec!(2.5), dec!(3.0), dec!(3.5), dec!(4.0)]
        );
        assert_eq!(grid.base_case_position, (2, 2));
        assert_eq!(grid.valid_cells, 25);
        assert_eq!(grid.undefined_cells, 0);
    }

    #[test]
    fn test_centre_matches_base_valuation() {
        let a = ValuationAssumptions::default();
        let grid = generate_grid(&a, DEFAULT_CURRENT_PRICE, &SENSITIVITY_DELTAS).unwrap();
        let base = compute_valuation(&a).unwrap();

        let centre = grid.base_case();
        assert!(centre.is_base_case);
        assert_eq!(centre.intrinsic_value, Some(base.intrinsic_value_per_share));
        assert_eq!(grid.base_case_value, Some(dec!(255.40)));
    }

    #[test]
    fn test_corner_values() {
        let a = ValuationAssumptions::default();
        let grid = generate_grid(&a, DEFAULT_CURRENT_PRICE, &SENSITIVITY_DELTAS).unwrap();
        // Lowest WACC, highest growth is the richest corner
        assert_eq!(grid.cell(0, 4).unwrap().intrinsic_value, Some(dec!(360.47)));
        assert_eq!(grid.cell(4, 0).unwrap().intrinsic_value, Some(dec!(199.57)));
    }

    #[test]
    fn test_invalid_rate_pairs_are_empty() {
        let mut a = ValuationAssumptions::default();
        a.wacc_pct = dec!(4);
        a.terminal_growth_pct = dec!(3.5);
        let grid = generate_grid(&a, dec!(100), &SENSITIVITY_DELTAS).unwrap();

        // wacc 3.0 vs tg 4.5 => not applicable
        let cell = grid.cell(0, 4).unwrap();
        assert!(!cell.is_defined());
        assert!(cell.percent_difference.is_none());
        // wacc 5.0 vs tg 2.5 => fine
        assert!(grid.cell(4, 0).unwrap().is_defined());
        assert!(grid.undefined_cells > 0);
        assert_eq!(grid.valid_cells + grid.undefined_cells, 25);
    }

    #[test]
    fn test_negative_terminal_growth_cells_are_empty() {
        let mut a = ValuationAssumptions::default();
        a.terminal_growth_pct = dec!(0.5);
        let grid = generate_grid(&a, dec!(100), &SENSITIVITY_DELTAS).unwrap();
        // tg 0.5 - 1 = -0.5 in the first column
        assert!(grid.cells.iter().all(|row| !row[0].is_defined()));
        assert!(grid.cells.iter().all(|row| row[1].is_defined()));
    }

    #[test]
    fn test_arbitrary_odd_deltas() {
        let a = ValuationAssumptions::default();
        let deltas = [dec!(-2), dec!(-1), dec!(-0.25), dec!(0), dec!(0.25), dec!(1), dec!(2)];
        let grid = generate_grid(&a, DEFAULT_CURRENT_PRICE, &deltas).unwrap();
        assert_eq!(grid.cells.len(), 7);
        assert_eq!(grid.base_case_position, (3, 3));
        assert_eq!(grid.base_case_value, Some(dec!(255.40)));
    }

    #[test]
    fn test_single_zero_delta() {
        let a = ValuationAssumptions::default();
        let grid = generate_grid(&a, DEFAULT_CURRENT_PRICE, &[dec!(0)]).unwrap();
        assert_eq!(grid.cells.len(), 1);
        assert_eq!(grid.base_case_value, Some(dec!(255.40)));
    }

    #[test]
    fn test_rejects_even_or_asymmetric_deltas() {
        let a = ValuationAssumptions::default();
        for deltas in [
            vec![dec!(-1), dec!(1)],
            vec![dec!(-1), dec!(0), dec!(0.5)],
            vec![],
        ] {
            let err = generate_grid(&a, dec!(100), &deltas).unwrap_err();
            assert_eq!(
                err.violation(),
                Some(AssumptionViolation::DeltasMustBeOddAndSymmetric)
            );
        }
    }

    #[test]
    fn test_rejects_bad_price_and_shares() {
        let mut a = ValuationAssumptions::default();
        let err = generate_grid(&a, Decimal::ZERO, &SENSITIVITY_DELTAS).unwrap_err();
        assert_eq!(
            err.violation(),
            Some(AssumptionViolation::CurrentPriceMustBePositive)
        );

        a.shares_outstanding = Decimal::ZERO;
        let err = generate_grid(&a, dec!(100), &SENSITIVITY_DELTAS).unwrap_err();
        assert!(matches!(
            err,
            FinDashError::InvalidAssumption(AssumptionViolation::SharesMustBePositive)
        ));
    }

    #[test]
    fn test_run_sensitivity_reports_undefined_cells() {
        let mut a = ValuationAssumptions::default();
        a.terminal_growth_pct = dec!(0.5);
        let out = run_sensitivity(&a, dec!(100), &SENSITIVITY_DELTAS).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].starts_with("5 of 25 cells"));
    }
}
