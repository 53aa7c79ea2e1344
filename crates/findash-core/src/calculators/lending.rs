use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::FinDashError;
use crate::types::{round_currency, Money, Percent};
use crate::FinDashResult;

use super::{overflow, require_non_negative, require_positive};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    pub principal: Money,
    /// Annual interest rate in percentage points
    pub annual_rate_pct: Percent,
    /// Tenure in whole years
    pub years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanOutput {
    /// Equated monthly instalment
    pub emi: Money,
    pub months: u32,
    pub total_payment: Money,
    pub total_interest: Money,
}

/// Level monthly payment on an amortising loan.
///
/// With monthly rate m and n months: `P m (1+m)^n / ((1+m)^n - 1)`. A zero
/// rate repays the principal in equal instalments.
pub fn loan_emi(input: &LoanInput) -> FinDashResult<LoanOutput> {
    require_positive("principal", input.principal)?;
    require_non_negative("annual_rate_pct", input.annual_rate_pct)?;
    if input.years == 0 {
        return Err(FinDashError::InvalidInput {
            field: "years".into(),
            reason: "Tenure must be at least one year".into(),
        });
    }

    let months = input
        .years
        .checked_mul(12)
        .ok_or_else(|| FinDashError::InvalidInput {
            field: "years".into(),
            reason: "Tenure is too long to count in months".into(),
        })?;
    let n = Decimal::from(months);
    let monthly_rate = input.annual_rate_pct / dec!(12) / dec!(100);

    let emi = if monthly_rate.is_zero() {
        input.principal / n
    } else {
        let factor = (Decimal::ONE + monthly_rate)
            .checked_powi(i64::from(months))
            .ok_or_else(|| overflow("loan compounding factor"))?;
        input
            .principal
            .checked_mul(monthly_rate)
            .and_then(|x| x.checked_mul(factor))
            .and_then(|x| x.checked_div(factor - Decimal::ONE))
            .ok_or_else(|| overflow("monthly instalment"))?
    };
    let total_payment = emi
        .checked_mul(n)
        .ok_or_else(|| overflow("total payment"))?;

    Ok(LoanOutput {
        emi: round_currency(emi),
        months,
        total_payment: round_currency(total_payment),
        total_interest: round_currency(total_payment - input.principal),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_twenty_year_mortgage() {
        let out = loan_emi(&LoanInput {
            principal: dec!(500000),
            annual_rate_pct: dec!(8),
            years: 20,
        })
        .unwrap();
        assert_eq!(out.months, 240);
        assert_eq!(out.emi, dec!(4182.20));
        assert_eq!(out.total_payment, dec!(1003728.08));
        assert_eq!(out.total_interest, dec!(503728.08));
    }

    #[test]
    fn test_three_year_loan() {
        let out = loan_emi(&LoanInput {
            principal: dec!(100000),
            annual_rate_pct: dec!(6),
            years: 3,
        })
        .unwrap();
        assert_eq!(out.emi, dec!(3042.19));
        assert_eq!(out.total_interest, dec!(9518.97));
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let out = loan_emi(&LoanInput {
            principal: dec!(12000),
            annual_rate_pct: Decimal::ZERO,
            years: 1,
        })
        .unwrap();
        assert_eq!(out.emi, dec!(1000));
        assert_eq!(out.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_rejects_zero_tenure() {
        assert!(loan_emi(&LoanInput {
            principal: dec!(1000),
            annual_rate_pct: dec!(5),
            years: 0,
        })
        .is_err());
    }
}
