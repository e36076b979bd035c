//! Mandatory monthly contributions withheld from compensation.
//!
//! Three programs are deducted from an employee's gross monthly salary before
//! income tax is computed:
//!
//! | Program    | Base                                   | Employee share |
//! |------------|----------------------------------------|----------------|
//! | SSS        | Monthly salary credit (₱500 bands)     | 5%             |
//! | PhilHealth | Gross salary                           | 2.5%, ₱250–₱2,500 |
//! | Pag-IBIG   | Gross salary                           | 1% up to ₱1,500, else 2%, max ₱300 |
//!
//! A zero salary yields zero contributions; the minimum premiums only apply
//! to positive salaries.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use phtax_core::calculations::ContributionRates;
//!
//! let rates = ContributionRates::default();
//! let breakdown = rates.breakdown(dec!(50000));
//!
//! assert_eq!(breakdown.sss, dec!(1750.00));
//! assert_eq!(breakdown.phil_health, dec!(1250.00));
//! assert_eq!(breakdown.pagibig, dec!(300.00));
//! assert_eq!(breakdown.total, dec!(3300.00));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::{ZERO_PESOS, round_half_up};

/// Errors raised by [`ContributionRates::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContributionRatesError {
    #[error("{name} rate must be between 0 and 1, got {rate}")]
    InvalidRate { name: &'static str, rate: Decimal },

    #[error("{name} minimum {min} exceeds maximum {max}")]
    InvertedBand {
        name: &'static str,
        min: Decimal,
        max: Decimal,
    },

    #[error("SSS salary credit step must be positive, got {0}")]
    InvalidCreditStep(Decimal),

    #[error("Pag-IBIG threshold must be non-negative, got {0}")]
    InvalidThreshold(Decimal),
}

/// Social Security System rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SssRates {
    pub employee_rate: Decimal,
    /// Carried for the rate directory; never deducted from the employee.
    pub employer_rate: Decimal,
    pub min_salary_credit: Decimal,
    pub max_salary_credit: Decimal,
    /// Width of a monthly salary credit band.
    pub credit_step: Decimal,
}

/// PhilHealth premium rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhilHealthRates {
    pub rate: Decimal,
    pub min_premium: Decimal,
    pub max_premium: Decimal,
}

/// Pag-IBIG (Home Development Mutual Fund) rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagIbigRates {
    /// Applies when salary is at or below `threshold`.
    pub low_rate: Decimal,
    pub high_rate: Decimal,
    pub threshold: Decimal,
    pub max_contribution: Decimal,
}

/// The full set of contribution parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRates {
    pub sss: SssRates,
    pub phil_health: PhilHealthRates,
    pub pagibig: PagIbigRates,
}

impl Default for ContributionRates {
    /// 2025 contribution schedules.
    fn default() -> Self {
        Self {
            sss: SssRates {
                employee_rate: dec!(0.05),
                employer_rate: dec!(0.095),
                min_salary_credit: dec!(4000),
                max_salary_credit: dec!(35000),
                credit_step: dec!(500),
            },
            phil_health: PhilHealthRates {
                rate: dec!(0.025),
                min_premium: dec!(250),
                max_premium: dec!(2500),
            },
            pagibig: PagIbigRates {
                low_rate: dec!(0.01),
                high_rate: dec!(0.02),
                threshold: dec!(1500),
                max_contribution: dec!(300),
            },
        }
    }
}

/// Employee contributions for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionBreakdown {
    pub sss: Decimal,
    pub phil_health: Decimal,
    pub pagibig: Decimal,
    pub total: Decimal,
}

fn check_rate(
    name: &'static str,
    rate: Decimal,
) -> Result<(), ContributionRatesError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(ContributionRatesError::InvalidRate { name, rate });
    }
    Ok(())
}

fn check_band(
    name: &'static str,
    min: Decimal,
    max: Decimal,
) -> Result<(), ContributionRatesError> {
    if min > max {
        return Err(ContributionRatesError::InvertedBand { name, min, max });
    }
    Ok(())
}

impl ContributionRates {
    /// Checks every rate and band.
    ///
    /// # Errors
    ///
    /// Returns the first [`ContributionRatesError`] found.
    pub fn validate(&self) -> Result<(), ContributionRatesError> {
        check_rate("SSS employee", self.sss.employee_rate)?;
        check_rate("SSS employer", self.sss.employer_rate)?;
        check_band(
            "SSS salary credit",
            self.sss.min_salary_credit,
            self.sss.max_salary_credit,
        )?;
        if self.sss.credit_step <= Decimal::ZERO {
            return Err(ContributionRatesError::InvalidCreditStep(
                self.sss.credit_step,
            ));
        }

        check_rate("PhilHealth", self.phil_health.rate)?;
        check_band(
            "PhilHealth premium",
            self.phil_health.min_premium,
            self.phil_health.max_premium,
        )?;

        check_rate("Pag-IBIG low", self.pagibig.low_rate)?;
        check_rate("Pag-IBIG high", self.pagibig.high_rate)?;
        if self.pagibig.threshold < Decimal::ZERO {
            return Err(ContributionRatesError::InvalidThreshold(
                self.pagibig.threshold,
            ));
        }
        check_band(
            "Pag-IBIG contribution",
            Decimal::ZERO,
            self.pagibig.max_contribution,
        )?;

        Ok(())
    }

    /// Monthly salary credit: salary rounded to the nearest band, clamped to
    /// the credit range.
    pub fn sss_salary_credit(
        &self,
        monthly_salary: Decimal,
    ) -> Decimal {
        if monthly_salary <= Decimal::ZERO {
            return ZERO_PESOS;
        }

        let step = self.sss.credit_step;
        let banded = (monthly_salary / step)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            * step;

        banded
            .max(self.sss.min_salary_credit)
            .min(self.sss.max_salary_credit)
    }

    pub fn sss_contribution(
        &self,
        monthly_salary: Decimal,
    ) -> Decimal {
        round_half_up(self.sss_salary_credit(monthly_salary) * self.sss.employee_rate)
    }

    pub fn phil_health_contribution(
        &self,
        monthly_salary: Decimal,
    ) -> Decimal {
        if monthly_salary <= Decimal::ZERO {
            return ZERO_PESOS;
        }

        let premium = monthly_salary * self.phil_health.rate;
        round_half_up(
            premium
                .max(self.phil_health.min_premium)
                .min(self.phil_health.max_premium),
        )
    }

    pub fn pagibig_contribution(
        &self,
        monthly_salary: Decimal,
    ) -> Decimal {
        if monthly_salary <= Decimal::ZERO {
            return ZERO_PESOS;
        }

        let rate = if monthly_salary <= self.pagibig.threshold {
            self.pagibig.low_rate
        } else {
            self.pagibig.high_rate
        };
        round_half_up((monthly_salary * rate).min(self.pagibig.max_contribution))
    }

    /// All three contributions and their total.
    pub fn breakdown(
        &self,
        monthly_salary: Decimal,
    ) -> ContributionBreakdown {
        let sss = self.sss_contribution(monthly_salary);
        let phil_health = self.phil_health_contribution(monthly_salary);
        let pagibig = self.pagibig_contribution(monthly_salary);

        ContributionBreakdown {
            sss,
            phil_health,
            pagibig,
            total: sss + phil_health + pagibig,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_accepts_default_rates() {
        assert_eq!(ContributionRates::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_sss_rate_above_one() {
        let mut rates = ContributionRates::default();
        rates.sss.employee_rate = dec!(1.5);

        assert_eq!(
            rates.validate(),
            Err(ContributionRatesError::InvalidRate {
                name: "SSS employee",
                rate: dec!(1.5),
            })
        );
    }

    #[test]
    fn validate_rejects_inverted_salary_credit_band() {
        let mut rates = ContributionRates::default();
        rates.sss.min_salary_credit = dec!(40000);

        assert_eq!(
            rates.validate(),
            Err(ContributionRatesError::InvertedBand {
                name: "SSS salary credit",
                min: dec!(40000),
                max: dec!(35000),
            })
        );
    }

    #[test]
    fn validate_rejects_zero_credit_step() {
        let mut rates = ContributionRates::default();
        rates.sss.credit_step = dec!(0);

        assert_eq!(
            rates.validate(),
            Err(ContributionRatesError::InvalidCreditStep(dec!(0)))
        );
    }

    #[test]
    fn validate_rejects_inverted_philhealth_premiums() {
        let mut rates = ContributionRates::default();
        rates.phil_health.max_premium = dec!(100);

        assert_eq!(
            rates.validate(),
            Err(ContributionRatesError::InvertedBand {
                name: "PhilHealth premium",
                min: dec!(250),
                max: dec!(100),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_pagibig_threshold() {
        let mut rates = ContributionRates::default();
        rates.pagibig.threshold = dec!(-1);

        assert_eq!(
            rates.validate(),
            Err(ContributionRatesError::InvalidThreshold(dec!(-1)))
        );
    }

    // =========================================================================
    // SSS tests
    // =========================================================================

    #[test]
    fn sss_salary_credit_rounds_to_nearest_band() {
        let rates = ContributionRates::default();

        assert_eq!(rates.sss_salary_credit(dec!(5249.99)), dec!(5000));
        assert_eq!(rates.sss_salary_credit(dec!(5250)), dec!(5500));
        assert_eq!(rates.sss_salary_credit(dec!(20100)), dec!(20000));
    }

    #[test]
    fn sss_salary_credit_clamps_to_minimum() {
        let rates = ContributionRates::default();

        assert_eq!(rates.sss_salary_credit(dec!(1000)), dec!(4000));
    }

    #[test]
    fn sss_salary_credit_clamps_to_maximum() {
        let rates = ContributionRates::default();

        assert_eq!(rates.sss_salary_credit(dec!(100000)), dec!(35000));
    }

    #[test]
    fn sss_contribution_is_five_percent_of_credit() {
        let rates = ContributionRates::default();

        assert_eq!(rates.sss_contribution(dec!(20000)), dec!(1000.00));
        assert_eq!(rates.sss_contribution(dec!(3000)), dec!(200.00));
        assert_eq!(rates.sss_contribution(dec!(80000)), dec!(1750.00));
    }

    // =========================================================================
    // PhilHealth tests
    // =========================================================================

    #[test]
    fn phil_health_contribution_within_band() {
        let rates = ContributionRates::default();

        assert_eq!(rates.phil_health_contribution(dec!(30000)), dec!(750.00));
    }

    #[test]
    fn phil_health_contribution_applies_floor() {
        let rates = ContributionRates::default();

        assert_eq!(rates.phil_health_contribution(dec!(5000)), dec!(250.00));
    }

    #[test]
    fn phil_health_contribution_applies_ceiling() {
        let rates = ContributionRates::default();

        assert_eq!(rates.phil_health_contribution(dec!(200000)), dec!(2500.00));
    }

    // =========================================================================
    // Pag-IBIG tests
    // =========================================================================

    #[test]
    fn pagibig_uses_low_rate_at_threshold() {
        let rates = ContributionRates::default();

        assert_eq!(rates.pagibig_contribution(dec!(1500)), dec!(15.00));
    }

    #[test]
    fn pagibig_uses_high_rate_above_threshold() {
        let rates = ContributionRates::default();

        assert_eq!(rates.pagibig_contribution(dec!(1500.01)), dec!(30.00));
        assert_eq!(rates.pagibig_contribution(dec!(10000)), dec!(200.00));
    }

    #[test]
    fn pagibig_is_capped() {
        let rates = ContributionRates::default();

        assert_eq!(rates.pagibig_contribution(dec!(50000)), dec!(300.00));
    }

    // =========================================================================
    // breakdown tests
    // =========================================================================

    #[test]
    fn breakdown_of_zero_salary_is_zero() {
        let breakdown = ContributionRates::default().breakdown(dec!(0));

        assert_eq!(
            breakdown,
            ContributionBreakdown {
                sss: dec!(0),
                phil_health: dec!(0),
                pagibig: dec!(0),
                total: dec!(0),
            }
        );
    }

    #[test]
    fn breakdown_total_is_sum_of_parts() {
        let breakdown = ContributionRates::default().breakdown(dec!(20000));

        assert_eq!(breakdown.sss, dec!(1000.00));
        assert_eq!(breakdown.phil_health, dec!(500.00));
        assert_eq!(breakdown.pagibig, dec!(300.00));
        assert_eq!(breakdown.total, dec!(1800.00));
    }
}
