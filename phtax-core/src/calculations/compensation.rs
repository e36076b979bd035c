//! Income tax on compensation (employees).
//!
//! The monthly computation runs in this order:
//!
//! 1. SSS, PhilHealth and Pag-IBIG contributions on the gross monthly salary
//! 2. Monthly taxable income = gross − contributions (never below zero)
//! 3. Annual taxable income = monthly × 12
//! 4. Annual tax from the individual income-tax table
//! 5. Monthly tax = annual tax ÷ 12
//! 6. Net salary = gross − contributions − monthly tax
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use phtax_core::calculations::CompensationCalculator;
//! use phtax_core::rates::individual_income_tax;
//!
//! let calculator = CompensationCalculator::new(individual_income_tax());
//! let result = calculator.calculate(dec!(50000));
//!
//! assert_eq!(result.total_contributions, dec!(3300.00));
//! assert_eq!(result.annual_taxable_income, dec!(560400.00));
//! assert_eq!(result.annual_tax, dec!(54580.00));
//! assert_eq!(result.monthly_tax, dec!(4548.33));
//! assert_eq!(result.net_salary, dec!(42151.67));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::BracketTable;
use crate::calculations::common::{clamp_amount, max, round_half_up};
use crate::calculations::contributions::{ContributionRates, ContributionRatesError};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Result of a compensation tax computation. All amounts are monthly unless
/// prefixed with `annual`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculation {
    pub gross_salary: Decimal,
    pub annual_salary: Decimal,
    pub sss_contribution: Decimal,
    pub phil_health_contribution: Decimal,
    pub pagibig_contribution: Decimal,
    pub total_contributions: Decimal,
    pub taxable_income: Decimal,
    pub annual_taxable_income: Decimal,
    pub monthly_tax: Decimal,
    pub annual_tax: Decimal,
    pub net_salary: Decimal,
    /// Description of the income-tax bracket the annual taxable income falls in.
    pub tax_bracket: String,
}

/// Calculator for withholding tax on compensation.
#[derive(Debug, Clone)]
pub struct CompensationCalculator<'a> {
    income_tax: &'a BracketTable,
    contributions: ContributionRates,
}

impl<'a> CompensationCalculator<'a> {
    /// Uses the given income-tax table and the default contribution schedules.
    pub fn new(income_tax: &'a BracketTable) -> Self {
        Self {
            income_tax,
            contributions: ContributionRates::default(),
        }
    }

    /// Uses custom contribution schedules.
    ///
    /// # Errors
    ///
    /// Returns [`ContributionRatesError`] if `contributions` fails validation.
    pub fn with_contribution_rates(
        income_tax: &'a BracketTable,
        contributions: ContributionRates,
    ) -> Result<Self, ContributionRatesError> {
        contributions.validate()?;
        Ok(Self {
            income_tax,
            contributions,
        })
    }

    pub fn contribution_rates(&self) -> &ContributionRates {
        &self.contributions
    }

    /// Computes contributions, tax and net pay for one month's gross salary.
    pub fn calculate(
        &self,
        gross_monthly_salary: Decimal,
    ) -> TaxCalculation {
        let gross = clamp_amount(gross_monthly_salary, "gross_monthly_salary");

        let contributions = self.contributions.breakdown(gross);
        let taxable_income = self.monthly_taxable_income(gross, contributions.total);
        let annual_taxable_income = taxable_income * MONTHS_PER_YEAR;

        let annual_tax = self.income_tax.evaluate(annual_taxable_income);
        let monthly_tax = round_half_up(annual_tax / MONTHS_PER_YEAR);

        let tax_bracket = self
            .income_tax
            .bracket_for(annual_taxable_income)
            .map(|b| b.description.clone())
            .unwrap_or_default();

        let net_salary = round_half_up(gross - contributions.total - monthly_tax);

        debug!(
            gross = %gross,
            contributions = %contributions.total,
            annual_taxable_income = %annual_taxable_income,
            annual_tax = %annual_tax,
            "Computed compensation tax"
        );

        TaxCalculation {
            gross_salary: gross,
            annual_salary: round_half_up(gross * MONTHS_PER_YEAR),
            sss_contribution: contributions.sss,
            phil_health_contribution: contributions.phil_health,
            pagibig_contribution: contributions.pagibig,
            total_contributions: contributions.total,
            taxable_income,
            annual_taxable_income,
            monthly_tax,
            annual_tax,
            net_salary,
            tax_bracket,
        }
    }

    fn monthly_taxable_income(
        &self,
        gross: Decimal,
        total_contributions: Decimal,
    ) -> Decimal {
        round_half_up(max(gross - total_contributions, Decimal::ZERO))
    }
}
