//! Philippine tax computation engine.
//!
//! The free functions below are the entry points a presentation layer calls.
//! They apply the compiled-in schedules from [`rates`]; construct the
//! calculators in [`calculations`] directly to supply a different income-tax
//! table or contribution schedule.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use phtax_core::{FilingPeriod, calculate_freelancer_tax};
//! use phtax_core::calculations::{FreelancerInput, IncomeTaxMethod};
//!
//! let input = FreelancerInput::new(dec!(250000)).with_deductions(dec!(100000));
//! let result = calculate_freelancer_tax(&input);
//!
//! assert_eq!(result.filing_period, FilingPeriod::Quarterly);
//! assert_eq!(result.recommended, IncomeTaxMethod::GraduatedTax);
//! assert_eq!(result.summary.net_income, dec!(238750.00));
//! ```

pub mod calculations;
pub mod models;
pub mod rates;

pub use models::*;

use rust_decimal::Decimal;

use calculations::{
    CompensationCalculator, CustomsCalculation, CustomsCalculator, CustomsError, CustomsInput,
    FreelancerCalculation, FreelancerCalculator, FreelancerInput, TaxCalculation,
    VatComputation,
};

/// Annual income tax on `annual_taxable_income` under the individual table.
pub fn calculate_income_tax(annual_taxable_income: Decimal) -> Decimal {
    rates::individual_income_tax().evaluate(annual_taxable_income)
}

/// Contributions, withholding tax and net pay for a monthly gross salary.
pub fn calculate_compensation_tax(gross_monthly_salary: Decimal) -> TaxCalculation {
    CompensationCalculator::new(rates::individual_income_tax()).calculate(gross_monthly_salary)
}

/// 12% VAT on a VAT-exclusive amount.
pub fn calculate_vat(base_amount: Decimal) -> VatComputation {
    calculations::compute_vat(base_amount)
}

/// Duties, taxes and fees on an import shipment.
///
/// # Errors
///
/// Returns [`CustomsError`] if `input` fails validation.
pub fn calculate_customs_duty(input: &CustomsInput) -> Result<CustomsCalculation, CustomsError> {
    CustomsCalculator::default().calculate(input)
}

/// Graduated and 8% regimes for a self-employed taxpayer, with a
/// recommendation.
pub fn calculate_freelancer_tax(input: &FreelancerInput) -> FreelancerCalculation {
    FreelancerCalculator::new(rates::individual_income_tax()).calculate(input)
}
