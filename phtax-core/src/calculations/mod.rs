//! Tax calculators.
//!
//! Each calculator is a pure transform from an input record to an output
//! record. Calculators that apply the individual income-tax schedule borrow a
//! [`crate::BracketTable`] so a table loaded at runtime can stand in for the
//! compiled-in one.

pub mod common;
pub mod compensation;
pub mod contributions;
pub mod customs;
pub mod freelancer;
pub mod progressive;
pub mod vat;

pub use compensation::{CompensationCalculator, TaxCalculation};
pub use contributions::{
    ContributionBreakdown, ContributionRates, ContributionRatesError, PagIbigRates,
    PhilHealthRates, SssRates,
};
pub use customs::{
    CustomsCalculation, CustomsCalculator, CustomsCharges, CustomsConfig, CustomsError,
    CustomsInput, CustomsSummary, DutiableValue, Goods,
};
pub use freelancer::{
    FlatTaxOption, FreelancerCalculation, FreelancerCalculator, FreelancerInput,
    FreelancerSummary, GraduatedTaxOption, IncomeTaxMethod, IncomeTaxOptions, OtherTaxLine,
    OtherTaxes,
};
pub use vat::{VAT_RATE, VatComputation, compute_vat, extract_vat};
