//! Income, percentage and value-added tax for self-employed individuals.
//!
//! Amounts are entered per filing period and normalized to a year before any
//! threshold or bracket is applied:
//!
//! ```text
//! annual = period amount × (4 if quarterly, 1 if yearly)
//! ```
//!
//! Two income-tax regimes are computed side by side:
//!
//! - **Graduated**: the individual income-tax table applied to
//!   `annual gross − annual deductions − ₱250,000`.
//! - **8% flat**: `8% × (annual gross − ₱250,000)`, available only while
//!   annual gross sales stay under ₱3,000,000. Deductions are ignored.
//!
//! On top of either regime the taxpayer owes exactly one of 3% percentage tax
//! (below ₱3,000,000) or 12% VAT (at or above ₱3,000,000). The regime that
//! leaves the higher net income is recommended; a tie goes to graduated.
//!
//! Every amount in the result is per filing period, rounded to centavos.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{ZERO_PESOS, clamp_amount, max, round_half_up};
use crate::calculations::vat::VAT_RATE;
use crate::{BracketTable, FilingPeriod};

/// Annual gross sales at which VAT registration becomes mandatory.
pub const VAT_THRESHOLD: Decimal = dec!(3000000);

/// Annual gross sales at which the 8% option is no longer available.
pub const FLAT_TAX_THRESHOLD: Decimal = dec!(3000000);

/// Annual amount exempt from income tax for individuals.
pub const INDIVIDUAL_EXEMPTION: Decimal = dec!(250000);

pub const PERCENTAGE_TAX_RATE: Decimal = dec!(0.03);

pub const FLAT_TAX_RATE: Decimal = dec!(0.08);

/// Sales and deductions for one filing period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreelancerInput {
    pub gross_sales: Decimal,
    pub deductions: Decimal,
    pub filing_period: FilingPeriod,
}

impl FreelancerInput {
    /// Quarterly filing with no deductions.
    pub fn new(gross_sales: Decimal) -> Self {
        Self {
            gross_sales,
            deductions: Decimal::ZERO,
            filing_period: FilingPeriod::default(),
        }
    }

    pub fn with_deductions(
        mut self,
        deductions: Decimal,
    ) -> Self {
        self.deductions = deductions;
        self
    }

    pub fn with_filing_period(
        mut self,
        filing_period: FilingPeriod,
    ) -> Self {
        self.filing_period = filing_period;
        self
    }
}

/// Income-tax regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IncomeTaxMethod {
    GraduatedTax,
    FlatTax8Percent,
}

impl IncomeTaxMethod {
    pub fn label(&self) -> &'static str {
        match self {
            Self::GraduatedTax => "Graduated Tax",
            Self::FlatTax8Percent => "8% Flat Tax",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraduatedTaxOption {
    pub taxable_income: Decimal,
    pub income_tax: Decimal,
    /// Income tax plus percentage tax or VAT.
    pub total_tax: Decimal,
    pub net_income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatTaxOption {
    /// The ₱250,000 annual exemption spread over the filing period.
    pub exemption: Decimal,
    pub taxable_income: Decimal,
    pub income_tax: Decimal,
    pub total_tax: Decimal,
    pub net_income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxOptions {
    pub graduated: GraduatedTaxOption,
    /// `None` when annual gross sales reach the flat-tax threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flat: Option<FlatTaxOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherTaxLine {
    pub applicable: bool,
    pub rate: Decimal,
    pub amount: Decimal,
}

/// Percentage tax and VAT. Exactly one of the two is applicable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherTaxes {
    pub percentage_tax: OtherTaxLine,
    pub vat: OtherTaxLine,
}

impl OtherTaxes {
    pub fn total(&self) -> Decimal {
        self.percentage_tax.amount + self.vat.amount
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreelancerSummary {
    pub method: IncomeTaxMethod,
    pub total_income_tax: Decimal,
    pub total_other_tax: Decimal,
    pub total_all_taxes: Decimal,
    pub net_income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreelancerCalculation {
    pub gross_sales: Decimal,
    pub deductions: Decimal,
    pub filing_period: FilingPeriod,
    pub is_eligible_for_8_percent: bool,
    pub is_vat_required: bool,
    pub income_tax: IncomeTaxOptions,
    pub other_taxes: OtherTaxes,
    pub recommended: IncomeTaxMethod,
    pub summary: FreelancerSummary,
}

/// Calculator for self-employed and professional income.
#[derive(Debug, Clone)]
pub struct FreelancerCalculator<'a> {
    income_tax: &'a BracketTable,
}

impl<'a> FreelancerCalculator<'a> {
    pub fn new(income_tax: &'a BracketTable) -> Self {
        Self { income_tax }
    }

    /// Computes both regimes and recommends the cheaper one.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use phtax_core::calculations::{FreelancerCalculator, FreelancerInput, IncomeTaxMethod};
    /// use phtax_core::rates::individual_income_tax;
    /// use phtax_core::FilingPeriod;
    ///
    /// let input = FreelancerInput::new(dec!(1000000)).with_filing_period(FilingPeriod::Yearly);
    /// let result = FreelancerCalculator::new(individual_income_tax()).calculate(&input);
    ///
    /// assert_eq!(result.recommended, IncomeTaxMethod::FlatTax8Percent);
    /// assert_eq!(result.summary.total_all_taxes, dec!(90000.00));
    /// ```
    pub fn calculate(
        &self,
        input: &FreelancerInput,
    ) -> FreelancerCalculation {
        let gross_sales = clamp_amount(input.gross_sales, "gross_sales");
        let deductions = clamp_amount(input.deductions, "deductions");
        let period = input.filing_period;
        let multiplier = period.multiplier();

        let annual_gross_sales = gross_sales * multiplier;
        let annual_deductions = deductions * multiplier;

        let is_eligible_for_8_percent = annual_gross_sales < FLAT_TAX_THRESHOLD;
        let is_vat_required = annual_gross_sales >= VAT_THRESHOLD;

        debug!(
            period = period.as_str(),
            annual_gross_sales = %annual_gross_sales,
            annual_deductions = %annual_deductions,
            is_eligible_for_8_percent,
            is_vat_required,
            "Normalized freelancer income to annual"
        );

        let other_taxes = other_taxes(annual_gross_sales, is_vat_required, period);
        let other_total = other_taxes.total();

        let graduated = self.graduated_option(
            gross_sales,
            annual_gross_sales,
            annual_deductions,
            period,
            other_total,
        );

        let flat = is_eligible_for_8_percent
            .then(|| flat_option(gross_sales, annual_gross_sales, period, other_total));

        let recommended = match &flat {
            Some(flat) if flat.net_income > graduated.net_income => {
                IncomeTaxMethod::FlatTax8Percent
            }
            _ => IncomeTaxMethod::GraduatedTax,
        };

        let (total_income_tax, total_all_taxes, net_income) = match (&flat, recommended) {
            (Some(flat), IncomeTaxMethod::FlatTax8Percent) => {
                (flat.income_tax, flat.total_tax, flat.net_income)
            }
            _ => (graduated.income_tax, graduated.total_tax, graduated.net_income),
        };

        debug!(
            recommended = recommended.label(),
            total_all_taxes = %total_all_taxes,
            net_income = %net_income,
            "Selected income-tax method"
        );

        FreelancerCalculation {
            gross_sales,
            deductions,
            filing_period: period,
            is_eligible_for_8_percent,
            is_vat_required,
            income_tax: IncomeTaxOptions { graduated, flat },
            other_taxes,
            recommended,
            summary: FreelancerSummary {
                method: recommended,
                total_income_tax,
                total_other_tax: other_total,
                total_all_taxes,
                net_income,
            },
        }
    }

    fn graduated_option(
        &self,
        gross_sales: Decimal,
        annual_gross_sales: Decimal,
        annual_deductions: Decimal,
        period: FilingPeriod,
        other_total: Decimal,
    ) -> GraduatedTaxOption {
        let annual_taxable =
            max(annual_gross_sales - annual_deductions - INDIVIDUAL_EXEMPTION, Decimal::ZERO);
        let annual_tax = self.income_tax.evaluate(annual_taxable);

        let income_tax = per_period(annual_tax, period);
        let total_tax = income_tax + other_total;

        GraduatedTaxOption {
            taxable_income: per_period(annual_taxable, period),
            income_tax,
            total_tax,
            net_income: round_half_up(gross_sales - total_tax),
        }
    }
}

fn flat_option(
    gross_sales: Decimal,
    annual_gross_sales: Decimal,
    period: FilingPeriod,
    other_total: Decimal,
) -> FlatTaxOption {
    let annual_taxable = max(annual_gross_sales - INDIVIDUAL_EXEMPTION, Decimal::ZERO);
    let income_tax = per_period(annual_taxable * FLAT_TAX_RATE, period);
    let total_tax = income_tax + other_total;

    FlatTaxOption {
        exemption: per_period(INDIVIDUAL_EXEMPTION, period),
        taxable_income: per_period(annual_taxable, period),
        income_tax,
        total_tax,
        net_income: round_half_up(gross_sales - total_tax),
    }
}

fn other_taxes(
    annual_gross_sales: Decimal,
    is_vat_required: bool,
    period: FilingPeriod,
) -> OtherTaxes {
    let line = |applicable: bool, rate: Decimal| OtherTaxLine {
        applicable,
        rate,
        amount: if applicable {
            per_period(annual_gross_sales * rate, period)
        } else {
            ZERO_PESOS
        },
    };

    OtherTaxes {
        percentage_tax: line(!is_vat_required, PERCENTAGE_TAX_RATE),
        vat: line(is_vat_required, VAT_RATE),
    }
}

fn per_period(
    annual: Decimal,
    period: FilingPeriod,
) -> Decimal {
    round_half_up(annual / period.multiplier())
}
