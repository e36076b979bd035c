//! Compiled-in policy data: bracket tables and the informational rate
//! directory.
//!
//! Each table is built once per process and handed out by `'static`
//! reference. Callers that need a different income-tax schedule load one with
//! `phtax-data` and pass it to the calculators instead.

use std::sync::OnceLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::calculations::contributions::ContributionRates;
use crate::calculations::freelancer::{FLAT_TAX_RATE, FLAT_TAX_THRESHOLD, PERCENTAGE_TAX_RATE};
use crate::calculations::vat::VAT_RATE;
use crate::{BracketTable, TaxBracket};

pub const INDIVIDUAL_INCOME_TAX: &str = "individual_income_tax";
pub const BROKERAGE_FEES: &str = "brokerage_fees";
pub const IMPORT_PROCESSING_CHARGES: &str = "import_processing_charges";

static INDIVIDUAL_INCOME_TAX_TABLE: OnceLock<BracketTable> = OnceLock::new();
static BROKERAGE_FEE_TABLE: OnceLock<BracketTable> = OnceLock::new();
static IMPORT_PROCESSING_TABLE: OnceLock<BracketTable> = OnceLock::new();
static TAX_RATE_DIRECTORY: OnceLock<Vec<TaxRateEntry>> = OnceLock::new();

fn bracket(
    min: Decimal,
    max: Option<Decimal>,
    rate: Decimal,
    base_amount: Decimal,
    description: &str,
) -> TaxBracket {
    TaxBracket {
        min,
        max,
        rate,
        base_amount,
        description: description.to_string(),
    }
}

/// Flat fee for `[min, max)`.
fn fee(
    min: Decimal,
    max: Decimal,
    amount: Decimal,
) -> TaxBracket {
    bracket(min, Some(max), Decimal::ZERO, amount, "")
}

/// Graduated income-tax table for individuals, effective January 1, 2025.
///
/// ```
/// use rust_decimal_macros::dec;
/// use phtax_core::rates::individual_income_tax;
///
/// assert_eq!(individual_income_tax().evaluate(dec!(500000)), dec!(42500.00));
/// ```
pub fn individual_income_tax() -> &'static BracketTable {
    INDIVIDUAL_INCOME_TAX_TABLE.get_or_init(|| {
        BracketTable::new_unchecked(
            INDIVIDUAL_INCOME_TAX,
            "January 1, 2025",
            vec![
                bracket(dec!(0), Some(dec!(250000)), dec!(0), dec!(0), "Tax-free bracket"),
                bracket(
                    dec!(250000),
                    Some(dec!(400000)),
                    dec!(0.15),
                    dec!(0),
                    "15% of the excess over ₱250,000",
                ),
                bracket(
                    dec!(400000),
                    Some(dec!(800000)),
                    dec!(0.20),
                    dec!(22500),
                    "₱22,500 + 20% of the excess over ₱400,000",
                ),
                bracket(
                    dec!(800000),
                    Some(dec!(2000000)),
                    dec!(0.25),
                    dec!(102500),
                    "₱102,500 + 25% of the excess over ₱800,000",
                ),
                bracket(
                    dec!(2000000),
                    Some(dec!(8000000)),
                    dec!(0.30),
                    dec!(402500),
                    "₱402,500 + 30% of the excess over ₱2,000,000",
                ),
                bracket(
                    dec!(8000000),
                    None,
                    dec!(0.35),
                    dec!(2202500),
                    "₱2,202,500 + 35% of the excess over ₱8,000,000",
                ),
            ],
        )
    })
}

/// Customs brokerage fee by dutiable value in pesos.
pub fn brokerage_fees() -> &'static BracketTable {
    BROKERAGE_FEE_TABLE.get_or_init(|| {
        BracketTable::new_unchecked(
            BROKERAGE_FEES,
            "Current",
            vec![
                fee(dec!(0), dec!(10000), dec!(1300)),
                fee(dec!(10000), dec!(20000), dec!(2000)),
                fee(dec!(20000), dec!(30000), dec!(2700)),
                fee(dec!(30000), dec!(40000), dec!(3300)),
                fee(dec!(40000), dec!(50000), dec!(3600)),
                fee(dec!(50000), dec!(60000), dec!(4000)),
                fee(dec!(60000), dec!(100000), dec!(4700)),
                fee(dec!(100000), dec!(200000), dec!(5300)),
                bracket(
                    dec!(200000),
                    None,
                    dec!(0.00125),
                    dec!(5300),
                    "₱5,300 + 0.125% of the excess over ₱200,000",
                ),
            ],
        )
    })
}

/// Bureau of Customs import processing charge by dutiable value in pesos.
pub fn import_processing_charges() -> &'static BracketTable {
    IMPORT_PROCESSING_TABLE.get_or_init(|| {
        BracketTable::new_unchecked(
            IMPORT_PROCESSING_CHARGES,
            "Current",
            vec![
                fee(dec!(0), dec!(25000), dec!(250)),
                fee(dec!(25000), dec!(50000), dec!(500)),
                fee(dec!(50000), dec!(250000), dec!(750)),
                fee(dec!(250000), dec!(500000), dec!(1000)),
                fee(dec!(500000), dec!(750000), dec!(1500)),
                bracket(dec!(750000), None, dec!(0), dec!(2000), ""),
            ],
        )
    })
}

/// Grouping used by the rate directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RateCategory {
    IncomeTax,
    BusinessTax,
    WithholdingTax,
    OtherTaxes,
    Contributions,
}

impl RateCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::IncomeTax => "Income Tax",
            Self::BusinessTax => "Business Tax",
            Self::WithholdingTax => "Withholding Tax",
            Self::OtherTaxes => "Other Taxes",
            Self::Contributions => "Contributions",
        }
    }
}

/// One line of a directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLine {
    pub min: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
    pub rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_amount: Option<Decimal>,
    pub description: String,
}

impl RateLine {
    fn flat(
        rate: Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            min: Decimal::ZERO,
            max: None,
            rate,
            base_amount: None,
            description: description.into(),
        }
    }

    fn banded(
        min: Decimal,
        max: Option<Decimal>,
        rate: Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            min,
            max,
            rate,
            base_amount: None,
            description: description.into(),
        }
    }
}

impl From<&TaxBracket> for RateLine {
    fn from(bracket: &TaxBracket) -> Self {
        Self {
            min: bracket.min,
            max: bracket.max,
            rate: bracket.rate,
            base_amount: Some(bracket.base_amount),
            description: bracket.description.clone(),
        }
    }
}

/// A tax or contribution in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxRateEntry {
    pub category: RateCategory,
    pub tax_type: String,
    pub description: String,
    pub effective_date: String,
    pub rates: Vec<RateLine>,
}

fn entry(
    category: RateCategory,
    tax_type: &str,
    description: &str,
    effective_date: &str,
    rates: Vec<RateLine>,
) -> TaxRateEntry {
    TaxRateEntry {
        category,
        tax_type: tax_type.to_string(),
        description: description.to_string(),
        effective_date: effective_date.to_string(),
        rates,
    }
}

/// `0.095` -> `"9.5"`.
fn percent(rate: Decimal) -> String {
    (rate * dec!(100)).normalize().to_string()
}

/// Reference list of Philippine tax rates and mandatory contributions.
///
/// The individual income-tax entry is generated from
/// [`individual_income_tax`] and the contribution entries from
/// [`ContributionRates::default`].
pub fn tax_rate_directory() -> &'static [TaxRateEntry] {
    TAX_RATE_DIRECTORY.get_or_init(build_directory)
}

fn build_directory() -> Vec<TaxRateEntry> {
    use RateCategory::*;

    let income = individual_income_tax();
    let contributions = ContributionRates::default();
    let sss = &contributions.sss;
    let phil_health = &contributions.phil_health;
    let pagibig = &contributions.pagibig;

    vec![
        entry(
            IncomeTax,
            "Individual Income Tax (Compensation)",
            "Progressive tax rates for employees and compensation earners",
            income.effective_date(),
            income.brackets().iter().map(RateLine::from).collect(),
        ),
        entry(
            IncomeTax,
            "Corporate Income Tax",
            "Tax rates for domestic and foreign corporations",
            "July 1, 2020",
            vec![
                RateLine::flat(dec!(0.25), "Domestic corporations (25%)"),
                RateLine::flat(dec!(0.30), "Foreign corporations (30%)"),
            ],
        ),
        entry(
            IncomeTax,
            "Minimum Corporate Income Tax (MCIT)",
            "Minimum tax based on gross income for corporations",
            "Current",
            vec![RateLine::flat(
                dec!(0.02),
                "2% of gross income (starting 4th year of operation)",
            )],
        ),
        entry(
            BusinessTax,
            "Value Added Tax (VAT)",
            "Tax on sale of goods and services",
            "Current",
            vec![
                RateLine::flat(VAT_RATE, format!("Standard VAT rate ({}%)", percent(VAT_RATE))),
                RateLine::flat(Decimal::ZERO, "Zero-rated transactions"),
                RateLine::flat(Decimal::ZERO, "VAT-exempt transactions"),
            ],
        ),
        entry(
            BusinessTax,
            "Percentage Tax",
            "Alternative to VAT for smaller businesses",
            "Current",
            vec![RateLine::flat(
                PERCENTAGE_TAX_RATE,
                format!("{}% of gross quarterly sales/receipts", percent(PERCENTAGE_TAX_RATE)),
            )],
        ),
        entry(
            BusinessTax,
            "Simplified Income Tax (8% Rate)",
            "Optional simplified tax computation for eligible taxpayers",
            "Current",
            vec![RateLine::banded(
                Decimal::ZERO,
                Some(FLAT_TAX_THRESHOLD),
                FLAT_TAX_RATE,
                "8% of gross sales/receipts (for businesses with gross sales below ₱3M)",
            )],
        ),
        entry(
            WithholdingTax,
            "Creditable Withholding Tax",
            "Tax withheld on various payments to suppliers and service providers",
            "Current",
            vec![
                RateLine::flat(dec!(0.01), "Professional fees, rentals of real property (1%)"),
                RateLine::flat(
                    dec!(0.015),
                    "Gross payments to general professional partnerships (1.5%)",
                ),
                RateLine::flat(dec!(0.02), "Payments to contractors, suppliers of goods (2%)"),
                RateLine::flat(dec!(0.05), "Income payments to resident aliens (5%)"),
                RateLine::flat(dec!(0.10), "Professional fees to individuals (10%)"),
                RateLine::flat(dec!(0.15), "Income payments to non-resident aliens (15%)"),
            ],
        ),
        entry(
            WithholdingTax,
            "Final Withholding Tax",
            "Final tax on passive income",
            "Current",
            vec![
                RateLine::flat(dec!(0.20), "Interest from bank deposits, royalties (20%)"),
                RateLine::flat(dec!(0.10), "Cash dividends from domestic corporations (10%)"),
                RateLine::flat(
                    dec!(0.15),
                    "Cash dividends to non-resident foreign corporations (15%)",
                ),
                RateLine::flat(dec!(0.25), "Interest from foreign currency deposits (25%)"),
            ],
        ),
        entry(
            OtherTaxes,
            "Capital Gains Tax",
            "Tax on gains from sale of capital assets",
            "Current",
            vec![
                RateLine::flat(dec!(0.06), "Sale of real property (6%)"),
                RateLine::flat(dec!(0.15), "Sale of shares not listed in stock exchange (15%)"),
            ],
        ),
        entry(
            OtherTaxes,
            "Donor's Tax",
            "Tax on gifts and donations",
            "Current",
            vec![
                RateLine::banded(dec!(0), Some(dec!(250000)), dec!(0), "Exempt (up to ₱250,000)"),
                RateLine::banded(dec!(250000), None, dec!(0.06), "6% on excess over ₱250,000"),
            ],
        ),
        entry(
            OtherTaxes,
            "Estate Tax",
            "Tax on inherited property",
            "Current",
            vec![
                RateLine::banded(dec!(0), Some(dec!(5000000)), dec!(0.06), "6% (up to ₱5,000,000)"),
                RateLine::banded(dec!(5000000), None, dec!(0.12), "12% (exceeding ₱5,000,000)"),
            ],
        ),
        entry(
            Contributions,
            "SSS Contributions",
            "Social Security System contributions for employees",
            "2025",
            vec![
                RateLine::banded(
                    sss.min_salary_credit,
                    Some(sss.max_salary_credit),
                    sss.employee_rate,
                    format!("Employee contribution ({}%)", percent(sss.employee_rate)),
                ),
                RateLine::banded(
                    sss.min_salary_credit,
                    Some(sss.max_salary_credit),
                    sss.employer_rate,
                    format!("Employer contribution ({}%)", percent(sss.employer_rate)),
                ),
            ],
        ),
        // The premium is split equally between employee and employer.
        entry(
            Contributions,
            "PhilHealth Contributions",
            "Philippine Health Insurance Corporation contributions",
            "2025",
            vec![
                RateLine::flat(
                    phil_health.rate,
                    format!("Employee contribution ({}% of salary)", percent(phil_health.rate)),
                ),
                RateLine::flat(
                    phil_health.rate,
                    format!("Employer contribution ({}% of salary)", percent(phil_health.rate)),
                ),
            ],
        ),
        entry(
            Contributions,
            "Pag-IBIG Contributions",
            "Home Development Mutual Fund contributions",
            "2025",
            vec![
                RateLine::banded(
                    Decimal::ZERO,
                    Some(pagibig.threshold),
                    pagibig.low_rate,
                    format!(
                        "Employee contribution ({}% for salary ≤ ₱1,500)",
                        percent(pagibig.low_rate)
                    ),
                ),
                RateLine::banded(
                    pagibig.threshold,
                    None,
                    pagibig.high_rate,
                    format!(
                        "Employee contribution ({}% for salary > ₱1,500), max ₱{}",
                        percent(pagibig.high_rate),
                        pagibig.max_contribution.normalize()
                    ),
                ),
                RateLine::banded(
                    Decimal::ZERO,
                    Some(pagibig.threshold),
                    dec!(0.02),
                    "Employer contribution (2% for salary ≤ ₱1,500)",
                ),
                RateLine::banded(
                    pagibig.threshold,
                    None,
                    dec!(0.02),
                    "Employer contribution (2% for salary > ₱1,500), max ₱300",
                ),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // compiled table tests
    // =========================================================================

    #[test]
    fn compiled_tables_pass_validation() {
        for table in [individual_income_tax(), brokerage_fees(), import_processing_charges()] {
            let checked = BracketTable::new(
                table.name(),
                table.effective_date(),
                table.brackets().to_vec(),
            );

            assert_eq!(checked.as_ref(), Ok(table), "table {}", table.name());
        }
    }

    #[test]
    fn individual_income_tax_has_six_brackets() {
        let table = individual_income_tax();

        assert_eq!(table.name(), INDIVIDUAL_INCOME_TAX);
        assert_eq!(table.brackets().len(), 6);
        assert_eq!(table.brackets()[5].max, None);
    }

    #[test]
    fn brokerage_fee_is_flat_within_a_band() {
        assert_eq!(brokerage_fees().evaluate(dec!(9999.99)), dec!(1300.00));
        assert_eq!(brokerage_fees().evaluate(dec!(10000)), dec!(2000.00));
        assert_eq!(brokerage_fees().evaluate(dec!(199999)), dec!(5300.00));
    }

    #[test]
    fn import_processing_charge_top_band() {
        assert_eq!(import_processing_charges().evaluate(dec!(750000)), dec!(2000.00));
        assert_eq!(import_processing_charges().evaluate(dec!(24999.99)), dec!(250.00));
    }

    // =========================================================================
    // tax_rate_directory tests
    // =========================================================================

    #[test]
    fn directory_income_entry_matches_table() {
        let entry = &tax_rate_directory()[0];

        assert_eq!(entry.category, RateCategory::IncomeTax);
        assert_eq!(entry.effective_date, "January 1, 2025");
        assert_eq!(entry.rates.len(), individual_income_tax().brackets().len());
        assert_eq!(entry.rates[2].base_amount, Some(dec!(22500)));
        assert_eq!(entry.rates[2].description, "₱22,500 + 20% of the excess over ₱400,000");
    }

    #[test]
    fn directory_covers_every_category() {
        let entries = tax_rate_directory();

        assert_eq!(entries.len(), 14);
        for category in [
            RateCategory::IncomeTax,
            RateCategory::BusinessTax,
            RateCategory::WithholdingTax,
            RateCategory::OtherTaxes,
            RateCategory::Contributions,
        ] {
            assert!(entries.iter().any(|e| e.category == category), "{}", category.label());
        }
    }

    #[test]
    fn directory_contribution_lines_follow_default_rates() {
        let sss = tax_rate_directory()
            .iter()
            .find(|e| e.tax_type == "SSS Contributions")
            .expect("SSS entry");

        assert_eq!(sss.rates[0].description, "Employee contribution (5%)");
        assert_eq!(sss.rates[1].description, "Employer contribution (9.5%)");
        assert_eq!(sss.rates[0].min, dec!(4000));
        assert_eq!(sss.rates[0].max, Some(dec!(35000)));
    }

    #[test]
    fn percent_drops_trailing_zeros() {
        assert_eq!(percent(dec!(0.12)), "12");
        assert_eq!(percent(dec!(0.025)), "2.5");
    }
}
