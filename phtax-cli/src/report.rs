//! Plain-text rendering of calculation results.
//!
//! A [`Report`] is a title followed by sections of label/value rows. Labels
//! are left-aligned and values right-aligned to a common column so amounts
//! line up.

use std::fmt;

use phtax_core::TaxTypeInfo;
use phtax_core::calculations::freelancer::FLAT_TAX_THRESHOLD;
use phtax_core::calculations::{
    CustomsCalculation, FreelancerCalculation, OtherTaxLine, TaxCalculation, VatComputation,
};
use phtax_core::rates::{RateLine, TaxRateEntry};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::utils::{format_peso, format_rate};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    heading: String,
    rows: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    title: String,
    sections: Vec<Section>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    /// Starts a new section; following rows belong to it.
    pub fn section(
        mut self,
        heading: impl Into<String>,
    ) -> Self {
        self.sections.push(Section {
            heading: heading.into(),
            rows: Vec::new(),
        });
        self
    }

    pub fn row(
        mut self,
        label: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        if self.sections.is_empty() {
            self = self.section("");
        }
        if let Some(section) = self.sections.last_mut() {
            section.rows.push((label.into(), value.into()));
        }
        self
    }

    pub fn amount(
        self,
        label: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        self.row(label, format_peso(amount))
    }
}

impl fmt::Display for Report {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let rows = self.sections.iter().flat_map(|s| s.rows.iter());
        let label_width = rows.clone().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
        let value_width = rows.map(|(_, v)| v.chars().count()).max().unwrap_or(0);

        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;

        for section in &self.sections {
            writeln!(f)?;
            if !section.heading.is_empty() {
                writeln!(f, "{}", section.heading)?;
            }
            for (label, value) in &section.rows {
                writeln!(f, "  {label:<label_width$}  {value:>value_width$}")?;
            }
        }
        Ok(())
    }
}

/// Serializes an output record as TOML.
pub fn to_toml<T: Serialize>(value: &T) -> Result<String, toml::ser::Error> {
    toml::to_string(value)
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

// --- Income tax ---

/// Result of the `income-tax` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeTaxResult {
    pub table: String,
    pub effective_date: String,
    pub taxable_income: Decimal,
    pub income_tax: Decimal,
    pub tax_bracket: String,
}

pub fn income_tax(result: &IncomeTaxResult) -> Report {
    Report::new("Annual Income Tax")
        .row("Table", result.table.as_str())
        .row("Effective", result.effective_date.as_str())
        .section("Computation")
        .amount("Taxable income", result.taxable_income)
        .row("Bracket", result.tax_bracket.as_str())
        .amount("Income tax", result.income_tax)
}

// --- Compensation ---

pub fn compensation(result: &TaxCalculation) -> Report {
    Report::new("Compensation Income Tax")
        .section("Monthly")
        .amount("Gross salary", result.gross_salary)
        .amount("SSS", result.sss_contribution)
        .amount("PhilHealth", result.phil_health_contribution)
        .amount("Pag-IBIG", result.pagibig_contribution)
        .amount("Total contributions", result.total_contributions)
        .amount("Taxable income", result.taxable_income)
        .amount("Withholding tax", result.monthly_tax)
        .amount("Net salary", result.net_salary)
        .section("Annual")
        .amount("Gross salary", result.annual_salary)
        .amount("Taxable income", result.annual_taxable_income)
        .amount("Income tax", result.annual_tax)
        .row("Bracket", result.tax_bracket.as_str())
}

// --- VAT ---

pub fn vat(
    result: &VatComputation,
    inclusive: bool,
) -> Report {
    let title = if inclusive {
        "Value Added Tax (extracted)"
    } else {
        "Value Added Tax"
    };
    Report::new(title)
        .amount("Base amount", result.base_amount)
        .row("Rate", format_rate(result.rate))
        .amount("VAT", result.amount)
        .amount("Total amount", result.total_amount)
}

// --- Customs ---

pub fn customs(result: &CustomsCalculation) -> Report {
    let goods = &result.goods;
    let dv = &result.dutiable_value;
    let charges = &result.charges;
    let summary = &result.summary;

    let mut report = Report::new("Customs Duty & Import Tax");
    if !goods.ahtn_code.is_empty() || !goods.description.is_empty() {
        report = report
            .section("Goods")
            .row("AHTN code", goods.ahtn_code.as_str())
            .row("Description", goods.description.as_str());
    }

    report
        .row("Rate of duty", format_rate(goods.rate_of_duty))
        .section("Dutiable Value")
        .row("FOB/FCA value", dv.fob_fca_value.to_string())
        .row("Freight", dv.freight.to_string())
        .row("Insurance", dv.insurance.to_string())
        .row("Total (foreign)", dv.total_dutiable_value_foreign.to_string())
        .row("Exchange rate", dv.exchange_rate.to_string())
        .amount("Total (PHP)", dv.total_dutiable_value_php)
        .section("Charges")
        .amount("Customs duty", charges.customs_duty)
        .amount("Excise tax", charges.excise_tax)
        .amount("Brokerage fee", charges.brokerage_fee)
        .amount("Import processing charge", charges.import_processing_charge)
        .amount("BIR documentary stamp", charges.bir_documentary_stamp_tax)
        .amount("Customs documentary stamp", charges.customs_documentary_stamp)
        .amount("Landed cost", charges.total_landed_cost)
        .section("Summary")
        .amount("Customs duty", summary.customs_duty)
        .amount("VAT", summary.vat)
        .amount("Excise tax", summary.excise_tax)
        .amount("Fees and stamps", fees_and_stamps(result))
        .amount("Total tax payable", summary.total_tax_amount)
}

fn fees_and_stamps(result: &CustomsCalculation) -> Decimal {
    let summary = &result.summary;
    summary.import_processing_charge
        + summary.bir_documentary_stamp_tax
        + summary.customs_documentary_stamp
}

// --- Freelancer ---

fn other_tax_row(
    report: Report,
    label: &str,
    line: &OtherTaxLine,
) -> Report {
    let label = format!("{label} ({})", format_rate(line.rate));
    if line.applicable {
        report.amount(label, line.amount)
    } else {
        report.row(label, "Not applicable")
    }
}

pub fn freelancer(result: &FreelancerCalculation) -> Report {
    let graduated = &result.income_tax.graduated;
    let summary = &result.summary;

    let mut report = Report::new(format!(
        "Freelancer Tax ({})",
        result.filing_period.label()
    ))
    .section("Income")
    .amount("Gross sales", result.gross_sales)
    .amount("Deductions", result.deductions)
    .row("Eligible for 8% flat tax", yes_no(result.is_eligible_for_8_percent))
    .row("VAT registration required", yes_no(result.is_vat_required))
    .section("Graduated Tax")
    .amount("Taxable income", graduated.taxable_income)
    .amount("Income tax", graduated.income_tax)
    .amount("Net income", graduated.net_income)
    .section("8% Flat Tax");

    report = match &result.income_tax.flat {
        Some(flat) => report
            .amount("Exemption", flat.exemption)
            .amount("Taxable income", flat.taxable_income)
            .amount("Income tax", flat.income_tax)
            .amount("Net income", flat.net_income),
        None => report.row(
            "Not available",
            format!("annual gross sales above {}", format_peso(FLAT_TAX_THRESHOLD)),
        ),
    };

    report = report.section("Other Taxes");
    report = other_tax_row(report, "Percentage tax", &result.other_taxes.percentage_tax);
    report = other_tax_row(report, "VAT", &result.other_taxes.vat);

    report
        .section("Summary")
        .row("Recommended", result.recommended.label())
        .amount("Income tax", summary.total_income_tax)
        .amount("Other taxes", summary.total_other_tax)
        .amount("Total taxes", summary.total_all_taxes)
        .amount("Net income", summary.net_income)
}

/// Result of the `batch` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub results: Vec<FreelancerCalculation>,
}

pub fn batch(result: &BatchResult) -> Report {
    let mut report = Report::new(format!("Freelancer Batch ({} rows)", result.results.len()));
    for (i, calc) in result.results.iter().enumerate() {
        report = report
            .section(format!(
                "Row {}: {} {}",
                i + 1,
                format_peso(calc.gross_sales),
                calc.filing_period.as_str()
            ))
            .row("Recommended", calc.recommended.label())
            .amount("Total taxes", calc.summary.total_all_taxes)
            .amount("Net income", calc.summary.net_income);
    }
    report
}

// --- Directories ---

/// Result of the `rates` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateDirectory<'a> {
    pub entries: &'a [TaxRateEntry],
}

fn rate_value(line: &RateLine) -> String {
    match line.base_amount {
        Some(base) if base > Decimal::ZERO => {
            format!("{} + {}", format_peso(base), format_rate(line.rate))
        }
        _ => format_rate(line.rate),
    }
}

pub fn rates(directory: &RateDirectory<'_>) -> Report {
    let mut report = Report::new("Philippine Tax Rates");
    for entry in directory.entries {
        report = report
            .section(format!("{} / {}", entry.category.label(), entry.tax_type))
            .row("Effective", entry.effective_date.as_str());
        for line in &entry.rates {
            report = report.row(line.description.as_str(), rate_value(line));
        }
    }
    report
}

/// Result of the `types` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxTypeCatalog {
    pub types: Vec<TaxTypeInfo>,
}

pub fn types(catalog: &TaxTypeCatalog) -> Report {
    let mut report = Report::new("Calculators");
    for info in &catalog.types {
        report = report
            .section(format!("{} ({})", info.name, info.id.as_str()))
            .row("Description", info.description)
            .row("Rate", info.rate)
            .row("Applicable to", info.applicable_to);
    }
    report
}
