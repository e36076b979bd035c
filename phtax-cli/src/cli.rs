use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use phtax_core::FilingPeriod;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::utils::{parse_amount, parse_period};

/// Philippine tax calculator.
///
/// Computes compensation income tax, VAT, customs duties and freelancer tax
/// using the current BIR and Bureau of Customs schedules.
#[derive(Debug, Parser)]
#[command(name = "phtax", version, about)]
pub struct Cli {
    /// Configuration file. Defaults to ./phtax.toml when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `phtax_core=trace`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Bracket CSV whose `individual_income_tax` table replaces the built-in one.
    #[arg(long, global = true)]
    pub income_tax_brackets: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Toml,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Withholding tax, contributions and net pay for a monthly salary.
    Compensation {
        /// Gross monthly salary.
        #[arg(long, value_parser = parse_amount)]
        salary: Decimal,
    },

    /// Annual income tax under the graduated table.
    IncomeTax {
        /// Annual taxable income.
        #[arg(long, value_parser = parse_amount)]
        taxable_income: Decimal,
    },

    /// 12% value-added tax.
    Vat {
        #[arg(long, value_parser = parse_amount)]
        amount: Decimal,

        /// Treat the amount as VAT-inclusive and extract the tax.
        #[arg(long)]
        inclusive: bool,
    },

    /// Customs duty, import VAT and fees on a shipment.
    Customs {
        /// FOB/FCA value in the invoice currency.
        #[arg(long, value_parser = parse_amount)]
        fob: Decimal,

        #[arg(long, value_parser = parse_amount, default_value = "0")]
        freight: Decimal,

        #[arg(long, value_parser = parse_amount, default_value = "0")]
        insurance: Decimal,

        /// Pesos per unit of the invoice currency.
        #[arg(long, value_parser = parse_amount)]
        exchange_rate: Decimal,

        /// Rate of duty as a decimal, e.g. 0.10 for 10%.
        #[arg(long, value_parser = parse_amount)]
        duty_rate: Decimal,

        /// Ad valorem excise rate as a decimal.
        #[arg(long, value_parser = parse_amount, default_value = "0")]
        excise_rate: Decimal,

        /// AHTN tariff code.
        #[arg(long, default_value = "")]
        ahtn: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Graduated vs 8% flat tax for a self-employed taxpayer.
    Freelancer {
        /// Gross sales for the filing period.
        #[arg(long, value_parser = parse_amount)]
        gross_sales: Decimal,

        /// Deductible expenses for the filing period.
        #[arg(long, value_parser = parse_amount, default_value = "0")]
        deductions: Decimal,

        #[arg(long, value_parser = parse_period, default_value = "quarterly")]
        period: FilingPeriod,
    },

    /// Run the freelancer calculation for every row of a CSV file.
    Batch {
        /// CSV with columns gross_sales, deductions, filing_period.
        #[arg(long)]
        file: PathBuf,
    },

    /// Print the tax rate directory.
    Rates,

    /// List the available calculators.
    Types,
}
