use std::borrow::Cow;
use std::path::Path;

use anyhow::{Context, Result};
use phtax_core::calculations::{
    CompensationCalculator, CustomsCalculator, CustomsInput, FreelancerCalculator,
    FreelancerInput, Goods, compute_vat, extract_vat,
};
use phtax_core::rates::{self, INDIVIDUAL_INCOME_TAX, tax_rate_directory};
use phtax_core::{BracketTable, TaxType};
use phtax_data::{BracketLoader, load_freelancer_inputs_from_path};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::{Cli, Command, OutputFormat};
use crate::config::Config;
use crate::report::{
    self, BatchResult, IncomeTaxResult, RateDirectory, Report, TaxTypeCatalog,
};

/// Runs the selected command and returns the rendered output.
///
/// `--format` and `--income-tax-brackets` take precedence over the
/// corresponding config keys.
pub fn run(
    cli: &Cli,
    config: &Config,
) -> Result<String> {
    let format = cli.format.or(config.format).unwrap_or_default();
    let brackets = cli
        .income_tax_brackets
        .as_deref()
        .or(config.income_tax_brackets.as_deref());

    match &cli.command {
        Command::Compensation { salary } => {
            let table = income_tax_table(brackets)?;
            let result = CompensationCalculator::new(&table).calculate(*salary);
            render(format, &result, report::compensation)
        }
        Command::IncomeTax { taxable_income } => {
            let table = income_tax_table(brackets)?;
            let result = IncomeTaxResult {
                table: table.name().to_string(),
                effective_date: table.effective_date().to_string(),
                taxable_income: *taxable_income,
                income_tax: table.evaluate(*taxable_income),
                tax_bracket: table
                    .bracket_for(*taxable_income)
                    .map(|b| b.description.clone())
                    .unwrap_or_default(),
            };
            render(format, &result, report::income_tax)
        }
        Command::Vat { amount, inclusive } => {
            let result = if *inclusive {
                extract_vat(*amount)
            } else {
                compute_vat(*amount)
            };
            render(format, &result, |r| report::vat(r, *inclusive))
        }
        Command::Customs {
            fob,
            freight,
            insurance,
            exchange_rate,
            duty_rate,
            excise_rate,
            ahtn,
            description,
        } => {
            let input = CustomsInput {
                goods: Goods {
                    ahtn_code: ahtn.clone(),
                    description: description.clone(),
                    rate_of_duty: *duty_rate,
                },
                fob_fca_value: *fob,
                freight: *freight,
                insurance: *insurance,
                exchange_rate: *exchange_rate,
                excise_rate: *excise_rate,
            };
            let result = CustomsCalculator::default()
                .calculate(&input)
                .context("invalid customs shipment")?;
            render(format, &result, report::customs)
        }
        Command::Freelancer {
            gross_sales,
            deductions,
            period,
        } => {
            let table = income_tax_table(brackets)?;
            let input = FreelancerInput::new(*gross_sales)
                .with_deductions(*deductions)
                .with_filing_period(*period);
            let result = FreelancerCalculator::new(&table).calculate(&input);
            render(format, &result, report::freelancer)
        }
        Command::Batch { file } => {
            let table = income_tax_table(brackets)?;
            let inputs = load_freelancer_inputs_from_path(file)
                .with_context(|| format!("failed to load inputs from '{}'", file.display()))?;
            info!(rows = inputs.len(), "Loaded batch inputs");

            let calculator = FreelancerCalculator::new(&table);
            let result = BatchResult {
                results: inputs.iter().map(|i| calculator.calculate(i)).collect(),
            };
            render(format, &result, report::batch)
        }
        Command::Rates => {
            let directory = RateDirectory {
                entries: tax_rate_directory(),
            };
            render(format, &directory, report::rates)
        }
        Command::Types => {
            let catalog = TaxTypeCatalog {
                types: TaxType::all().iter().map(TaxType::info).collect(),
            };
            render(format, &catalog, report::types)
        }
    }
}

/// The compiled-in individual table, or the `individual_income_tax` table
/// from `path`.
fn income_tax_table(path: Option<&Path>) -> Result<Cow<'static, BracketTable>> {
    match path {
        Some(path) => {
            let table = BracketLoader::load_table_from_path(path, INDIVIDUAL_INCOME_TAX)
                .with_context(|| format!("failed to load brackets from '{}'", path.display()))?;
            info!(
                path = %path.display(),
                effective_date = table.effective_date(),
                "Using income tax brackets from file"
            );
            Ok(Cow::Owned(table))
        }
        None => Ok(Cow::Borrowed(rates::individual_income_tax())),
    }
}

fn render<T: Serialize>(
    format: OutputFormat,
    value: &T,
    to_report: impl FnOnce(&T) -> Report,
) -> Result<String> {
    debug!(?format, "Rendering output");
    match format {
        OutputFormat::Text => Ok(to_report(value).to_string()),
        OutputFormat::Toml => report::to_toml(value).context("failed to serialize output as TOML"),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;

    fn run_args(args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("phtax").chain(args.iter().copied()))
            .expect("valid arguments");
        run(&cli, &Config::default())
    }

    #[test]
    fn income_tax_text() {
        let output = run_args(&["income-tax", "--taxable-income", "560400"]).expect("runs");

        assert!(output.contains("₱54,580.00"));
        assert!(output.contains(INDIVIDUAL_INCOME_TAX));
    }

    #[test]
    fn income_tax_toml() {
        let output = run_args(&["income-tax", "--taxable-income", "250000", "--format", "toml"])
            .expect("runs");

        assert!(output.contains("income_tax = \"0.00\""));
        assert!(output.contains("table = \"individual_income_tax\""));
    }

    #[test]
    fn format_falls_back_to_config() {
        let cli =
            Cli::try_parse_from(["phtax", "vat", "--amount", "100"]).expect("valid arguments");
        let config = Config {
            format: Some(OutputFormat::Toml),
            ..Config::default()
        };

        let output = run(&cli, &config).expect("runs");

        assert!(output.contains("total_amount = \"112.00\""));
    }

    #[test]
    fn flag_format_beats_config() {
        let cli = Cli::try_parse_from(["phtax", "vat", "--amount", "100", "--format", "text"])
            .expect("valid arguments");
        let config = Config {
            format: Some(OutputFormat::Toml),
            ..Config::default()
        };

        let output = run(&cli, &config).expect("runs");

        assert!(output.starts_with("Value Added Tax\n"));
    }

    #[test]
    fn vat_inclusive_extracts() {
        let output = run_args(&["vat", "--amount", "11200", "--inclusive"]).expect("runs");

        assert!(output.starts_with("Value Added Tax (extracted)\n"));
        assert!(output.contains("₱10,000.00"));
    }

    #[test]
    fn customs_rejects_zero_exchange_rate() {
        let result = run_args(&[
            "customs",
            "--fob",
            "1000",
            "--exchange-rate",
            "0",
            "--duty-rate",
            "0.1",
        ]);

        let err = result.expect_err("zero exchange rate is invalid");
        assert_eq!(err.to_string(), "invalid customs shipment");
    }

    #[test]
    fn missing_bracket_file_is_reported() {
        let result = run_args(&[
            "compensation",
            "--salary",
            "50000",
            "--income-tax-brackets",
            "/nonexistent/brackets.csv",
        ]);

        let err = result.expect_err("missing file");
        assert_eq!(
            err.to_string(),
            "failed to load brackets from '/nonexistent/brackets.csv'"
        );
    }

    #[test]
    fn vat_ignores_bracket_file() {
        let result = run_args(&[
            "vat",
            "--amount",
            "100",
            "--income-tax-brackets",
            "/nonexistent/brackets.csv",
        ]);

        assert!(result.is_ok());
    }

    #[test]
    fn types_lists_every_calculator() {
        let output = run_args(&["types"]).expect("runs");

        for tax_type in TaxType::all() {
            assert!(output.contains(tax_type.info().name));
        }
    }
}
