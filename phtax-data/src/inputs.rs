//! CSV loader for batch freelancer computations.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter.
//!
//! | Column          | Required | Type    | Notes                                      |
//! |-----------------|----------|---------|--------------------------------------------|
//! | `gross_sales`   | yes      | decimal | Per filing period, e.g. `250000.00`        |
//! | `deductions`    | no       | decimal | Empty or absent means `0`                  |
//! | `filing_period` | no       | string  | `quarterly` or `yearly`; default quarterly |
//!
//! ```csv
//! gross_sales,deductions,filing_period
//! 250000.00,100000.00,quarterly
//! 1000000.00,,yearly
//! 180000.00
//! ```
use std::io::Read;
use std::path::Path;

use phtax_core::FilingPeriod;
use phtax_core::calculations::FreelancerInput;
use phtax_core::calculations::common::MAX_AMOUNT;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CsvRow {
    gross_sales: Decimal,
    deductions: Option<Decimal>,
    filing_period: Option<String>,
}

/// Errors that can occur while loading batch input rows.
#[derive(Debug, thiserror::Error)]
pub enum InputLoadError {
    /// Bad structure, missing required column or a type mismatch.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// `row` is 1-based and does not count the header.
    #[error("unrecognised filing period '{period}' on row {row}")]
    InvalidFilingPeriod { period: String, row: usize },

    #[error("{field} must be non-negative on row {row}, got {amount}")]
    NegativeAmount {
        field: &'static str,
        amount: Decimal,
        row: usize,
    },

    #[error("{field} must not exceed {max} on row {row}, got {amount}", max = MAX_AMOUNT)]
    AmountTooLarge {
        field: &'static str,
        amount: Decimal,
        row: usize,
    },
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<FreelancerInput, InputLoadError> {
    let filing_period = match row.filing_period {
        Some(period) if !period.trim().is_empty() => FilingPeriod::parse(&period)
            .ok_or(InputLoadError::InvalidFilingPeriod {
                period,
                row: row_number,
            })?,
        _ => FilingPeriod::default(),
    };

    let deductions = row.deductions.unwrap_or_default();
    for (field, amount) in [("gross_sales", row.gross_sales), ("deductions", deductions)] {
        if amount < Decimal::ZERO {
            return Err(InputLoadError::NegativeAmount {
                field,
                amount,
                row: row_number,
            });
        }
        if amount > MAX_AMOUNT {
            return Err(InputLoadError::AmountTooLarge {
                field,
                amount,
                row: row_number,
            });
        }
    }

    Ok(FreelancerInput::new(row.gross_sales)
        .with_deductions(deductions)
        .with_filing_period(filing_period))
}

/// Parse freelancer rows from a CSV reader, in file order.
///
/// # Errors
///
/// * [`InputLoadError::Parse`] if the CSV is structurally invalid or a field
///   cannot be deserialised.
/// * [`InputLoadError::InvalidFilingPeriod`] for an unknown period name.
/// * [`InputLoadError::NegativeAmount`] for a negative amount.
/// * [`InputLoadError::AmountTooLarge`] for an amount above [`MAX_AMOUNT`].
pub fn load_freelancer_inputs<R: Read>(reader: R) -> Result<Vec<FreelancerInput>, InputLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| convert_row(result?, idx + 1))
        .collect()
}

/// Reads the file at `path` and delegates to [`load_freelancer_inputs`].
pub fn load_freelancer_inputs_from_path(
    path: &Path,
) -> Result<Vec<FreelancerInput>, InputLoadError> {
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    load_freelancer_inputs(file)
}
