use std::io::Read;
use std::path::Path;

use phtax_core::{BracketTable, BracketTableError, TaxBracket};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading bracket tables.
#[derive(Debug, Error, PartialEq)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("invalid bracket table '{table}': {source}")]
    InvalidTable {
        table: String,
        #[source]
        source: BracketTableError,
    },

    #[error("bracket table '{0}' not found in CSV data")]
    TableNotFound(String),
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from a bracket CSV file.
///
/// - `table`: name of the table the bracket belongs to (e.g. `individual_income_tax`)
/// - `effective_date`: free-form label (e.g. `January 1, 2025`)
/// - `min`: lower bound, inclusive
/// - `max`: upper bound, exclusive (empty for the unbounded last bracket)
/// - `rate`: marginal rate as a decimal (e.g. `0.15` for 15%)
/// - `base_amount`: tax owed at `min`
/// - `description`: optional human-readable label
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub table: String,
    pub effective_date: String,
    pub min: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max: Option<Decimal>,
    pub rate: Decimal,
    pub base_amount: Decimal,
    #[serde(default)]
    pub description: String,
}

impl From<&BracketRecord> for TaxBracket {
    fn from(record: &BracketRecord) -> Self {
        TaxBracket {
            min: record.min,
            max: record.max,
            rate: record.rate,
            base_amount: record.base_amount,
            description: record.description.clone(),
        }
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for bracket tables stored as CSV.
///
/// One file may hold several tables; rows are grouped by their `table`
/// column and every group is validated into a [`BracketTable`].
pub struct BracketLoader;

impl BracketLoader {
    /// Parse bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or a
    /// string slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Groups records by table, in order of first appearance, and validates
    /// each group.
    ///
    /// A table takes its effective date from its first record. Rows within a
    /// table keep their file order, so brackets must be listed ascending.
    pub fn build_tables(
        records: &[BracketRecord],
    ) -> Result<Vec<BracketTable>, BracketLoaderError> {
        let mut groups: Vec<(&str, &str, Vec<TaxBracket>)> = Vec::new();

        for record in records {
            match groups.iter_mut().find(|(name, _, _)| *name == record.table) {
                Some((_, _, brackets)) => brackets.push(record.into()),
                None => groups.push((
                    record.table.as_str(),
                    record.effective_date.as_str(),
                    vec![record.into()],
                )),
            }
        }

        groups
            .into_iter()
            .map(|(name, effective_date, brackets)| {
                debug!(table = name, brackets = brackets.len(), "Building bracket table");
                BracketTable::new(name, effective_date, brackets).map_err(|source| {
                    BracketLoaderError::InvalidTable {
                        table: name.to_string(),
                        source,
                    }
                })
            })
            .collect()
    }

    /// Parses `reader` and returns the table called `name`.
    pub fn load_table<R: Read>(
        reader: R,
        name: &str,
    ) -> Result<BracketTable, BracketLoaderError> {
        let records = Self::parse(reader)?;
        Self::build_tables(&records)?
            .into_iter()
            .find(|table| table.name() == name)
            .ok_or_else(|| BracketLoaderError::TableNotFound(name.to_string()))
    }

    /// Reads the CSV file at `path` and returns the table called `name`.
    pub fn load_table_from_path(
        path: &Path,
        name: &str,
    ) -> Result<BracketTable, BracketLoaderError> {
        let file = std::fs::File::open(path)
            .map_err(|e| BracketLoaderError::CsvParse(format!("{}: {e}", path.display())))?;
        Self::load_table(file, name)
    }
}
