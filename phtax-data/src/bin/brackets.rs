use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use phtax_data::BracketLoader;

/// Validate a bracket table CSV file and print the tables it defines.
///
/// The CSV file should have the following columns:
/// - table: Name of the table (e.g., individual_income_tax)
/// - effective_date: Label for when the table takes effect
/// - min: Lower bound of the bracket, inclusive
/// - max: Upper bound, exclusive (empty for the last bracket)
/// - rate: Marginal rate as a decimal (e.g., 0.15)
/// - base_amount: Tax owed at the lower bound
/// - description: Optional label
#[derive(Parser, Debug)]
#[command(name = "phtax-brackets")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing bracket data
    #[arg(short, long)]
    file: PathBuf,

    /// Only check the table with this name
    #[arg(short, long)]
    table: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = BracketLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} records from CSV", records.len());

    let tables = BracketLoader::build_tables(&records).context("Invalid bracket data")?;

    let mut shown = 0;
    for table in tables
        .iter()
        .filter(|t| args.table.as_deref().is_none_or(|name| t.name() == name))
    {
        println!(
            "\n{} ({}, {} brackets)",
            table.name(),
            table.effective_date(),
            table.brackets().len()
        );
        for bracket in table.brackets() {
            let max = bracket.max.map(|m| m.to_string()).unwrap_or_else(|| "-".to_string());
            println!(
                "  {:>12} {:>12} {:>8} {:>12}  {}",
                bracket.min, max, bracket.rate, bracket.base_amount, bracket.description
            );
        }
        shown += 1;
    }

    if let Some(name) = &args.table {
        anyhow::ensure!(shown > 0, "Table '{name}' not found in {}", args.file.display());
    }

    println!("\n{shown} table(s) valid.");

    Ok(())
}
