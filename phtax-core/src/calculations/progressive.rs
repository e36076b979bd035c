//! Progressive bracket evaluation.
//!
//! Every bracket-based amount in the crate goes through [`evaluate`]: income
//! tax, brokerage fees and import processing charges alike. Brackets are
//! inclusive on `min` and exclusive on `max`, so an amount sitting exactly on
//! a boundary is taxed under the upper bracket.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use phtax_core::calculations::progressive::evaluate;
//! use phtax_core::rates::individual_income_tax;
//!
//! let table = individual_income_tax();
//!
//! // ₱22,500 + 20% of the excess over ₱400,000
//! assert_eq!(evaluate(dec!(500000), table.brackets()), dec!(42500.00));
//! ```

use rust_decimal::Decimal;
use tracing::warn;

use crate::TaxBracket;
use crate::calculations::common::{ZERO_PESOS, max, round_half_up};

/// Finds the bracket containing `amount`, clamping negative amounts to zero.
///
/// Returns `None` when `brackets` is empty or `amount` lies below the first
/// bracket.
pub fn matching_bracket(
    amount: Decimal,
    brackets: &[TaxBracket],
) -> Option<&TaxBracket> {
    let amount = max(amount, Decimal::ZERO);
    brackets.iter().find(|b| b.contains(amount))
}

/// Computes `base_amount + rate × (amount − min)` for the bracket containing
/// `amount`, rounded to centavos.
///
/// Negative amounts are treated as zero. An amount that no bracket contains
/// yields zero.
pub fn evaluate(
    amount: Decimal,
    brackets: &[TaxBracket],
) -> Decimal {
    if amount < Decimal::ZERO {
        warn!(amount = %amount, "Negative amount clamped to zero before bracket lookup");
    }
    let amount = max(amount, Decimal::ZERO);

    match matching_bracket(amount, brackets) {
        Some(bracket) => round_half_up(bracket.tax_on(amount)),
        None => ZERO_PESOS,
    }
}
