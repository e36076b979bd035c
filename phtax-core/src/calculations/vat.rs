//! Value-added tax at the flat 12% rate.
//!
//! VAT has no eligibility logic of its own. Whether it applies is decided by
//! the caller (for example the ₱3,000,000 threshold in the freelancer
//! calculator).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{clamp_amount, round_half_up};

pub const VAT_RATE: Decimal = dec!(0.12);

/// A VAT computation: base, tax, and base plus tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatComputation {
    pub base_amount: Decimal,
    pub rate: Decimal,
    pub amount: Decimal,
    pub total_amount: Decimal,
}

/// Adds 12% VAT to a VAT-exclusive `base_amount`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use phtax_core::calculations::compute_vat;
///
/// let vat = compute_vat(dec!(10000));
///
/// assert_eq!(vat.amount, dec!(1200.00));
/// assert_eq!(vat.total_amount, dec!(11200.00));
/// ```
pub fn compute_vat(base_amount: Decimal) -> VatComputation {
    let base_amount = clamp_amount(base_amount, "base_amount");
    let amount = round_half_up(base_amount * VAT_RATE);

    VatComputation {
        base_amount,
        rate: VAT_RATE,
        amount,
        total_amount: base_amount + amount,
    }
}

/// Splits a VAT-inclusive amount into its base and VAT portions.
///
/// ```
/// use rust_decimal_macros::dec;
/// use phtax_core::calculations::extract_vat;
///
/// let vat = extract_vat(dec!(11200));
///
/// assert_eq!(vat.base_amount, dec!(10000.00));
/// assert_eq!(vat.amount, dec!(1200.00));
/// ```
pub fn extract_vat(gross_amount: Decimal) -> VatComputation {
    let gross_amount = clamp_amount(gross_amount, "gross_amount");
    let base_amount = round_half_up(gross_amount / (Decimal::ONE + VAT_RATE));

    VatComputation {
        base_amount,
        rate: VAT_RATE,
        amount: gross_amount - base_amount,
        total_amount: gross_amount,
    }
}
