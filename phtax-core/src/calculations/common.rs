//! Shared arithmetic for the calculators: centavo rounding and clamping.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::warn;

/// Largest amount the calculators accept: ₱1,000,000,000,000,000.
///
/// Every computation multiplies an amount by at most a period multiplier,
/// a month count or a handful of rates, so inputs at or below this bound
/// stay far inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Zero at centavo scale; serializes as `0.00`.
pub const ZERO_PESOS: Decimal = dec!(0.00);

/// Rounds to centavos, with midpoints rounded away from zero. The result
/// always carries two decimal places, so `87500` becomes `87500.00`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use phtax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(4548.333)), dec!(4548.33));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Returns the larger of two amounts.
///
/// ```
/// use rust_decimal_macros::dec;
/// use phtax_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-50000), dec!(0)), dec!(0));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps a user-entered amount into `[0, MAX_AMOUNT]`, logging when it was
/// out of range.
pub fn clamp_amount(
    amount: Decimal,
    field: &'static str,
) -> Decimal {
    if amount < Decimal::ZERO {
        warn!(field, amount = %amount, "Negative amount clamped to zero");
        return Decimal::ZERO;
    }
    if amount > MAX_AMOUNT {
        warn!(field, amount = %amount, max = %MAX_AMOUNT, "Amount clamped to maximum");
        return MAX_AMOUNT;
    }
    amount
}
