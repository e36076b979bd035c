use phtax_core::FilingPeriod;
use phtax_core::calculations::common::{MAX_AMOUNT, round_half_up};
use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`).
/// Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Command-line value parser for peso amounts and rates. Rejects negatives.
pub fn parse_amount(s: &str) -> Result<Decimal, String> {
    let value = parse_decimal(s).map_err(|e| e.to_string())?;
    if value < Decimal::ZERO {
        return Err(format!("amount must be non-negative, got {value}"));
    }
    if value > MAX_AMOUNT {
        return Err(format!("amount must not exceed {MAX_AMOUNT}, got {value}"));
    }
    Ok(value)
}

/// Command-line value parser for `quarterly` / `yearly`.
pub fn parse_period(s: &str) -> Result<FilingPeriod, String> {
    FilingPeriod::parse(s)
        .ok_or_else(|| format!("unknown filing period '{s}' (expected quarterly or yearly)"))
}

/// Formats an amount as pesos with thousands separators, e.g. `₱1,234.56`.
pub fn format_peso(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{sign}₱{grouped}.{cents}")
}

/// Formats a rate as a percentage with at least one decimal place.
pub fn format_rate(rate: Decimal) -> String {
    let percent = (rate * Decimal::ONE_HUNDRED).round_dp(3).normalize();
    if percent.scale() == 0 {
        format!("{percent}.0%")
    } else {
        format!("{percent}%")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // parse_decimal tests
    // =========================================================================

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("1,234,567.89").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn parse_decimal_trim_whitespace() {
        assert_eq!(parse_decimal("  123.45  ").unwrap(), dec!(123.45));
    }

    #[test]
    fn parse_decimal_empty_treated_as_zero() {
        assert_eq!(parse_decimal("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_decimal("   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_decimal_invalid_returns_error() {
        assert!(parse_decimal("abc").is_err());
    }

    // =========================================================================
    // parse_amount / parse_period tests
    // =========================================================================

    #[test]
    fn parse_amount_rejects_negative() {
        assert_eq!(
            parse_amount("-1,000"),
            Err("amount must be non-negative, got -1000".to_string())
        );
    }

    #[test]
    fn parse_amount_rejects_amount_over_limit() {
        assert_eq!(
            parse_amount("1,000,000,000,000,001"),
            Err(
                "amount must not exceed 1000000000000000, got 1000000000000001".to_string()
            )
        );
        assert_eq!(parse_amount("1,000,000,000,000,000"), Ok(MAX_AMOUNT));
    }

    #[test]
    fn parse_amount_accepts_formatted_amount() {
        assert_eq!(parse_amount("50,000"), Ok(dec!(50000)));
        assert_eq!(parse_amount(""), Ok(dec!(0)));
    }

    #[test]
    fn parse_period_names() {
        assert_eq!(parse_period("Yearly"), Ok(FilingPeriod::Yearly));
        assert!(parse_period("monthly").is_err());
    }

    // =========================================================================
    // format_peso tests
    // =========================================================================

    #[test]
    fn format_peso_groups_thousands() {
        assert_eq!(format_peso(dec!(1234.56)), "₱1,234.56");
        assert_eq!(format_peso(dec!(1234567.8)), "₱1,234,567.80");
        assert_eq!(format_peso(dec!(100000)), "₱100,000.00");
    }

    #[test]
    fn format_peso_small_and_zero() {
        assert_eq!(format_peso(dec!(0)), "₱0.00");
        assert_eq!(format_peso(dec!(999.999)), "₱1,000.00");
    }

    #[test]
    fn format_peso_negative() {
        assert_eq!(format_peso(dec!(-62500)), "-₱62,500.00");
    }

    // =========================================================================
    // format_rate tests
    // =========================================================================

    #[test]
    fn format_rate_shows_one_decimal_for_whole_percent() {
        assert_eq!(format_rate(dec!(0.12)), "12.0%");
        assert_eq!(format_rate(dec!(0.03)), "3.0%");
    }

    #[test]
    fn format_rate_keeps_fraction() {
        assert_eq!(format_rate(dec!(0.025)), "2.5%");
        assert_eq!(format_rate(dec!(0.00125)), "0.125%");
    }
}
