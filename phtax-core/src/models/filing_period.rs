use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How often a self-employed taxpayer files.
///
/// Only affects unit conversion: period amounts are scaled to annual amounts
/// for threshold checks and scaled back afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilingPeriod {
    #[default]
    Quarterly,
    Yearly,
}

impl FilingPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// Parses a period name, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quarterly" => Some(Self::Quarterly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Number of periods per year: 4 for quarterly, 1 for yearly.
    pub fn multiplier(&self) -> Decimal {
        match self {
            Self::Quarterly => Decimal::from(4),
            Self::Yearly => Decimal::ONE,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Quarterly => "Quarterly",
            Self::Yearly => "Yearly",
        }
    }
}
