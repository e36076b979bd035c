use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single progressive bracket: `[min, max)` taxed at `base_amount + rate × (amount − min)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min: Decimal,
    /// `None` for the last, unbounded bracket.
    pub max: Option<Decimal>,
    pub rate: Decimal,
    pub base_amount: Decimal,
    pub description: String,
}

impl TaxBracket {
    /// Returns `true` when `amount` falls in `[min, max)`.
    ///
    /// A boundary amount belongs to the bracket that starts there.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use phtax_core::TaxBracket;
    ///
    /// let bracket = TaxBracket {
    ///     min: dec!(250000),
    ///     max: Some(dec!(400000)),
    ///     rate: dec!(0.15),
    ///     base_amount: dec!(0),
    ///     description: "15% of the excess over ₱250,000".to_string(),
    /// };
    ///
    /// assert!(bracket.contains(dec!(250000)));
    /// assert!(!bracket.contains(dec!(400000)));
    /// ```
    pub fn contains(
        &self,
        amount: Decimal,
    ) -> bool {
        amount >= self.min && self.max.is_none_or(|max| amount < max)
    }

    /// Tax owed on `amount` under this bracket, unrounded.
    pub fn tax_on(
        &self,
        amount: Decimal,
    ) -> Decimal {
        self.base_amount + self.rate * (amount - self.min)
    }
}

/// Errors raised when a bracket sequence violates the table invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket table '{0}' has no brackets")]
    Empty(String),

    #[error("bracket {index} rate must be between 0 and 1, got {rate}")]
    InvalidRate { index: usize, rate: Decimal },

    #[error("bracket {index} has max {max} not above min {min}")]
    EmptyRange {
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    #[error("bracket {index} starts at {min} but the previous bracket ends at {previous_max}")]
    Discontinuous {
        index: usize,
        min: Decimal,
        previous_max: Decimal,
    },

    #[error("bracket {0} is unbounded but is not the last bracket")]
    UnboundedBeforeLast(usize),

    #[error("last bracket must be unbounded, but ends at {0}")]
    LastBracketBounded(Decimal),
}

/// An ordered, contiguous set of brackets for one tax category.
///
/// Construction through [`BracketTable::new`] guarantees that brackets are
/// ascending, that each bracket's `max` equals the next bracket's `min`, that
/// only the last bracket is unbounded and that every rate lies in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketTable {
    name: String,
    effective_date: String,
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Validates `brackets` and wraps them in a table.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTableError`] describing the first violated invariant.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use phtax_core::{BracketTable, BracketTableError, TaxBracket};
    ///
    /// let gap = vec![
    ///     TaxBracket {
    ///         min: dec!(0),
    ///         max: Some(dec!(100)),
    ///         rate: dec!(0),
    ///         base_amount: dec!(0),
    ///         description: String::new(),
    ///     },
    ///     TaxBracket {
    ///         min: dec!(150),
    ///         max: None,
    ///         rate: dec!(0.1),
    ///         base_amount: dec!(0),
    ///         description: String::new(),
    ///     },
    /// ];
    ///
    /// let result = BracketTable::new("gap", "Current", gap);
    ///
    /// assert_eq!(
    ///     result,
    ///     Err(BracketTableError::Discontinuous {
    ///         index: 1,
    ///         min: dec!(150),
    ///         previous_max: dec!(100),
    ///     })
    /// );
    /// ```
    pub fn new(
        name: impl Into<String>,
        effective_date: impl Into<String>,
        brackets: Vec<TaxBracket>,
    ) -> Result<Self, BracketTableError> {
        let name = name.into();
        validate_brackets(&name, &brackets)?;
        Ok(Self {
            name,
            effective_date: effective_date.into(),
            brackets,
        })
    }

    /// Wraps compiled-in brackets without validation. The rates module tests
    /// every table built this way against [`BracketTable::new`].
    pub(crate) fn new_unchecked(
        name: &str,
        effective_date: &str,
        brackets: Vec<TaxBracket>,
    ) -> Self {
        Self {
            name: name.to_string(),
            effective_date: effective_date.to_string(),
            brackets,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn effective_date(&self) -> &str {
        &self.effective_date
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Progressive tax on `amount`, rounded to centavos.
    ///
    /// See [`crate::calculations::progressive::evaluate`].
    pub fn evaluate(
        &self,
        amount: Decimal,
    ) -> Decimal {
        crate::calculations::progressive::evaluate(amount, &self.brackets)
    }

    /// The bracket that applies to `amount` after clamping it to zero.
    pub fn bracket_for(
        &self,
        amount: Decimal,
    ) -> Option<&TaxBracket> {
        crate::calculations::progressive::matching_bracket(amount, &self.brackets)
    }
}

fn validate_brackets(
    name: &str,
    brackets: &[TaxBracket],
) -> Result<(), BracketTableError> {
    let Some(last) = brackets.last() else {
        return Err(BracketTableError::Empty(name.to_string()));
    };

    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(BracketTableError::InvalidRate {
                index,
                rate: bracket.rate,
            });
        }

        match bracket.max {
            Some(max) if max <= bracket.min => {
                return Err(BracketTableError::EmptyRange {
                    index,
                    min: bracket.min,
                    max,
                });
            }
            _ => {}
        }

        if index == 0 {
            continue;
        }

        let previous = &brackets[index - 1];
        let Some(previous_max) = previous.max else {
            return Err(BracketTableError::UnboundedBeforeLast(index - 1));
        };
        if bracket.min != previous_max {
            return Err(BracketTableError::Discontinuous {
                index,
                min: bracket.min,
                previous_max,
            });
        }
    }

    if let Some(max) = last.max {
        return Err(BracketTableError::LastBracketBounded(max));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn bracket(
        min: Decimal,
        max: Option<Decimal>,
        rate: Decimal,
    ) -> TaxBracket {
        TaxBracket {
            min,
            max,
            rate,
            base_amount: Decimal::ZERO,
            description: String::new(),
        }
    }

    // =========================================================================
    // TaxBracket tests
    // =========================================================================

    #[test]
    fn contains_is_inclusive_on_min() {
        let b = bracket(dec!(100), Some(dec!(200)), dec!(0.1));

        assert!(b.contains(dec!(100)));
    }

    #[test]
    fn contains_is_exclusive_on_max() {
        let b = bracket(dec!(100), Some(dec!(200)), dec!(0.1));

        assert!(!b.contains(dec!(200)));
        assert!(b.contains(dec!(199.99)));
    }

    #[test]
    fn contains_unbounded_accepts_large_amounts() {
        let b = bracket(dec!(100), None, dec!(0.1));

        assert!(b.contains(dec!(999999999)));
        assert!(!b.contains(dec!(99.99)));
    }

    #[test]
    fn tax_on_applies_base_and_marginal_rate() {
        let b = TaxBracket {
            base_amount: dec!(22500),
            ..bracket(dec!(400000), Some(dec!(800000)), dec!(0.20))
        };

        assert_eq!(b.tax_on(dec!(500000)), dec!(42500.00));
    }

    // =========================================================================
    // BracketTable::new tests
    // =========================================================================

    #[test]
    fn new_accepts_contiguous_table() {
        let table = BracketTable::new(
            "test",
            "Current",
            vec![
                bracket(dec!(0), Some(dec!(100)), dec!(0)),
                bracket(dec!(100), None, dec!(0.5)),
            ],
        )
        .expect("valid table");

        assert_eq!(table.name(), "test");
        assert_eq!(table.effective_date(), "Current");
        assert_eq!(table.brackets().len(), 2);
    }

    #[test]
    fn new_rejects_empty_table() {
        let result = BracketTable::new("empty", "Current", vec![]);

        assert_eq!(result, Err(BracketTableError::Empty("empty".to_string())));
    }

    #[test]
    fn new_rejects_rate_above_one() {
        let result = BracketTable::new("t", "Current", vec![bracket(dec!(0), None, dec!(1.5))]);

        assert_eq!(
            result,
            Err(BracketTableError::InvalidRate {
                index: 0,
                rate: dec!(1.5),
            })
        );
    }

    #[test]
    fn new_rejects_negative_rate() {
        let result = BracketTable::new("t", "Current", vec![bracket(dec!(0), None, dec!(-0.1))]);

        assert_eq!(
            result,
            Err(BracketTableError::InvalidRate {
                index: 0,
                rate: dec!(-0.1),
            })
        );
    }

    #[test]
    fn new_rejects_empty_range() {
        let result = BracketTable::new(
            "t",
            "Current",
            vec![
                bracket(dec!(100), Some(dec!(100)), dec!(0)),
                bracket(dec!(100), None, dec!(0)),
            ],
        );

        assert_eq!(
            result,
            Err(BracketTableError::EmptyRange {
                index: 0,
                min: dec!(100),
                max: dec!(100),
            })
        );
    }

    #[test]
    fn new_rejects_overlap() {
        let result = BracketTable::new(
            "t",
            "Current",
            vec![
                bracket(dec!(0), Some(dec!(100)), dec!(0)),
                bracket(dec!(90), None, dec!(0.1)),
            ],
        );

        assert_eq!(
            result,
            Err(BracketTableError::Discontinuous {
                index: 1,
                min: dec!(90),
                previous_max: dec!(100),
            })
        );
    }

    #[test]
    fn new_rejects_unbounded_bracket_before_last() {
        let result = BracketTable::new(
            "t",
            "Current",
            vec![
                bracket(dec!(0), None, dec!(0)),
                bracket(dec!(100), None, dec!(0.1)),
            ],
        );

        assert_eq!(result, Err(BracketTableError::UnboundedBeforeLast(0)));
    }

    #[test]
    fn new_rejects_bounded_last_bracket() {
        let result = BracketTable::new(
            "t",
            "Current",
            vec![bracket(dec!(0), Some(dec!(100)), dec!(0))],
        );

        assert_eq!(result, Err(BracketTableError::LastBracketBounded(dec!(100))));
    }
}
