//! Customs duty and import taxes on goods shipped into the Philippines.
//!
//! # Computation Order
//!
//! Each stage feeds the next, so the order is fixed:
//!
//! | Step | Amount |
//! |------|--------|
//! | 1 | Dutiable value (foreign) = FOB/FCA value + freight + insurance |
//! | 2 | Dutiable value (PHP) = step 1 × exchange rate |
//! | 3 | Customs duty = step 2 × rate of duty |
//! | 4 | Excise tax = (step 2 + step 3) × excise rate |
//! | 5 | VAT = (step 2 + step 3 + step 4) × 12% |
//! | 6 | Brokerage fee, import processing charge, BIR and customs documentary stamps |
//! | 7 | Total landed cost = step 2 + every charge above |
//!
//! Brokerage fees and import processing charges are looked up from bracket
//! schedules keyed on the dutiable value in pesos. Fixed fees are only charged
//! on a shipment with a positive dutiable value.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use phtax_core::calculations::{CustomsCalculator, CustomsInput, Goods};
//!
//! let input = CustomsInput {
//!     goods: Goods {
//!         ahtn_code: "8471.30.20".to_string(),
//!         description: "Laptop computer".to_string(),
//!         rate_of_duty: dec!(0.10),
//!     },
//!     fob_fca_value: dec!(1000),
//!     freight: dec!(100),
//!     insurance: dec!(20),
//!     exchange_rate: dec!(56),
//!     excise_rate: dec!(0),
//! };
//!
//! let result = CustomsCalculator::default().calculate(&input).unwrap();
//!
//! assert_eq!(result.dutiable_value.total_dutiable_value_php, dec!(62720.00));
//! assert_eq!(result.charges.customs_duty, dec!(6272.00));
//! assert_eq!(result.summary.vat, dec!(8279.04));
//! assert_eq!(result.charges.total_landed_cost, dec!(82851.04));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::BracketTable;
use crate::calculations::common::{MAX_AMOUNT, ZERO_PESOS, round_half_up};
use crate::calculations::vat::VAT_RATE;
use crate::rates;

/// Largest accepted exchange rate, in pesos per unit of foreign currency.
pub const MAX_EXCHANGE_RATE: Decimal = dec!(1000000);

/// Errors raised by customs input or configuration validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CustomsError {
    #[error("{field} must be non-negative, got {amount}")]
    NegativeAmount { field: &'static str, amount: Decimal },

    #[error("{field} must not exceed {max}, got {amount}", max = MAX_AMOUNT)]
    AmountTooLarge { field: &'static str, amount: Decimal },

    #[error("exchange rate must be positive and at most {max}, got {0}", max = MAX_EXCHANGE_RATE)]
    InvalidExchangeRate(Decimal),

    #[error("{field} must be between 0 and 1, got {rate}")]
    InvalidRate { field: &'static str, rate: Decimal },
}

fn check_amount(
    field: &'static str,
    amount: Decimal,
) -> Result<(), CustomsError> {
    if amount < Decimal::ZERO {
        return Err(CustomsError::NegativeAmount { field, amount });
    }
    if amount > MAX_AMOUNT {
        return Err(CustomsError::AmountTooLarge { field, amount });
    }
    Ok(())
}

fn check_rate(
    field: &'static str,
    rate: Decimal,
) -> Result<(), CustomsError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(CustomsError::InvalidRate { field, rate });
    }
    Ok(())
}

/// The imported goods and their tariff classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goods {
    /// ASEAN Harmonized Tariff Nomenclature code.
    pub ahtn_code: String,
    pub description: String,
    pub rate_of_duty: Decimal,
}

/// Shipment values, in the invoice currency unless noted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomsInput {
    pub goods: Goods,
    pub fob_fca_value: Decimal,
    pub freight: Decimal,
    pub insurance: Decimal,
    /// Pesos per unit of the invoice currency.
    pub exchange_rate: Decimal,
    /// Ad valorem excise rate for the goods category; zero when not excisable.
    pub excise_rate: Decimal,
}

impl CustomsInput {
    /// # Errors
    ///
    /// Returns [`CustomsError`] for a value outside `[0, MAX_AMOUNT]`, an
    /// exchange rate outside `(0, MAX_EXCHANGE_RATE]`, or a duty/excise rate
    /// outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), CustomsError> {
        check_amount("FOB/FCA value", self.fob_fca_value)?;
        check_amount("freight", self.freight)?;
        check_amount("insurance", self.insurance)?;
        if self.exchange_rate <= Decimal::ZERO || self.exchange_rate > MAX_EXCHANGE_RATE {
            return Err(CustomsError::InvalidExchangeRate(self.exchange_rate));
        }
        check_rate("rate of duty", self.goods.rate_of_duty)?;
        check_rate("excise rate", self.excise_rate)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutiableValue {
    pub fob_fca_value: Decimal,
    pub freight: Decimal,
    pub insurance: Decimal,
    pub total_dutiable_value_foreign: Decimal,
    pub exchange_rate: Decimal,
    pub total_dutiable_value_php: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomsCharges {
    pub customs_duty: Decimal,
    pub excise_tax: Decimal,
    pub brokerage_fee: Decimal,
    pub import_processing_charge: Decimal,
    pub bir_documentary_stamp_tax: Decimal,
    pub customs_documentary_stamp: Decimal,
    pub total_landed_cost: Decimal,
}

/// The tax components only; the brokerage fee is a service charge and is
/// excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomsSummary {
    pub customs_duty: Decimal,
    pub vat: Decimal,
    pub excise_tax: Decimal,
    pub import_processing_charge: Decimal,
    pub bir_documentary_stamp_tax: Decimal,
    pub customs_documentary_stamp: Decimal,
    pub total_tax_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomsCalculation {
    pub goods: Goods,
    pub dutiable_value: DutiableValue,
    pub charges: CustomsCharges,
    pub summary: CustomsSummary,
}

/// Fee schedules and fixed charges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomsConfig {
    pub vat_rate: Decimal,
    pub brokerage_fees: BracketTable,
    pub import_processing_charges: BracketTable,
    pub bir_documentary_stamp_tax: Decimal,
    pub customs_documentary_stamp: Decimal,
}

impl Default for CustomsConfig {
    fn default() -> Self {
        Self {
            vat_rate: VAT_RATE,
            brokerage_fees: rates::brokerage_fees().clone(),
            import_processing_charges: rates::import_processing_charges().clone(),
            bir_documentary_stamp_tax: dec!(30),
            customs_documentary_stamp: dec!(100),
        }
    }
}

impl CustomsConfig {
    /// # Errors
    ///
    /// Returns [`CustomsError`] for a VAT rate outside `[0, 1]` or a negative
    /// stamp amount.
    pub fn validate(&self) -> Result<(), CustomsError> {
        check_rate("VAT rate", self.vat_rate)?;
        check_amount("BIR documentary stamp tax", self.bir_documentary_stamp_tax)?;
        check_amount("customs documentary stamp", self.customs_documentary_stamp)?;
        Ok(())
    }
}

/// Calculator for duties, taxes and fees on an import shipment.
#[derive(Debug, Clone, Default)]
pub struct CustomsCalculator {
    config: CustomsConfig,
}

impl CustomsCalculator {
    pub fn new(config: CustomsConfig) -> Self {
        Self { config }
    }

    /// Runs the full computation for one shipment.
    ///
    /// # Errors
    ///
    /// Returns [`CustomsError`] if the configuration or `input` is invalid.
    pub fn calculate(
        &self,
        input: &CustomsInput,
    ) -> Result<CustomsCalculation, CustomsError> {
        self.config.validate()?;
        input.validate()?;

        // Steps 1-2
        let dutiable_value = self.dutiable_value(input);
        let dv_php = dutiable_value.total_dutiable_value_php;

        // Step 3
        let customs_duty = round_half_up(dv_php * input.goods.rate_of_duty);

        // Step 4
        let excise_tax = round_half_up((dv_php + customs_duty) * input.excise_rate);

        // Step 5
        let vat = round_half_up((dv_php + customs_duty + excise_tax) * self.config.vat_rate);

        // Step 6
        let fees = self.fees(dv_php);

        // Step 7
        let total_landed_cost = dv_php
            + customs_duty
            + excise_tax
            + vat
            + fees.brokerage_fee
            + fees.import_processing_charge
            + fees.bir_documentary_stamp_tax
            + fees.customs_documentary_stamp;

        let total_tax_amount = customs_duty
            + vat
            + excise_tax
            + fees.import_processing_charge
            + fees.bir_documentary_stamp_tax
            + fees.customs_documentary_stamp;

        debug!(
            dutiable_value_php = %dv_php,
            customs_duty = %customs_duty,
            vat = %vat,
            total_landed_cost = %total_landed_cost,
            "Computed customs charges"
        );

        Ok(CustomsCalculation {
            goods: input.goods.clone(),
            dutiable_value,
            charges: CustomsCharges {
                customs_duty,
                excise_tax,
                brokerage_fee: fees.brokerage_fee,
                import_processing_charge: fees.import_processing_charge,
                bir_documentary_stamp_tax: fees.bir_documentary_stamp_tax,
                customs_documentary_stamp: fees.customs_documentary_stamp,
                total_landed_cost,
            },
            summary: CustomsSummary {
                customs_duty,
                vat,
                excise_tax,
                import_processing_charge: fees.import_processing_charge,
                bir_documentary_stamp_tax: fees.bir_documentary_stamp_tax,
                customs_documentary_stamp: fees.customs_documentary_stamp,
                total_tax_amount,
            },
        })
    }

    fn dutiable_value(
        &self,
        input: &CustomsInput,
    ) -> DutiableValue {
        let total_foreign = input.fob_fca_value + input.freight + input.insurance;

        DutiableValue {
            fob_fca_value: input.fob_fca_value,
            freight: input.freight,
            insurance: input.insurance,
            total_dutiable_value_foreign: total_foreign,
            exchange_rate: input.exchange_rate,
            total_dutiable_value_php: round_half_up(total_foreign * input.exchange_rate),
        }
    }

    fn fees(
        &self,
        dutiable_value_php: Decimal,
    ) -> Fees {
        if dutiable_value_php <= Decimal::ZERO {
            return Fees {
                brokerage_fee: ZERO_PESOS,
                import_processing_charge: ZERO_PESOS,
                bir_documentary_stamp_tax: ZERO_PESOS,
                customs_documentary_stamp: ZERO_PESOS,
            };
        }

        Fees {
            brokerage_fee: self.config.brokerage_fees.evaluate(dutiable_value_php),
            import_processing_charge: self
                .config
                .import_processing_charges
                .evaluate(dutiable_value_php),
            bir_documentary_stamp_tax: round_half_up(self.config.bir_documentary_stamp_tax),
            customs_documentary_stamp: round_half_up(self.config.customs_documentary_stamp),
        }
    }
}

#[derive(Debug)]
struct Fees {
    brokerage_fee: Decimal,
    import_processing_charge: Decimal,
    bir_documentary_stamp_tax: Decimal,
    customs_documentary_stamp: Decimal,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn test_input() -> CustomsInput {
        CustomsInput {
            goods: Goods {
                ahtn_code: "8471.30.20".to_string(),
                description: "Laptop computer".to_string(),
                rate_of_duty: dec!(0.10),
            },
            fob_fca_value: dec!(1000),
            freight: dec!(100),
            insurance: dec!(20),
            exchange_rate: dec!(56),
            excise_rate: dec!(0),
        }
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_accepts_valid_input() {
        assert_eq!(test_input().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_negative_fob_value() {
        let input = CustomsInput {
            fob_fca_value: dec!(-1),
            ..test_input()
        };

        assert_eq!(
            input.validate(),
            Err(CustomsError::NegativeAmount {
                field: "FOB/FCA value",
                amount: dec!(-1),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_freight() {
        let input = CustomsInput {
            freight: dec!(-50),
            ..test_input()
        };

        assert_eq!(
            input.validate(),
            Err(CustomsError::NegativeAmount {
                field: "freight",
                amount: dec!(-50),
            })
        );
    }

    #[test]
    fn validate_rejects_zero_exchange_rate() {
        let input = CustomsInput {
            exchange_rate: dec!(0),
            ..test_input()
        };

        assert_eq!(
            input.validate(),
            Err(CustomsError::InvalidExchangeRate(dec!(0)))
        );
    }

    #[test]
    fn validate_rejects_huge_shipment_value() {
        let input = CustomsInput {
            fob_fca_value: dec!(1000000000000000000000),
            exchange_rate: dec!(1000000000),
            ..test_input()
        };

        assert_eq!(
            input.validate(),
            Err(CustomsError::AmountTooLarge {
                field: "FOB/FCA value",
                amount: dec!(1000000000000000000000),
            })
        );
    }

    #[test]
    fn validate_rejects_huge_exchange_rate() {
        let input = CustomsInput {
            exchange_rate: dec!(1000000000),
            ..test_input()
        };

        assert_eq!(
            input.validate(),
            Err(CustomsError::InvalidExchangeRate(dec!(1000000000)))
        );
    }

    #[test]
    fn calculate_at_input_bounds_does_not_overflow() {
        let mut input = CustomsInput {
            fob_fca_value: MAX_AMOUNT,
            freight: MAX_AMOUNT,
            insurance: MAX_AMOUNT,
            exchange_rate: MAX_EXCHANGE_RATE,
            excise_rate: Decimal::ONE,
            ..test_input()
        };
        input.goods.rate_of_duty = Decimal::ONE;

        let result = CustomsCalculator::default()
            .calculate(&input)
            .expect("bounded input is valid");

        let dv_php = dec!(3000000000000000000000);
        assert_eq!(result.dutiable_value.total_dutiable_value_php, dv_php);
        assert_eq!(result.charges.customs_duty, dv_php);
    }

    #[test]
    fn calculate_rejects_overflowing_input() {
        let input = CustomsInput {
            fob_fca_value: dec!(1000000000000000000000),
            exchange_rate: dec!(1000000000),
            ..test_input()
        };

        let result = CustomsCalculator::default().calculate(&input);

        assert!(matches!(result, Err(CustomsError::AmountTooLarge { .. })));
    }

    #[test]
    fn validate_rejects_duty_rate_above_one() {
        let mut input = test_input();
        input.goods.rate_of_duty = dec!(1.5);

        assert_eq!(
            input.validate(),
            Err(CustomsError::InvalidRate {
                field: "rate of duty",
                rate: dec!(1.5),
            })
        );
    }

    #[test]
    fn config_validate_rejects_negative_stamp() {
        let config = CustomsConfig {
            customs_documentary_stamp: dec!(-100),
            ..CustomsConfig::default()
        };

        let result = CustomsCalculator::new(config).calculate(&test_input());

        assert_eq!(
            result,
            Err(CustomsError::NegativeAmount {
                field: "customs documentary stamp",
                amount: dec!(-100),
            })
        );
    }

    // =========================================================================
    // calculate tests
    // =========================================================================

    #[test]
    fn calculate_standard_shipment() {
        let result = CustomsCalculator::default()
            .calculate(&test_input())
            .expect("valid input");

        assert_eq!(
            result.dutiable_value,
            DutiableValue {
                fob_fca_value: dec!(1000),
                freight: dec!(100),
                insurance: dec!(20),
                total_dutiable_value_foreign: dec!(1120),
                exchange_rate: dec!(56),
                total_dutiable_value_php: dec!(62720.00),
            }
        );
        assert_eq!(
            result.charges,
            CustomsCharges {
                customs_duty: dec!(6272.00),
                excise_tax: dec!(0),
                brokerage_fee: dec!(4700.00),
                import_processing_charge: dec!(750.00),
                bir_documentary_stamp_tax: dec!(30),
                customs_documentary_stamp: dec!(100),
                total_landed_cost: dec!(82851.04),
            }
        );
        assert_eq!(
            result.summary,
            CustomsSummary {
                customs_duty: dec!(6272.00),
                vat: dec!(8279.04),
                excise_tax: dec!(0),
                import_processing_charge: dec!(750.00),
                bir_documentary_stamp_tax: dec!(30),
                customs_documentary_stamp: dec!(100),
                total_tax_amount: dec!(15431.04),
            }
        );
    }

    #[test]
    fn calculate_excise_is_applied_to_value_plus_duty() {
        let input = CustomsInput {
            excise_rate: dec!(0.50),
            ..test_input()
        };

        let result = CustomsCalculator::default().calculate(&input).unwrap();

        // (62,720 + 6,272) × 50%
        assert_eq!(result.charges.excise_tax, dec!(34496.00));
        // (62,720 + 6,272 + 34,496) × 12%
        assert_eq!(result.summary.vat, dec!(12418.56));
    }

    #[test]
    fn calculate_brokerage_above_top_bracket() {
        let input = CustomsInput {
            fob_fca_value: dec!(300000),
            freight: dec!(0),
            insurance: dec!(0),
            exchange_rate: dec!(1),
            ..test_input()
        };

        let result = CustomsCalculator::default().calculate(&input).unwrap();

        // 5,300 + 0.125% × 100,000
        assert_eq!(result.charges.brokerage_fee, dec!(5425.00));
        assert_eq!(result.charges.import_processing_charge, dec!(1000.00));
    }

    #[test]
    fn calculate_zero_value_shipment_has_no_fees() {
        let input = CustomsInput {
            fob_fca_value: dec!(0),
            freight: dec!(0),
            insurance: dec!(0),
            ..test_input()
        };

        let result = CustomsCalculator::default().calculate(&input).unwrap();

        assert_eq!(result.charges.total_landed_cost, dec!(0));
        assert_eq!(result.summary.total_tax_amount, dec!(0));
        assert_eq!(result.charges.brokerage_fee.to_string(), "0.00");
        assert_eq!(result.summary.total_tax_amount.to_string(), "0.00");
    }

    #[test]
    fn landed_cost_is_value_plus_every_charge() {
        let result = CustomsCalculator::default()
            .calculate(&test_input())
            .unwrap();
        let charges = &result.charges;

        assert_eq!(
            charges.total_landed_cost,
            result.dutiable_value.total_dutiable_value_php
                + charges.customs_duty
                + charges.excise_tax
                + result.summary.vat
                + charges.brokerage_fee
                + charges.import_processing_charge
                + charges.bir_documentary_stamp_tax
                + charges.customs_documentary_stamp
        );
    }

    #[test]
    fn calculate_rejects_invalid_input() {
        let input = CustomsInput {
            insurance: dec!(-5),
            ..test_input()
        };

        let result = CustomsCalculator::default().calculate(&input);

        assert_eq!(
            result,
            Err(CustomsError::NegativeAmount {
                field: "insurance",
                amount: dec!(-5),
            })
        );
    }
}
