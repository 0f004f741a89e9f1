//! Withholding-equivalent tax calculations for a single gross amount.
//!
//! Three independent taxes apply to a self-employed check:
//!
//! | Tax   | Rule |
//! |-------|------|
//! | Federal | Progressive brackets: each bracket taxes the slice of income that falls inside it |
//! | State   | Flat rate on the full gross |
//! | Self-employment | Medicare (uncapped) plus Social Security (capped at the wage base) |
//!
//! The statement view additionally uses a combined flat self-employment
//! rate with no wage-base cap ([`TaxCalculator::flat_self_employment_tax`]);
//! the two SE formulas intentionally disagree, see DESIGN.md.
//!
//! All methods return exact decimals; rounding to cents happens once, at
//! the row boundary in the breakdown builder.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use checkbook_core::calculations::{TaxCalculator, TaxConfig};
//!
//! let calculator = TaxCalculator::new(TaxConfig::default()).unwrap();
//!
//! // 10,000 falls entirely inside the 10% bracket.
//! assert_eq!(calculator.federal_tax(dec!(10000)).unwrap(), dec!(1000.00));
//! // Medicare 2.9% + Social Security 12.4% below the wage base.
//! assert_eq!(
//!     calculator.self_employment_tax(dec!(10000)).unwrap(),
//!     dec!(1530.00)
//! );
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::FederalBracket;

/// Errors raised when a [`TaxConfig`] fails validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxConfigError {
    #[error("state tax rate must be between 0 and 1, got {0}")]
    InvalidStateRate(Decimal),

    #[error("medicare tax rate must be between 0 and 1, got {0}")]
    InvalidMedicareRate(Decimal),

    #[error("social security tax rate must be between 0 and 1, got {0}")]
    InvalidSocialSecurityRate(Decimal),

    #[error("flat self-employment rate must be between 0 and 1, got {0}")]
    InvalidFlatSeRate(Decimal),

    #[error("social security wage base must be positive, got {0}")]
    InvalidWageBase(Decimal),

    #[error("at least one federal bracket is required")]
    EmptyBrackets,

    #[error("federal brackets must start at zero, got {0}")]
    BracketsMustStartAtZero(Decimal),

    #[error("federal bracket rate must be between 0 and 1, got {0}")]
    InvalidBracketRate(Decimal),

    #[error("federal brackets must be contiguous: expected lower bound {expected}, got {found}")]
    BracketGap { expected: Decimal, found: Decimal },

    #[error("only the last federal bracket may be open-ended")]
    NonFinalOpenBracket,

    #[error("the last federal bracket must be open-ended")]
    BoundedFinalBracket,
}

/// Errors raised by the calculator itself.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxError {
    #[error("gross amount must not be negative, got {0}")]
    NegativeGross(Decimal),
}

/// Immutable tax-table configuration, supplied once at initialization.
///
/// The defaults reproduce the 2023 federal schedule, the Louisiana 4% flat
/// state rate, and the standard self-employment components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxConfig {
    /// Ordered, contiguous federal brackets covering `[0, inf)`.
    pub federal_brackets: Vec<FederalBracket>,

    /// Flat state income tax rate.
    pub state_rate: Decimal,

    /// Medicare component of self-employment tax; applies to the full
    /// gross with no cap.
    pub medicare_rate: Decimal,

    /// Social Security component of self-employment tax; applies up to
    /// `ss_wage_base`.
    pub ss_rate: Decimal,

    /// Maximum earnings subject to the Social Security component.
    pub ss_wage_base: Decimal,

    /// Combined flat self-employment rate used by the statement view only.
    pub se_flat_rate: Decimal,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            federal_brackets: vec![
                bracket(dec!(0), Some(dec!(11000)), dec!(0.10)),
                bracket(dec!(11000), Some(dec!(44725)), dec!(0.12)),
                bracket(dec!(44725), Some(dec!(95375)), dec!(0.22)),
                bracket(dec!(95375), Some(dec!(182100)), dec!(0.24)),
                bracket(dec!(182100), Some(dec!(231250)), dec!(0.32)),
                bracket(dec!(231250), Some(dec!(578125)), dec!(0.35)),
                bracket(dec!(578125), None, dec!(0.37)),
            ],
            state_rate: dec!(0.04),
            medicare_rate: dec!(0.029),
            ss_rate: dec!(0.124),
            ss_wage_base: dec!(168666),
            se_flat_rate: dec!(0.153),
        }
    }
}

fn bracket(lower: Decimal, upper: Option<Decimal>, rate: Decimal) -> FederalBracket {
    FederalBracket { lower, upper, rate }
}

fn rate_in_range(rate: Decimal) -> bool {
    rate >= Decimal::ZERO && rate <= Decimal::ONE
}

impl TaxConfig {
    /// Validates rates and the shape of the bracket table.
    ///
    /// Brackets must be non-empty, start at zero, be contiguous in order,
    /// and end with a single open-ended bracket.
    pub fn validate(&self) -> Result<(), TaxConfigError> {
        if !rate_in_range(self.state_rate) {
            return Err(TaxConfigError::InvalidStateRate(self.state_rate));
        }
        if !rate_in_range(self.medicare_rate) {
            return Err(TaxConfigError::InvalidMedicareRate(self.medicare_rate));
        }
        if !rate_in_range(self.ss_rate) {
            return Err(TaxConfigError::InvalidSocialSecurityRate(self.ss_rate));
        }
        if !rate_in_range(self.se_flat_rate) {
            return Err(TaxConfigError::InvalidFlatSeRate(self.se_flat_rate));
        }
        if self.ss_wage_base <= Decimal::ZERO {
            return Err(TaxConfigError::InvalidWageBase(self.ss_wage_base));
        }

        if self.federal_brackets.is_empty() {
            return Err(TaxConfigError::EmptyBrackets);
        }

        let mut expected_lower = Decimal::ZERO;
        let last = self.federal_brackets.len() - 1;
        for (i, bracket) in self.federal_brackets.iter().enumerate() {
            if i == 0 && bracket.lower != Decimal::ZERO {
                return Err(TaxConfigError::BracketsMustStartAtZero(bracket.lower));
            }
            if !rate_in_range(bracket.rate) {
                return Err(TaxConfigError::InvalidBracketRate(bracket.rate));
            }
            if bracket.lower != expected_lower {
                return Err(TaxConfigError::BracketGap {
                    expected: expected_lower,
                    found: bracket.lower,
                });
            }
            match bracket.upper {
                Some(upper) => {
                    if i == last {
                        return Err(TaxConfigError::BoundedFinalBracket);
                    }
                    expected_lower = upper;
                }
                None => {
                    if i != last {
                        return Err(TaxConfigError::NonFinalOpenBracket);
                    }
                }
            }
        }

        Ok(())
    }
}

/// Pure calculator over a validated [`TaxConfig`].
///
/// Holds no mutable state; safe to share across concurrent computations.
#[derive(Debug, Clone)]
pub struct TaxCalculator {
    config: TaxConfig,
}

impl TaxCalculator {
    /// Validates the configuration and wraps it in a calculator.
    pub fn new(config: TaxConfig) -> Result<Self, TaxConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TaxConfig {
        &self.config
    }

    fn ensure_non_negative(gross: Decimal) -> Result<(), TaxError> {
        if gross < Decimal::ZERO {
            return Err(TaxError::NegativeGross(gross));
        }
        Ok(())
    }

    /// Progressive federal tax: the sum over every bracket below `gross`
    /// of the slice of income inside that bracket times its rate.
    ///
    /// Iteration stops at the first bracket whose lower bound is at or
    /// above `gross`; an amount exactly on a boundary is taxed entirely
    /// at the rates below it.
    pub fn federal_tax(&self, gross: Decimal) -> Result<Decimal, TaxError> {
        Self::ensure_non_negative(gross)?;

        let mut tax = Decimal::ZERO;
        for bracket in &self.config.federal_brackets {
            if gross <= bracket.lower {
                break;
            }
            let top = match bracket.upper {
                Some(upper) => gross.min(upper),
                None => gross,
            };
            tax += (top - bracket.lower) * bracket.rate;
        }

        Ok(tax)
    }

    /// Flat state tax on the full gross.
    pub fn state_tax(&self, gross: Decimal) -> Result<Decimal, TaxError> {
        Self::ensure_non_negative(gross)?;
        Ok(gross * self.config.state_rate)
    }

    /// Self-employment tax: uncapped Medicare plus Social Security capped
    /// at the wage base.
    pub fn self_employment_tax(&self, gross: Decimal) -> Result<Decimal, TaxError> {
        Self::ensure_non_negative(gross)?;

        let medicare = gross * self.config.medicare_rate;
        let social_security = gross.min(self.config.ss_wage_base) * self.config.ss_rate;

        Ok(medicare + social_security)
    }

    /// Combined flat self-employment rate with no wage-base cap.
    ///
    /// Used only when recomputing taxes due for statements; the breakdown
    /// path uses [`Self::self_employment_tax`] instead.
    pub fn flat_self_employment_tax(&self, gross: Decimal) -> Result<Decimal, TaxError> {
        Self::ensure_non_negative(gross)?;
        Ok(gross * self.config.se_flat_rate)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn calculator() -> TaxCalculator {
        TaxCalculator::new(TaxConfig::default()).unwrap()
    }

    // =========================================================================
    // TaxConfig::validate tests
    // =========================================================================

    #[test]
    fn validate_accepts_default_config() {
        assert_eq!(TaxConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_state_rate_above_one() {
        let config = TaxConfig {
            state_rate: dec!(1.5),
            ..TaxConfig::default()
        };

        assert_eq!(
            config.validate(),
            Err(TaxConfigError::InvalidStateRate(dec!(1.5)))
        );
    }

    #[test]
    fn validate_rejects_negative_medicare_rate() {
        let config = TaxConfig {
            medicare_rate: dec!(-0.1),
            ..TaxConfig::default()
        };

        assert_eq!(
            config.validate(),
            Err(TaxConfigError::InvalidMedicareRate(dec!(-0.1)))
        );
    }

    #[test]
    fn validate_rejects_zero_wage_base() {
        let config = TaxConfig {
            ss_wage_base: dec!(0),
            ..TaxConfig::default()
        };

        assert_eq!(
            config.validate(),
            Err(TaxConfigError::InvalidWageBase(dec!(0)))
        );
    }

    #[test]
    fn validate_rejects_empty_bracket_table() {
        let config = TaxConfig {
            federal_brackets: vec![],
            ..TaxConfig::default()
        };

        assert_eq!(config.validate(), Err(TaxConfigError::EmptyBrackets));
    }

    #[test]
    fn validate_rejects_table_not_starting_at_zero() {
        let config = TaxConfig {
            federal_brackets: vec![bracket(dec!(100), None, dec!(0.10))],
            ..TaxConfig::default()
        };

        assert_eq!(
            config.validate(),
            Err(TaxConfigError::BracketsMustStartAtZero(dec!(100)))
        );
    }

    #[test]
    fn validate_rejects_gapped_brackets() {
        let config = TaxConfig {
            federal_brackets: vec![
                bracket(dec!(0), Some(dec!(10000)), dec!(0.10)),
                bracket(dec!(20000), None, dec!(0.20)),
            ],
            ..TaxConfig::default()
        };

        assert_eq!(
            config.validate(),
            Err(TaxConfigError::BracketGap {
                expected: dec!(10000),
                found: dec!(20000),
            })
        );
    }

    #[test]
    fn validate_rejects_bounded_final_bracket() {
        let config = TaxConfig {
            federal_brackets: vec![bracket(dec!(0), Some(dec!(10000)), dec!(0.10))],
            ..TaxConfig::default()
        };

        assert_eq!(config.validate(), Err(TaxConfigError::BoundedFinalBracket));
    }

    #[test]
    fn validate_rejects_open_bracket_before_the_last() {
        let config = TaxConfig {
            federal_brackets: vec![
                bracket(dec!(0), None, dec!(0.10)),
                bracket(dec!(10000), None, dec!(0.20)),
            ],
            ..TaxConfig::default()
        };

        assert_eq!(config.validate(), Err(TaxConfigError::NonFinalOpenBracket));
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = TaxConfig {
            ss_rate: dec!(2),
            ..TaxConfig::default()
        };

        let result = TaxCalculator::new(config);

        assert!(matches!(
            result,
            Err(TaxConfigError::InvalidSocialSecurityRate(_))
        ));
    }

    // =========================================================================
    // federal_tax tests
    // =========================================================================

    #[test]
    fn federal_tax_is_zero_at_zero_gross() {
        assert_eq!(calculator().federal_tax(dec!(0)), Ok(dec!(0)));
    }

    #[test]
    fn federal_tax_taxes_first_bracket_only_below_threshold() {
        assert_eq!(calculator().federal_tax(dec!(10000)), Ok(dec!(1000.00)));
    }

    #[test]
    fn federal_tax_on_bracket_boundary_uses_lower_rate_entirely() {
        // Exactly 11,000: the whole amount is taxed at 10%, none at 12%.
        assert_eq!(calculator().federal_tax(dec!(11000)), Ok(dec!(1100.00)));
    }

    #[test]
    fn federal_tax_spans_multiple_brackets() {
        // 11,000 * 10% + (44,725 - 11,000) * 12% + (50,000 - 44,725) * 22%
        assert_eq!(calculator().federal_tax(dec!(50000)), Ok(dec!(6307.50)));
    }

    #[test]
    fn federal_tax_reaches_top_open_bracket() {
        // Sum of all bounded slices plus 37% on the remainder.
        let expected = dec!(1100)
            + dec!(33725) * dec!(0.12)
            + dec!(50650) * dec!(0.22)
            + dec!(86725) * dec!(0.24)
            + dec!(49150) * dec!(0.32)
            + dec!(346875) * dec!(0.35)
            + dec!(21875) * dec!(0.37);

        assert_eq!(calculator().federal_tax(dec!(600000)), Ok(expected));
    }

    #[test]
    fn federal_tax_is_monotonic() {
        let calculator = calculator();
        let samples = [
            dec!(0),
            dec!(500),
            dec!(11000),
            dec!(11001),
            dec!(44725),
            dec!(95375),
            dec!(182100),
            dec!(231250),
            dec!(578125),
            dec!(600000),
        ];

        let mut previous = Decimal::ZERO;
        for gross in samples {
            let tax = calculator.federal_tax(gross).unwrap();
            assert!(
                tax >= previous,
                "federal tax decreased at gross {gross}: {tax} < {previous}"
            );
            previous = tax;
        }
    }

    #[test]
    fn federal_tax_rejects_negative_gross() {
        assert_eq!(
            calculator().federal_tax(dec!(-1)),
            Err(TaxError::NegativeGross(dec!(-1)))
        );
    }

    // =========================================================================
    // state_tax tests
    // =========================================================================

    #[test]
    fn state_tax_applies_flat_rate() {
        assert_eq!(calculator().state_tax(dec!(10000)), Ok(dec!(400.00)));
    }

    #[test]
    fn state_tax_rejects_negative_gross() {
        assert_eq!(
            calculator().state_tax(dec!(-0.01)),
            Err(TaxError::NegativeGross(dec!(-0.01)))
        );
    }

    // =========================================================================
    // self_employment_tax tests
    // =========================================================================

    #[test]
    fn se_tax_combines_medicare_and_social_security() {
        // 10,000 * 2.9% + 10,000 * 12.4%
        assert_eq!(
            calculator().self_employment_tax(dec!(10000)),
            Ok(dec!(1530.00))
        );
    }

    #[test]
    fn se_tax_caps_social_security_at_wage_base() {
        // Medicare stays uncapped; Social Security stops at 168,666.
        let expected = dec!(500000) * dec!(0.029) + dec!(168666) * dec!(0.124);

        assert_eq!(
            calculator().self_employment_tax(dec!(500000)),
            Ok(expected)
        );
    }

    #[test]
    fn se_tax_at_the_wage_base_taxes_the_full_gross() {
        let expected = dec!(168666) * (dec!(0.029) + dec!(0.124));

        assert_eq!(
            calculator().self_employment_tax(dec!(168666)),
            Ok(expected)
        );
    }

    #[test]
    fn se_tax_rejects_negative_gross() {
        assert_eq!(
            calculator().self_employment_tax(dec!(-100)),
            Err(TaxError::NegativeGross(dec!(-100)))
        );
    }

    // =========================================================================
    // flat_self_employment_tax tests
    // =========================================================================

    #[test]
    fn flat_se_tax_ignores_the_wage_base() {
        assert_eq!(
            calculator().flat_self_employment_tax(dec!(500000)),
            Ok(dec!(76500.000))
        );
    }

    #[test]
    fn flat_se_tax_differs_from_capped_se_tax_above_the_base() {
        let calculator = calculator();
        let gross = dec!(500000);

        let flat = calculator.flat_self_employment_tax(gross).unwrap();
        let capped = calculator.self_employment_tax(gross).unwrap();

        assert!(flat > capped);
    }
}
