//! Shared helpers for monetary calculations.

use rust_decimal::Decimal;

/// Rounds a decimal to exactly two decimal places using half-up rounding
/// (midpoints round away from zero, the standard financial convention).
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
    }

    #[test]
    fn round_half_up_rounds_away_from_zero_for_negatives() {
        assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
    }

    #[test]
    fn round_half_up_preserves_already_rounded_values() {
        assert_eq!(round_half_up(dec!(123.45)), dec!(123.45));
    }
}
