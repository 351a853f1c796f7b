//! Exact-money helpers.
//!
//! Every amount is a [`Decimal`]; nothing here touches binary floating
//! point. Rounding to currency precision is half-up (away from zero on a
//! tie), which is the rule every split policy uses.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants;

/// Round to `scale` decimal places, ties away from zero.
#[must_use]
pub fn round_half_up(value: Decimal, scale: u32) -> Decimal {
    value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to currency precision (cents).
#[must_use]
pub fn round_currency(value: Decimal) -> Decimal {
    round_half_up(value, constants::CURRENCY_SCALE)
}

/// Whether `value` is within `tolerance` of zero.
#[must_use]
pub fn is_negligible(value: Decimal, tolerance: Decimal) -> bool {
    value.abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_ties_away_from_zero() {
        assert_eq!(round_currency(Decimal::new(12345, 3)), Decimal::new(1235, 2));
        assert_eq!(round_currency(Decimal::new(-12345, 3)), Decimal::new(-1235, 2));
        assert_eq!(round_currency(Decimal::new(12344, 3)), Decimal::new(1234, 2));
    }

    #[test]
    fn one_third_of_a_hundred() {
        let third = Decimal::ONE_HUNDRED / Decimal::from(3);
        assert_eq!(round_currency(third), Decimal::new(3333, 2));
    }

    #[test]
    fn negligible_includes_boundary() {
        let tol = constants::SETTLE_TOLERANCE;
        assert!(is_negligible(Decimal::new(1, 2), tol));
        assert!(is_negligible(Decimal::new(-1, 2), tol));
        assert!(!is_negligible(Decimal::new(2, 2), tol));
    }
}
