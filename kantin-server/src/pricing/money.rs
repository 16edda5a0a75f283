//! Money calculation for discount pricing using rust_decimal
//!
//! Prices are integer currency minor units. The single rounding rule for
//! the whole crate lives here: round to the nearest whole unit, halves
//! away from zero. Checkout pricing and menu display both go through
//! [`discounted_unit_price`], so they can never disagree.

use rust_decimal::prelude::*;

/// Apply a percentage discount to a base price and round to a whole
/// currency minor unit (half away from zero).
///
/// `percentage` is expected to be in `[0, 100]`; callers validate it
/// before it reaches pricing.
pub fn discounted_unit_price(base: i64, percentage: f64) -> i64 {
    let base = Decimal::from(base);
    let pct = Decimal::from_f64(percentage).unwrap_or(Decimal::ZERO);
    let factor = Decimal::ONE - pct / Decimal::ONE_HUNDRED;
    let price = (base * factor).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    // factor is in [0, 1], so the result fits in i64
    price.to_i64().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_off_ten_thousand() {
        // 10000 * 0.75 = 7500 exactly
        assert_eq!(discounted_unit_price(10_000, 25.0), 7_500);
    }

    #[test]
    fn test_half_rounds_away_from_zero() {
        // 999 * 0.5 = 499.5 → 500
        assert_eq!(discounted_unit_price(999, 50.0), 500);
        // 1111 * 0.85 = 944.35 → 944
        assert_eq!(discounted_unit_price(1_111, 15.0), 944);
    }

    #[test]
    fn test_zero_and_full_discount() {
        assert_eq!(discounted_unit_price(10_000, 0.0), 10_000);
        assert_eq!(discounted_unit_price(10_000, 100.0), 0);
    }

    #[test]
    fn test_fractional_percentage() {
        // 10000 * (1 - 0.125) = 8750
        assert_eq!(discounted_unit_price(10_000, 12.5), 8_750);
    }
}
