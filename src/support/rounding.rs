//! Output rounding helpers.
//!
//! Arithmetic runs on raw `f64`; these are applied only when a response body
//! is built. Rounding goes through `Decimal` so the midpoint rule is applied
//! to the decimal value rather than its binary approximation.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places for cost-per-mile style figures.
pub const CPM_DP: u32 = 4;
/// Decimal places for dollar amounts.
pub const MONEY_DP: u32 = 2;

pub fn round_dp(value: f64, dp: u32) -> f64 {
    match Decimal::from_f64(value) {
        Some(d) => d
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or(value),
        // NaN / infinity have no decimal form
        None => value,
    }
}

pub fn cpm(value: f64) -> f64 {
    round_dp(value, CPM_DP)
}

pub fn money(value: f64) -> f64 {
    round_dp(value, MONEY_DP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_keeps_two_places() {
        assert_eq!(money(2.6751), 2.68);
        assert_eq!(money(-1.2349), -1.23);
        assert_eq!(money(10.0), 10.0);
    }

    #[test]
    fn cpm_keeps_four_places() {
        assert_eq!(cpm(4.2), 4.2);
        assert_eq!(cpm(1.234_56), 1.2346);
        assert_eq!(cpm(0.000_04), 0.0);
    }

    #[test]
    fn non_finite_values_pass_through() {
        assert!(round_dp(f64::NAN, 2).is_nan());
        assert_eq!(round_dp(f64::INFINITY, 2), f64::INFINITY);
    }
}
