//! Money helpers for fixed-precision financial arithmetic
//!
//! All engine math runs on `rust_decimal::Decimal` at full precision.
//! Currency rounding to 2 decimal places happens only at output boundaries
//! (tables, CSV, summaries), so multi-decade compounding never accumulates
//! presentation-rounding drift.

use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};

/// Apply one whole year of compound growth: `value * (1 + rate)`.
///
/// Rates may be negative. There is no day counting or partial-year
/// interpolation; all events occur at year boundaries.
pub fn apply_annual_rate(value: Decimal, rate: Decimal) -> Decimal {
    value * (Decimal::ONE + rate)
}

/// Compound factor for a whole number of years: `(1 + rate)^years`.
pub fn compound_factor(rate: Decimal, years: u32) -> Decimal {
    (Decimal::ONE + rate).powi(i64::from(years))
}

/// Inflation-adjust an amount over `years` elapsed years:
/// `amount * (1 + rate)^years`.
pub fn inflation_adjusted(amount: Decimal, rate: Decimal, years: u32) -> Decimal {
    amount * compound_factor(rate, years)
}

/// Round to currency presentation (2 decimal places, half away from zero).
///
/// Output-boundary only; never feed the result back into compounding.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_apply_annual_rate() {
        assert_eq!(apply_annual_rate(dec!(1000), dec!(0.05)), dec!(1050.00));
        assert_eq!(apply_annual_rate(dec!(100000), dec!(0.06)), dec!(106000.00));
    }

    #[test]
    fn test_negative_rate_shrinks_value() {
        assert_eq!(apply_annual_rate(dec!(1000), dec!(-0.10)), dec!(900.00));
    }

    #[test]
    fn test_compound_factor_exact_integer_powers() {
        assert_eq!(compound_factor(dec!(0.03), 0), dec!(1));
        assert_eq!(compound_factor(dec!(0.03), 1), dec!(1.03));
        assert_eq!(compound_factor(dec!(0.03), 2), dec!(1.0609));
    }

    #[test]
    fn test_inflation_adjusted() {
        assert_eq!(inflation_adjusted(dec!(50000), dec!(0.03), 2), dec!(53045.0000));
        assert_eq!(inflation_adjusted(dec!(500), dec!(0.03), 0), dec!(500));
    }

    #[test]
    fn test_round_currency_half_up() {
        assert_eq!(round_currency(dec!(10.005)), dec!(10.01));
        assert_eq!(round_currency(dec!(10.004)), dec!(10.00));
        assert_eq!(round_currency(dec!(-10.005)), dec!(-10.01));
    }

    #[test]
    fn test_no_drift_over_decades() {
        // 40 years of 7% growth stays exact in decimal space
        let mut value = dec!(100000);
        for _ in 0..40 {
            value = apply_annual_rate(value, dec!(0.07));
        }
        let direct = dec!(100000) * compound_factor(dec!(0.07), 40);
        assert_eq!(round_currency(value), round_currency(direct));
    }
}
