//! Common utility functions for tax calculations.
//!
//! Rounding and clamping helpers shared by every calculation stage.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to paise (two decimal places) using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(35000.0275)), dec!(35000.03));
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a decimal value up to the next paisa.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_up_paise;
///
/// assert_eq!(round_up_paise(dec!(132794.4111)), dec!(132794.42));
/// assert_eq!(round_up_paise(dec!(132794.41)), dec!(132794.41));
/// ```
pub fn round_up_paise(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::ToPositiveInfinity)
}

/// Rounds a decimal value to whole rupees, half away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_rupees;
///
/// assert_eq!(round_rupees(dec!(97499.50)), dec!(97500));
/// assert_eq!(round_rupees(dec!(97499.49)), dec!(97499));
/// ```
pub fn round_rupees(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps `value` into `[0, ceiling]`.
///
/// A negative `ceiling` yields zero.
pub fn clamp_non_negative(
    value: Decimal,
    ceiling: Decimal,
) -> Decimal {
    max(value.min(ceiling), Decimal::ZERO)
}
