//! Common decimal helpers for tax calculations.
//!
//! The engine itself never rounds; [`round_half_up`] is applied only when an
//! amount is displayed.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use slabtax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(1250.004)), dec!(1250.00));
/// assert_eq!(round_half_up(dec!(1250.005)), dec!(1250.01));
/// assert_eq!(round_half_up(dec!(-1250.005)), dec!(-1250.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use slabtax_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-75000), dec!(0)), dec!(0));
/// assert_eq!(max(dec!(425000), dec!(0)), dec!(425000));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Divides `numerator` by `denominator`, returning `None` when the
/// denominator is zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use slabtax_core::calculations::common::checked_ratio;
///
/// assert_eq!(checked_ratio(dec!(97500), dec!(1500000)), Some(dec!(0.065)));
/// assert_eq!(checked_ratio(dec!(0), dec!(0)), None);
/// ```
pub fn checked_ratio(
    numerator: Decimal,
    denominator: Decimal,
) -> Option<Decimal> {
    if denominator.is_zero() {
        None
    } else {
        numerator.checked_div(denominator)
    }
}
