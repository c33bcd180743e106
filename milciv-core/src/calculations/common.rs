//! Shared arithmetic helpers for the calculators.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::InputError;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Largest accepted monetary input or bonus percentage. Keeps every product
/// and running total the calculators form well inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 round away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use milciv_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Annual amount spread over twelve months, rounded to cents.
pub fn to_monthly(annual: Decimal) -> Decimal {
    round_half_up(annual / MONTHS_PER_YEAR)
}

pub fn to_annual(monthly: Decimal) -> Decimal {
    monthly * MONTHS_PER_YEAR
}

/// Rejects a monetary input below zero or above [`MAX_AMOUNT`], naming the
/// offending field.
pub fn ensure_amount(
    field: &'static str,
    value: Decimal,
) -> Result<Decimal, InputError> {
    if value < Decimal::ZERO {
        return Err(InputError::NegativeAmount { field, value });
    }
    if value > MAX_AMOUNT {
        return Err(InputError::AmountTooLarge { field, value });
    }
    Ok(value)
}

/// `part / whole` to four decimal places, or zero when `whole` is not positive.
pub fn rate_or_zero(
    part: Decimal,
    whole: Decimal,
) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (part / whole).round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
}
