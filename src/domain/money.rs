//! Monetary helpers. Amounts are `BigDecimal` with two fractional digits.

use bigdecimal::{BigDecimal, ToPrimitive};

/// Rounds a floating point amount half away from zero to cents.
pub fn from_f64(value: f64) -> BigDecimal {
    let cents = (value * 100.0).round() as i64;
    BigDecimal::new(cents.into(), 2)
}

pub fn to_f64(value: &BigDecimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

pub fn zero() -> BigDecimal {
    BigDecimal::from(0)
}

pub fn sum<'a, I>(values: I) -> BigDecimal
where
    I: IntoIterator<Item = &'a BigDecimal>,
{
    values.into_iter().fold(zero(), |acc, x| acc + x)
}
