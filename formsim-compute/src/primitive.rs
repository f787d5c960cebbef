//! Functions to construct [`Integer`]s, [`Rational`]s and [`Float`]s from various types.

use rug::{Assign, Float, Integer, Rational};

/// The number of bits of precision to use for floating-point values.
pub const PRECISION: u32 = 1 << 9;

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates an [`Integer`] from a string of decimal digits.
///
/// Returns [`None`] if the string is not a valid integer.
pub fn int_from_str(s: &str) -> Option<Integer> {
    Integer::from_str_radix(s, 10).ok()
}

/// Creates a [`Float`] with the given value.
pub fn float<T>(n: T) -> Float
where
    Float: Assign<T>,
{
    Float::with_val(PRECISION, n)
}

/// Creates a [`Float`] from a string slice, such as `3.25` or `2.`.
///
/// Returns [`None`] if the string is not a valid number.
pub fn float_from_str(s: &str) -> Option<Float> {
    let s = s.strip_suffix('.').unwrap_or(s);
    Float::parse(s).ok().map(|parsed| Float::with_val(PRECISION, parsed))
}

/// Creates the [`Rational`] `numerator / denominator`.
///
/// Returns [`None`] if the denominator is zero.
pub fn rational(numerator: Integer, denominator: Integer) -> Option<Rational> {
    if denominator.is_zero() {
        None
    } else {
        Some(Rational::from((numerator, denominator)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn parse_numbers() {
        assert_eq!(int_from_str("1072"), Some(int(1072)));
        assert_eq!(float_from_str("2.5"), Some(float(2.5)));
        assert_eq!(float_from_str("3."), Some(float(3)));
        assert_eq!(int_from_str("12a"), None);
    }

    #[test]
    fn rationals_are_reduced() {
        let half = rational(int(3), int(6)).unwrap();
        assert_eq!(half.numer(), &int(1));
        assert_eq!(half.denom(), &int(2));
        assert_eq!(rational(int(1), int(0)), None);
    }
}
