//! Tools to help manipulate fractions.

use crate::primitive::int;
use crate::symbolic::expr::{Primary, SymExpr};
use rug::Integer;

/// Create a [`SymExpr`] representing a fraction with the given numerator and denominator.
///
/// The representation is a [`SymExpr::Mul`] containing two factors. The first factor is the
/// numerator, and the second factor is the denominator raised to the power of -1.
pub(crate) fn make_fraction(numerator: SymExpr, denominator: SymExpr) -> SymExpr {
    numerator *
        SymExpr::Exp(
            Box::new(denominator),
            Box::new(SymExpr::Primary(Primary::Integer(int(-1)))),
        )
}

/// Extracts a numerical fraction from the factors of a [`SymExpr::Mul`].
///
/// Fractions are represented as a [`SymExpr::Mul`] containing a [`Primary::Integer`], and a
/// [`SymExpr::Exp`], where the base is a [`Primary::Integer`] and the exponent is `-1`.
///
/// This function finds two integer factors that match this pattern, removes them, and returns the
/// numerator and denominator. If `numerator_optional` is `true`, an implied 1 is returned as the
/// numerator when no [`Primary::Integer`] is found; `denominator_optional` does the same for the
/// denominator.
pub(crate) fn extract_integer_fraction(
    factors: &mut Vec<SymExpr>,
    numerator_optional: bool,
    denominator_optional: bool,
) -> Option<(Integer, Integer)> {
    let numerator_idx = factors.iter().position(SymExpr::is_integer);
    let denominator_idx = factors.iter().position(SymExpr::is_integer_recip);

    // remove the larger index first, so that the smaller index is still valid
    let (numerator, denominator) = match (numerator_idx, denominator_idx) {
        (Some(n), Some(d)) if n > d => {
            let numerator = factors.swap_remove(n).into_integer();
            (numerator, factors.swap_remove(d).into_integer_recip())
        },
        (n, d) => {
            let denominator = d.and_then(|d| factors.swap_remove(d).into_integer_recip());
            (n.and_then(|n| factors.swap_remove(n).into_integer()), denominator)
        },
    };

    match (numerator, denominator) {
        (Some(numerator), Some(denominator)) => Some((numerator, denominator)),
        (Some(numerator), None) if denominator_optional => Some((numerator, int(1))),
        (None, Some(denominator)) if numerator_optional => Some((int(1), denominator)),
        (None, None) if numerator_optional && denominator_optional => Some((int(1), int(1))),
        (numerator, denominator) => {
            // put back whatever was taken out
            factors.extend(numerator.map(|n| SymExpr::Primary(Primary::Integer(n))));
            factors.extend(denominator.map(|d| SymExpr::Exp(
                Box::new(SymExpr::Primary(Primary::Integer(d))),
                Box::new(SymExpr::Primary(Primary::Integer(int(-1)))),
            )));
            None
        },
    }
}

/// Extracts the numeric coefficient from the factors of a [`SymExpr::Mul`]. This is like
/// [`extract_integer_fraction`], but the result of the function is a [`SymExpr`], and not the
/// extracted numerator and denominator.
///
/// A [`Primary::Float`] is extracted as-is.
pub(crate) fn extract_fractional(factors: &mut Vec<SymExpr>) -> Option<SymExpr> {
    if let Some(idx) = factors.iter().position(SymExpr::is_float) {
        return Some(factors.swap_remove(idx));
    }

    let numerator_idx = factors.iter().position(SymExpr::is_integer);
    let denominator_idx = factors.iter().position(SymExpr::is_integer_recip);
    match (numerator_idx, denominator_idx) {
        (Some(numerator_idx), Some(denominator_idx)) => {
            // remove larger index first, so that the smaller index is still valid
            if numerator_idx > denominator_idx {
                Some(factors.swap_remove(numerator_idx)
                    * factors.swap_remove(denominator_idx))
            } else {
                Some(factors.swap_remove(denominator_idx)
                    * factors.swap_remove(numerator_idx))
            }
        },
        (Some(numerator_idx), None) => Some(factors.swap_remove(numerator_idx)),
        (None, Some(denominator_idx)) => Some(factors.swap_remove(denominator_idx)),
        (None, None) => None,
    }
}

/// Extracts a numerical fraction from an expression, replacing the extracted part with a
/// [`Primary::Integer`] containing the number 1.
///
/// - [`Primary::Integer`] `n` -> `n / 1`
/// - [`SymExpr::Mul`] -> the first integer factor over the first integer reciprocal factor (or 1)
/// - [`SymExpr::Exp`] `d^-1` -> `1 / d`
pub(crate) fn extract_explicit_frac(expr: &mut SymExpr) -> Option<(Integer, Integer)> {
    match expr {
        SymExpr::Primary(Primary::Integer(num)) => {
            Some((std::mem::replace(num, int(1)), int(1)))
        },
        SymExpr::Mul(factors) => extract_integer_fraction(factors, false, true),
        SymExpr::Exp(..) if expr.is_integer_recip() => {
            let denominator = std::mem::replace(expr, SymExpr::Primary(Primary::Integer(int(1))))
                .into_integer_recip()?;
            Some((int(1), denominator))
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn integer(n: i32) -> SymExpr {
        SymExpr::Primary(Primary::Integer(int(n)))
    }

    fn x() -> SymExpr {
        SymExpr::Primary(Primary::Symbol("x".to_string()))
    }

    #[test]
    fn extract_fraction_from_factors() {
        let mut factors = vec![x(), make_fraction(integer(3), integer(4))];
        let SymExpr::Mul(fraction) = factors.remove(1) else { panic!("not a product") };
        factors.extend(fraction);

        assert_eq!(extract_integer_fraction(&mut factors, false, false), Some((int(3), int(4))));
        assert_eq!(factors, vec![x()]);
    }

    #[test]
    fn missing_denominator_is_restored() {
        let mut factors = vec![x(), integer(5)];
        assert_eq!(extract_integer_fraction(&mut factors, false, false), None);
        assert_eq!(factors.len(), 2);
        assert!(factors.contains(&integer(5)));
    }
}
