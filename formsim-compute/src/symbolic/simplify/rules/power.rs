//! Rules for the base and exponent of a power.

use crate::primitive::{float, int};
use crate::symbolic::expr::{Primary, SymExpr};
use rug::{ops::Pow, Integer};
use std::cmp::Ordering;

/// Integer powers are only evaluated when the result has at most this many bits.
const MAX_POWER_BITS: u64 = 1 << 16;

/// A power of a sum is only expanded when the expansion has at most this many terms.
const MAX_EXPANDED_TERMS: usize = 256;

fn integer(n: i32) -> SymExpr {
    SymExpr::Primary(Primary::Integer(int(n)))
}

/// `a^0 = 1`
pub fn power_zero(_: &SymExpr, exp: &SymExpr) -> Option<SymExpr> {
    exp.is_zero().then(|| integer(1))
}

/// `0^a = 0`, for positive numbers `a`
pub fn power_zero_left(base: &SymExpr, exp: &SymExpr) -> Option<SymExpr> {
    let positive = exp.numeric_sign() == Some(Ordering::Greater);
    (base.is_zero() && positive).then(|| integer(0))
}

/// `1^a = 1`
pub fn power_one_left(base: &SymExpr, _: &SymExpr) -> Option<SymExpr> {
    (base.as_integer()? == &1).then(|| integer(1))
}

/// `a^1 = a`
pub fn power_one(base: &SymExpr, exp: &SymExpr) -> Option<SymExpr> {
    (exp.as_integer()? == &1).then(|| base.clone())
}

/// `(a^b)^c = a^(b*c)`
pub fn power_power(base: &SymExpr, exp: &SymExpr) -> Option<SymExpr> {
    let SymExpr::Exp(inner_base, inner_exp) = base else {
        return None;
    };
    let product = (**inner_exp).clone() * exp.clone();
    Some(SymExpr::Exp(inner_base.clone(), Box::new(product)))
}

/// Raises an integer to an integer power, if the result is small enough.
///
/// Exponents of `-1`, `0` and `1` give `None`; the first is a fraction and the others have their
/// own rules.
fn integer_power(base: &Integer, exp: &Integer) -> Option<SymExpr> {
    let magnitude = exp.clone().abs().to_u32().filter(|&n| n > 1)?;
    if u64::from(base.significant_bits()) * u64::from(magnitude) > MAX_POWER_BITS {
        return None;
    }

    let value = SymExpr::Primary(Primary::Integer(base.clone().pow(magnitude)));
    if exp.cmp0() == Ordering::Less {
        Some(SymExpr::Exp(Box::new(value), Box::new(integer(-1))))
    } else {
        Some(value)
    }
}

/// Evaluates powers of numbers.
///
/// `2^3 = 8`
/// `2^-3 = 1/8`
/// `2.5^2 = 6.25`
///
/// `a^-1` is left alone, since that is how fractions are represented.
pub fn numeric_power(base: &SymExpr, exp: &SymExpr) -> Option<SymExpr> {
    if let (Some(b), Some(e)) = (base.as_integer(), exp.as_integer()) {
        return integer_power(b, e);
    }

    let has_float = base.is_float() || exp.is_float();
    if !has_float || !base.is_number() || !exp.is_number() {
        return None;
    }

    let value = float(base.numeric_value()?.pow(&exp.numeric_value()?));
    value.is_finite().then(|| SymExpr::Primary(Primary::Float(value)))
}

/// Expands a small integer power of a sum.
///
/// `(a+b)^2 = a*a + a*b + b*a + b*b`
///
/// The products are left for the other rules to combine.
pub fn expand_power(base: &SymExpr, exp: &SymExpr) -> Option<SymExpr> {
    let SymExpr::Add(terms) = base else {
        return None;
    };
    let times = exp.as_integer()?.to_u32().filter(|n| (2..=8).contains(n))?;
    if terms.len().checked_pow(times)? > MAX_EXPANDED_TERMS {
        return None;
    }

    // every way of picking one term from each copy of the sum
    let mut products = vec![SymExpr::Mul(Vec::new())];
    for _ in 0..times {
        let mut next = Vec::with_capacity(products.len() * terms.len());
        for product in &products {
            next.extend(terms.iter().map(|term| product.clone() * term.clone()));
        }
        products = next;
    }

    Some(SymExpr::Add(products.into_iter().map(SymExpr::downgrade).collect()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn sym(name: &str) -> SymExpr {
        SymExpr::Primary(Primary::Symbol(name.to_string()))
    }

    #[test]
    fn integer_powers() {
        assert_eq!(numeric_power(&integer(2), &integer(3)), Some(integer(8)));
        assert_eq!(
            numeric_power(&integer(2), &integer(-3)),
            Some(SymExpr::Exp(Box::new(integer(8)), Box::new(integer(-1)))),
        );
        assert_eq!(numeric_power(&integer(7), &integer(-1)), None);
        assert_eq!(numeric_power(&integer(7), &integer(1)), None);
    }

    #[test]
    fn huge_powers_stay_unevaluated() {
        assert_eq!(numeric_power(&integer(10), &integer(1_000_000)), None);
    }

    #[test]
    fn zero_base_needs_positive_exponent() {
        assert_eq!(power_zero_left(&integer(0), &integer(2)), Some(integer(0)));
        assert_eq!(power_zero_left(&integer(0), &integer(-2)), None);
        assert_eq!(power_zero_left(&integer(0), &sym("x")), None);
    }

    #[test]
    fn square_of_sum() {
        let sum = SymExpr::Add(vec![sym("a"), sym("b")]);
        let expanded = expand_power(&sum, &integer(2));
        assert_eq!(expanded, Some(SymExpr::Add(vec![
            SymExpr::Mul(vec![sym("a"), sym("a")]),
            SymExpr::Mul(vec![sym("a"), sym("b")]),
            SymExpr::Mul(vec![sym("b"), sym("a")]),
            SymExpr::Mul(vec![sym("b"), sym("b")]),
        ])));
        assert_eq!(expand_power(&sum, &integer(9)), None);
    }
}
