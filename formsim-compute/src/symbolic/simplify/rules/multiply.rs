//! Rules for the factors of a product.

use crate::primitive::int;
use crate::symbolic::{
    expr::{Primary, SymExpr},
    simplify::fraction::{extract_integer_fraction, make_fraction},
};

fn is_one(expr: &SymExpr) -> bool {
    expr.as_integer().map_or(false, |n| n == &1)
}

/// Splits a factor into its base and exponent. Anything that is not a power has exponent `1`.
fn split_power(factor: &SymExpr) -> (SymExpr, SymExpr) {
    match factor {
        SymExpr::Exp(base, exp) => ((**base).clone(), (**exp).clone()),
        factor => (factor.clone(), SymExpr::Primary(Primary::Integer(int(1)))),
    }
}

/// `0*a = 0`
pub fn multiply_zero(factors: &[SymExpr]) -> Option<SymExpr> {
    factors.iter()
        .any(SymExpr::is_zero)
        .then(|| SymExpr::Primary(Primary::Integer(int(0))))
}

/// `1*a = a`
pub fn multiply_one(factors: &[SymExpr]) -> Option<SymExpr> {
    if !factors.iter().any(is_one) {
        return None;
    }

    let rest = factors.iter().filter(|factor| !is_one(factor)).cloned().collect();
    Some(SymExpr::Mul(rest).downgrade())
}

/// `(a*b)*c = a*b*c`
///
/// Also unwraps products with fewer than two factors.
pub fn flatten_product(factors: &[SymExpr]) -> Option<SymExpr> {
    if factors.len() < 2 {
        return Some(SymExpr::Mul(factors.to_vec()).downgrade());
    }
    if !factors.iter().any(|factor| matches!(factor, SymExpr::Mul(_))) {
        return None;
    }

    let flat = factors.iter()
        .flat_map(|factor| match factor {
            SymExpr::Mul(inner) => inner.clone(),
            factor => vec![factor.clone()],
        })
        .collect();
    Some(SymExpr::Mul(flat))
}

/// Reduces the integer fraction among the factors to lowest terms.
///
/// `3/12 = 1/4`
/// `12/3 = 4`
pub fn reduce_numerical_fraction(factors: &[SymExpr]) -> Option<SymExpr> {
    let mut rest = factors.to_vec();
    let (numerator, denominator) = extract_integer_fraction(&mut rest, false, false)?;

    // division by zero is reported by the driver
    if denominator.is_zero() {
        return None;
    }

    // the sign ends up in the numerator
    let mut divisor = numerator.clone().gcd(&denominator);
    if denominator < 0 {
        divisor = -divisor;
    }
    if divisor == 1 {
        return None;
    }

    let reduced = make_fraction(
        SymExpr::Primary(Primary::Integer(numerator / &divisor)),
        SymExpr::Primary(Primary::Integer(denominator / &divisor)),
    );
    Some(SymExpr::Mul(rest) * reduced)
}

/// Merges factors with the same base, or numeric factors with the same exponent.
///
/// `a^b*a^c = a^(b+c)`
/// `2^c*3^c = 6^c`
pub fn combine_like_factors(factors: &[SymExpr]) -> Option<SymExpr> {
    // (base, exponent) pairs, in order of first appearance
    let mut merged: Vec<(SymExpr, SymExpr)> = Vec::with_capacity(factors.len());
    for factor in factors {
        let (base, exp) = split_power(factor);
        let existing = merged.iter_mut().find(|(other_base, other_exp)| {
            *other_base == base || (*other_exp == exp && other_base.is_number() && base.is_number())
        });

        match existing {
            Some((other_base, other_exp)) if *other_base == base => {
                let previous = std::mem::replace(other_exp, SymExpr::Add(Vec::new()));
                *other_exp = previous + exp;
            },
            Some((other_base, _)) => {
                let previous = std::mem::replace(other_base, SymExpr::Mul(Vec::new()));
                *other_base = previous * base;
            },
            None => merged.push((base, exp)),
        }
    }

    if merged.len() == factors.len() {
        return None;
    }

    let combined = merged.into_iter()
        .map(|(base, exp)| if is_one(&exp) {
            base
        } else {
            SymExpr::Exp(Box::new(base), Box::new(exp))
        })
        .collect();
    Some(SymExpr::Mul(combined).downgrade())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn sym(name: &str) -> SymExpr {
        SymExpr::Primary(Primary::Symbol(name.to_string()))
    }

    fn integer(n: i32) -> SymExpr {
        SymExpr::Primary(Primary::Integer(int(n)))
    }

    fn pow(base: SymExpr, exp: SymExpr) -> SymExpr {
        SymExpr::Exp(Box::new(base), Box::new(exp))
    }

    #[test]
    fn ones_are_dropped() {
        assert_eq!(multiply_one(&[integer(1), sym("x")]), Some(sym("x")));
        assert_eq!(multiply_one(&[sym("x"), sym("y")]), None);
    }

    #[test]
    fn same_base_adds_exponents() {
        let combined = combine_like_factors(&[sym("x"), sym("y"), pow(sym("x"), integer(2))]);
        assert_eq!(combined, Some(SymExpr::Mul(vec![pow(sym("x"), integer(3)), sym("y")])));
    }

    #[test]
    fn numbers_with_same_exponent_multiply() {
        let combined = combine_like_factors(&[
            pow(integer(2), sym("c")),
            pow(integer(3), sym("c")),
        ]);
        assert_eq!(combined, Some(pow(integer(6), sym("c"))));
    }

    #[test]
    fn distinct_factors_stay() {
        assert_eq!(combine_like_factors(&[sym("x"), sym("y")]), None);
    }
}
