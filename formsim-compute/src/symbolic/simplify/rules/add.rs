//! Rules for the terms of a sum.

use crate::primitive::int;
use crate::symbolic::{
    expr::{Primary, SymExpr},
    simplify::fraction::{extract_explicit_frac, extract_fractional, make_fraction},
};

fn one() -> SymExpr {
    SymExpr::Primary(Primary::Integer(int(1)))
}

/// Adds two numeric coefficients. Fractions are added exactly, and a float on either side makes
/// the result a float.
fn add_coefficients(lhs: SymExpr, rhs: SymExpr) -> SymExpr {
    if lhs.is_float() || rhs.is_float() {
        if let (Some(a), Some(b)) = (lhs.numeric_value(), rhs.numeric_value()) {
            return SymExpr::Primary(Primary::Float(a + b));
        }
    }

    let (Some((n1, d1)), Some((n2, d2))) = (
        extract_explicit_frac(&mut lhs.clone()),
        extract_explicit_frac(&mut rhs.clone()),
    ) else {
        return lhs + rhs;
    };

    // n1/d1 + n2/d2 = (n1*d2 + n2*d1) / (d1*d2)
    let numerator = n1 * &d2 + n2 * &d1;
    let denominator = d1 * d2;
    if denominator == 1 {
        SymExpr::Primary(Primary::Integer(numerator))
    } else {
        make_fraction(
            SymExpr::Primary(Primary::Integer(numerator)),
            SymExpr::Primary(Primary::Integer(denominator)),
        )
    }
}

/// Splits a term into its numeric coefficient and the rest of the term.
///
/// - `5` -> `(5, 1)`
/// - `3*a` -> `(3, a)`
/// - `1/4*a*b` -> `(1/4, a*b)`
/// - `a` -> `(1, a)`
fn split_coefficient(term: &SymExpr) -> (SymExpr, SymExpr) {
    match term {
        SymExpr::Primary(Primary::Integer(_) | Primary::Float(_)) => (term.clone(), one()),
        SymExpr::Exp(..) if term.is_integer_recip() => (term.clone(), one()),
        SymExpr::Mul(factors) => {
            let mut rest = factors.clone();
            let coefficient = extract_fractional(&mut rest).unwrap_or_else(one);
            (coefficient, SymExpr::Mul(rest).downgrade())
        },
        _ => (one(), term.clone()),
    }
}

/// `0+a = a`
pub fn add_zero(terms: &[SymExpr]) -> Option<SymExpr> {
    if !terms.iter().any(SymExpr::is_zero) {
        return None;
    }

    let nonzero = terms.iter().filter(|term| !term.is_zero()).cloned().collect();
    Some(SymExpr::Add(nonzero).downgrade())
}

/// `(a+b)+c = a+b+c`
///
/// Also unwraps sums with fewer than two terms.
pub fn flatten_sum(terms: &[SymExpr]) -> Option<SymExpr> {
    if terms.len() < 2 {
        return Some(SymExpr::Add(terms.to_vec()).downgrade());
    }
    if !terms.iter().any(|term| matches!(term, SymExpr::Add(_))) {
        return None;
    }

    let flat = terms.iter()
        .flat_map(|term| match term {
            SymExpr::Add(inner) => inner.clone(),
            term => vec![term.clone()],
        })
        .collect();
    Some(SymExpr::Add(flat))
}

/// Combines terms that only differ in their numeric coefficient.
///
/// `a+a = 2a`
/// `2a+3a = 5a`
/// `1/2 + 1/3 = 5/6`
pub fn combine_like_terms(terms: &[SymExpr]) -> Option<SymExpr> {
    // each group is the rest of a term, and the sum of the coefficients of every term with that
    // rest, in order of first appearance
    let mut groups: Vec<(SymExpr, SymExpr)> = Vec::with_capacity(terms.len());
    for term in terms {
        let (coefficient, rest) = split_coefficient(term);
        match groups.iter_mut().find(|(other, _)| *other == rest) {
            Some((_, sum)) => {
                let previous = std::mem::replace(sum, one());
                *sum = add_coefficients(previous, coefficient);
            },
            None => groups.push((rest, coefficient)),
        }
    }

    if groups.len() == terms.len() {
        return None;
    }

    let combined = groups.into_iter()
        .map(|(rest, coefficient)| {
            let is_one = |expr: &SymExpr| expr.as_integer().map_or(false, |n| n == &1);
            if is_one(&coefficient) {
                rest
            } else if is_one(&rest) {
                coefficient
            } else {
                coefficient * rest
            }
        })
        .collect();
    Some(SymExpr::Add(combined).downgrade())
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

    fn recip(n: i32) -> SymExpr {
        SymExpr::Exp(Box::new(integer(n)), Box::new(integer(-1)))
    }

    #[test]
    fn coefficients_add_up() {
        let terms = [
            SymExpr::Mul(vec![integer(2), sym("a")]),
            sym("b"),
            SymExpr::Mul(vec![integer(3), sym("a")]),
        ];
        assert_eq!(combine_like_terms(&terms), Some(SymExpr::Add(vec![
            SymExpr::Mul(vec![integer(5), sym("a")]),
            sym("b"),
        ])));
    }

    #[test]
    fn fractions_add_exactly() {
        // 1/2 + 1/3 = 5/6
        let combined = combine_like_terms(&[recip(2), recip(3)]);
        assert_eq!(combined, Some(make_fraction(integer(5), integer(6))));
    }

    #[test]
    fn opposite_terms_cancel() {
        let terms = [sym("x"), SymExpr::Mul(vec![integer(-1), sym("x")])];
        assert_eq!(
            combine_like_terms(&terms),
            Some(SymExpr::Mul(vec![integer(0), sym("x")])),
        );
    }

    #[test]
    fn repeated_factors_are_distinct_terms() {
        let terms = [
            SymExpr::Mul(vec![sym("x"), sym("x"), sym("y")]),
            SymExpr::Mul(vec![integer(-1), sym("x"), sym("y"), sym("y")]),
        ];
        assert_eq!(combine_like_terms(&terms), None);
    }

    #[test]
    fn zeros_are_dropped() {
        assert_eq!(add_zero(&[integer(0), sym("x")]), Some(sym("x")));
        assert_eq!(add_zero(&[sym("x"), sym("y")]), None);
    }
}
