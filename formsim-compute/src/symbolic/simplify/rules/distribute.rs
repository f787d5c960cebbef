//! Distribution rules. Unlike the other rules, these can make the expression larger.

use crate::symbolic::expr::SymExpr;

/// `a*(b+c) = a*b + a*c`
///
/// Only the first sum among the factors is distributed over.
pub fn distributive_property(factors: &[SymExpr]) -> Option<SymExpr> {
    let idx = factors.iter().position(|factor| matches!(factor, SymExpr::Add(_)))?;
    let SymExpr::Add(terms) = &factors[idx] else {
        return None;
    };

    let mut others = factors.to_vec();
    others.swap_remove(idx);

    let distributed = terms.iter()
        .map(|term| SymExpr::Mul(others.clone()) * term.clone())
        .collect();
    Some(SymExpr::Add(distributed))
}

/// `(a*b)^c = a^c * b^c`
pub fn distribute_power(base: &SymExpr, exp: &SymExpr) -> Option<SymExpr> {
    let SymExpr::Mul(factors) = base else {
        return None;
    };

    let powers = factors.iter()
        .map(|factor| SymExpr::Exp(Box::new(factor.clone()), Box::new(exp.clone())))
        .collect();
    Some(SymExpr::Mul(powers))
}
