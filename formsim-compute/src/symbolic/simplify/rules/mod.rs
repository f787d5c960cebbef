//! The rewrite rules of the simplifier.
//!
//! A rule looks at the operands of one kind of expression (the terms of a sum, the factors of a
//! product, or the base and exponent of a power) and returns `Some(expr)` with the rewritten
//! expression, or `None` if it does not apply. Rules never look below their direct operands; the
//! driver in [`super`] takes care of applying them to every subexpression.
//!
//! [`RULES`] lists every rule with the [`Step`] it is reported as, in the order they are tried.

pub mod add;
pub mod distribute;
pub mod multiply;
pub mod power;

use crate::symbolic::step_collector::StepCollector;
use super::{step::Step, SymExpr};

/// A rewrite rule, tagged with the kind of expression it applies to.
#[derive(Clone, Copy)]
pub enum Rule {
    /// Rewrites the terms of a [`SymExpr::Add`].
    Sum(fn(&[SymExpr]) -> Option<SymExpr>),

    /// Rewrites the factors of a [`SymExpr::Mul`].
    Product(fn(&[SymExpr]) -> Option<SymExpr>),

    /// Rewrites the base and exponent of a [`SymExpr::Exp`].
    Power(fn(&SymExpr, &SymExpr) -> Option<SymExpr>),
}

impl Rule {
    /// Applies the rule, if the expression is of the kind the rule rewrites.
    pub fn apply(self, expr: &SymExpr) -> Option<SymExpr> {
        match (self, expr) {
            (Self::Sum(rule), SymExpr::Add(terms)) => rule(terms),
            (Self::Product(rule), SymExpr::Mul(factors)) => rule(factors),
            (Self::Power(rule), SymExpr::Exp(base, exp)) => rule(base, exp),
            _ => None,
        }
    }
}

/// Every rule, in the order they are tried.
///
/// Sum, product and power rules all make the expression smaller (or evaluate part of it), so they
/// come first. Distribution can make the expression larger, and only runs when nothing else
/// applies.
pub const RULES: &[(Step, Rule)] = &[
    (Step::AddZero, Rule::Sum(add::add_zero)),
    (Step::FlattenSum, Rule::Sum(add::flatten_sum)),
    (Step::CombineLikeTerms, Rule::Sum(add::combine_like_terms)),
    (Step::MultiplyZero, Rule::Product(multiply::multiply_zero)),
    (Step::MultiplyOne, Rule::Product(multiply::multiply_one)),
    (Step::FlattenProduct, Rule::Product(multiply::flatten_product)),
    (Step::ReduceFraction, Rule::Product(multiply::reduce_numerical_fraction)),
    (Step::CombineLikeFactors, Rule::Product(multiply::combine_like_factors)),
    (Step::PowerZero, Rule::Power(power::power_zero)),
    (Step::PowerZeroLeft, Rule::Power(power::power_zero_left)),
    (Step::PowerOneLeft, Rule::Power(power::power_one_left)),
    (Step::PowerOne, Rule::Power(power::power_one)),
    (Step::PowerPower, Rule::Power(power::power_power)),
    (Step::NumericPower, Rule::Power(power::numeric_power)),
    (Step::ExpandPower, Rule::Power(power::expand_power)),
    (Step::DistributiveProperty, Rule::Product(distribute::distributive_property)),
    (Step::DistributePower, Rule::Power(distribute::distribute_power)),
];

/// Applies the first rule in [`RULES`] that rewrites the expression, and reports its step to the
/// collector.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    RULES.iter().find_map(|&(step, rule)| {
        let rewritten = rule.apply(expr)?;
        step_collector.push(step);
        Some(rewritten)
    })
}

#[cfg(test)]
mod tests {
    use crate::{primitive::int, symbolic::expr::Primary};
    use pretty_assertions::assert_eq;
    use super::*;

    fn sym(name: &str) -> SymExpr {
        SymExpr::Primary(Primary::Symbol(name.to_string()))
    }

    fn integer(n: i32) -> SymExpr {
        SymExpr::Primary(Primary::Integer(int(n)))
    }

    #[test]
    fn rules_only_apply_to_their_kind() {
        let sum = SymExpr::Add(vec![sym("x"), integer(0)]);
        let product = SymExpr::Mul(vec![sym("x"), integer(0)]);
        assert_eq!(Rule::Sum(add::add_zero).apply(&sum), Some(sym("x")));
        assert_eq!(Rule::Sum(add::add_zero).apply(&product), None);
        assert_eq!(Rule::Product(multiply::multiply_zero).apply(&product), Some(integer(0)));
    }

    #[test]
    fn first_rule_wins() {
        // `0*x^1` could lose the exponent or the whole product; the product rule comes first
        let expr = SymExpr::Mul(vec![
            integer(0),
            SymExpr::Exp(Box::new(sym("x")), Box::new(integer(1))),
        ]);
        let mut steps = Vec::new();
        assert_eq!(all(&expr, &mut steps), Some(integer(0)));
        assert_eq!(steps, vec![Step::MultiplyZero]);
    }

    #[test]
    fn no_rule_applies() {
        let mut steps = Vec::new();
        assert_eq!(all(&sym("x"), &mut steps), None);
        assert!(steps.is_empty());
    }
}
