//! Simplification of algebraic expressions.
//!
//! The simplifier works in passes. Each pass applies the first rule that matches an expression,
//! then recurses into the expression's children and does the same. Passes repeat until nothing
//! changes, or until the step budget in [`SimplifyOptions`] runs out.

pub(crate) mod fraction;
pub mod rules;
pub mod step;

use crate::symbolic::{expr::Primary, step_collector::StepCollector, SymExpr};
use std::cmp::Ordering;
use step::Step;
use thiserror::Error;

/// Why an expression could not be simplified.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SimplifyError {
    /// The expression divides by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The expression uses an operator that the simplifier has no rules for.
    #[error("the simplifier does not support the `{operator}` operator")]
    Unsupported {
        /// The operator, as written.
        operator: String,
    },

    /// The rules kept applying for longer than the step limit allows.
    #[error("simplification did not finish within {limit} steps")]
    StepLimitExceeded {
        /// The limit that was exceeded.
        limit: usize,
    },

    /// The expression is nested too deeply to simplify.
    #[error("the expression is nested deeper than {limit} levels")]
    TooDeep {
        /// The limit that was exceeded.
        limit: usize,
    },
}

/// Limits on the work done by the simplifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimplifyOptions {
    /// The maximum number of rule applications and node visits before giving up with
    /// [`SimplifyError::StepLimitExceeded`].
    pub max_steps: usize,

    /// The maximum nesting depth of an expression tree that callers should hand to the
    /// simplifier. The simplifier recurses into the expression, so deeper trees are rejected with
    /// [`SimplifyError::TooDeep`] by [`SimplifyOptions::check_depth`].
    pub max_depth: usize,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            max_steps: 100_000,
            max_depth: 512,
        }
    }
}

impl SimplifyOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the step limit.
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Sets the depth limit.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns [`SimplifyError::TooDeep`] if `depth` is over the depth limit.
    pub fn check_depth(&self, depth: usize) -> Result<(), SimplifyError> {
        if depth > self.max_depth {
            Err(SimplifyError::TooDeep { limit: self.max_depth })
        } else {
            Ok(())
        }
    }
}

/// Counts the work done during simplification, forwarding steps to the caller's collector.
struct Budget<'a> {
    inner: &'a mut dyn StepCollector<Step>,
    limit: usize,
    used: usize,
}

impl Budget<'_> {
    /// Charges one unit of work.
    fn charge(&mut self) -> Result<(), SimplifyError> {
        self.used += 1;
        if self.used > self.limit {
            Err(SimplifyError::StepLimitExceeded { limit: self.limit })
        } else {
            Ok(())
        }
    }
}

impl StepCollector<Step> for Budget<'_> {
    fn push(&mut self, step: Step) {
        tracing::trace!(target: "simplify", %step, "applied rule");
        self.used += 1;
        self.inner.push(step);
    }
}

/// Returns [`SimplifyError::DivisionByZero`] if the expression is zero raised to a negative power.
fn check_division(expr: &SymExpr) -> Result<(), SimplifyError> {
    if let SymExpr::Exp(base, exp) = expr {
        if base.is_zero() && exp.numeric_sign() == Some(Ordering::Less) {
            return Err(SimplifyError::DivisionByZero);
        }
    }
    Ok(())
}

/// Returns mutable references to the direct children of the expression.
fn children_mut(expr: &mut SymExpr) -> Vec<&mut SymExpr> {
    match expr {
        SymExpr::Primary(Primary::Call(_, args)) => args.iter_mut().collect(),
        SymExpr::Primary(_) => Vec::new(),
        SymExpr::Add(children) | SymExpr::Mul(children) => children.iter_mut().collect(),
        SymExpr::Exp(lhs, rhs) => vec![&mut **lhs, &mut **rhs],
    }
}

/// Simplifies the expression and its children until no rule applies. Returns `Ok(None)` if
/// nothing changed.
fn inner_simplify(expr: &SymExpr, budget: &mut Budget) -> Result<Option<SymExpr>, SimplifyError> {
    let mut changed = false;
    let mut expr = expr.clone();

    loop {
        budget.charge()?;
        check_division(&expr)?;

        let mut changed_this_pass = false;
        if let Some(new_expr) = rules::all(&expr, budget) {
            expr = new_expr;
            changed_this_pass = true;
        }
        if budget.used > budget.limit {
            return Err(SimplifyError::StepLimitExceeded { limit: budget.limit });
        }

        for child in children_mut(&mut expr) {
            if let Some(new_child) = inner_simplify(child, budget)? {
                *child = new_child;
                changed_this_pass = true;
            }
        }

        if !changed_this_pass {
            break;
        }
        changed = true;
    }

    Ok(changed.then_some(expr))
}

/// Simplifies the expression, returning the steps taken to the given collector.
fn simplify_into(
    expr: &SymExpr,
    options: &SimplifyOptions,
    step_collector: &mut dyn StepCollector<Step>,
) -> Result<SymExpr, SimplifyError> {
    tracing::debug!(target: "simplify", %expr, max_steps = options.max_steps, "simplifying");

    if let Some(bad) = expr.post_order_iter().find(|e| check_division(e).is_err()) {
        tracing::debug!(target: "simplify", %bad, "division by zero");
        return Err(SimplifyError::DivisionByZero);
    }

    let mut budget = Budget {
        inner: step_collector,
        limit: options.max_steps,
        used: 0,
    };
    let result = inner_simplify(expr, &mut budget)
        .map(|simplified| simplified.unwrap_or_else(|| expr.clone()));

    match &result {
        Ok(simplified) => tracing::debug!(target: "simplify", %simplified, work = budget.used, "done"),
        Err(err) => tracing::debug!(target: "simplify", %err, work = budget.used, "failed"),
    }
    result
}

/// Simplifies the expression with the default [`SimplifyOptions`].
pub fn simplify(expr: &SymExpr) -> Result<SymExpr, SimplifyError> {
    simplify_into(expr, &SimplifyOptions::default(), &mut ())
}

/// Simplifies the expression with the given options.
pub fn simplify_with(expr: &SymExpr, options: &SimplifyOptions) -> Result<SymExpr, SimplifyError> {
    simplify_into(expr, options, &mut ())
}

/// Simplifies the expression with the given options, also returning the rewrites that were
/// applied, in order.
pub fn simplify_with_steps(
    expr: &SymExpr,
    options: &SimplifyOptions,
) -> Result<(SymExpr, Vec<Step>), SimplifyError> {
    let mut steps = Vec::new();
    let simplified = simplify_into(expr, options, &mut steps)?;
    Ok((simplified, steps))
}

#[cfg(test)]
mod tests {
    use crate::primitive::int;
    use crate::tree::Node;
    use formsim_parser::parser::{ast::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    /// Parses the given expression, and returns its [`SymExpr`] representation.
    fn parse_expr(input: &str) -> SymExpr {
        let ast = Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        let tree = Node::try_from(&ast).unwrap();
        SymExpr::try_from(&tree).unwrap()
    }

    fn simplified(input: &str) -> SymExpr {
        simplify(&parse_expr(input)).unwrap()
    }

    fn integer(n: i32) -> SymExpr {
        SymExpr::Primary(Primary::Integer(int(n)))
    }

    fn sym(name: &str) -> SymExpr {
        SymExpr::Primary(Primary::Symbol(name.to_string()))
    }

    fn pow(base: SymExpr, exp: i32) -> SymExpr {
        SymExpr::Exp(Box::new(base), Box::new(integer(exp)))
    }

    #[test]
    fn add_rules() {
        assert_eq!(simplified("0+0*(3x+5b^2)+0+(3a)"), SymExpr::Mul(vec![integer(3), sym("a")]));
    }

    #[test]
    fn like_terms() {
        assert_eq!(simplified("x + x + x"), SymExpr::Mul(vec![integer(3), sym("x")]));
        assert_eq!(simplified("2x + 3x - x"), SymExpr::Mul(vec![integer(4), sym("x")]));
    }

    #[test]
    fn multiply_rules() {
        assert_eq!(simplified("0*x*y*z"), integer(0));
        assert_eq!(simplified("1*3*1"), integer(3));
    }

    #[test]
    fn combine_like_factors() {
        let expr = simplified("a^2 b^2 a^4 b^3 c^2 d^4");
        assert_eq!(expr, SymExpr::Mul(vec![
            pow(sym("d"), 4),
            pow(sym("b"), 5),
            pow(sym("a"), 6),
            pow(sym("c"), 2),
        ]));
    }

    #[test]
    fn fractions() {
        assert_eq!(simplified("6/4 + 1/2"), integer(2));
        assert_eq!(simplified("x/2 + x/2"), sym("x"));
    }

    #[test]
    fn power_rules() {
        assert_eq!(simplified("x^0"), integer(1));
        assert_eq!(simplified("(0^1)^0"), integer(1));
        assert_eq!(simplified("1^x"), integer(1));
        assert_eq!(simplified("2^10"), integer(1024));
        assert_eq!(simplified("(x^2)^3"), pow(sym("x"), 6));
    }

    #[test]
    fn expand_square() {
        assert_eq!(simplified("(x+1)^2 - (x^2+2x+1)"), integer(0));
    }

    #[test]
    fn distribute() {
        assert_eq!(simplified("2(x + y) - 2x - 2y"), integer(0));
    }

    #[test]
    fn floats_cancel() {
        assert!(simplified("2.5x - 2.5x").is_zero());
    }

    #[test]
    fn steps_are_recorded() {
        let (expr, steps) = simplify_with_steps(&parse_expr("x^1 + 0"), &SimplifyOptions::default()).unwrap();
        assert_eq!(expr, sym("x"));
        assert_eq!(steps, vec![Step::AddZero, Step::PowerOne]);
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(simplify(&parse_expr("x/0")), Err(SimplifyError::DivisionByZero));
        assert_eq!(simplify(&parse_expr("1/(x - x)")), Err(SimplifyError::DivisionByZero));
    }

    #[test]
    fn step_limit() {
        let options = SimplifyOptions::new().max_steps(1);
        assert_eq!(
            simplify_with(&parse_expr("x + x + x"), &options),
            Err(SimplifyError::StepLimitExceeded { limit: 1 }),
        );
    }

    #[test]
    fn depth_limit() {
        let options = SimplifyOptions::new().max_depth(3);
        assert_eq!(options.check_depth(3), Ok(()));
        assert_eq!(options.check_depth(4), Err(SimplifyError::TooDeep { limit: 3 }));
    }

    #[test]
    fn calls_are_simplified_inside() {
        assert_eq!(
            simplified("f(x + x)"),
            SymExpr::Primary(Primary::Call("f".to_string(), vec![
                SymExpr::Mul(vec![integer(2), sym("x")]),
            ])),
        );
    }
}
