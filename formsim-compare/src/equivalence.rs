//! Algebraic equivalence of two expression trees.

use formsim_compute::{
    symbolic::{simplify_with, SimplifyError, SimplifyOptions, SymExpr},
    tree::Node,
};

/// Returns true if `lhs - rhs` simplifies to zero, using the default [`SimplifyOptions`].
///
/// A `false` result does not prove the trees are different: the simplifier only knows a fixed
/// set of rules.
pub fn equivalent(lhs: &Node, rhs: &Node) -> Result<bool, SimplifyError> {
    equivalent_with(lhs, rhs, &SimplifyOptions::default())
}

/// Returns true if `lhs - rhs` simplifies to zero, using the given options.
pub fn equivalent_with(lhs: &Node, rhs: &Node, options: &SimplifyOptions) -> Result<bool, SimplifyError> {
    options.check_depth(lhs.depth())?;
    options.check_depth(rhs.depth())?;

    let lhs = SymExpr::try_from(lhs)?;
    let rhs = SymExpr::try_from(rhs)?;
    let difference = simplify_with(&(lhs + -rhs), options)?;

    let equivalent = difference.is_zero();
    tracing::debug!(target: "equivalence", %difference, equivalent, "checked equivalence");
    Ok(equivalent)
}

#[cfg(test)]
mod tests {
    use crate::parse;
    use pretty_assertions::assert_eq;
    use super::*;

    fn check(a: &str, b: &str) -> Result<bool, SimplifyError> {
        equivalent(&parse(a).unwrap(), &parse(b).unwrap())
    }

    #[test]
    fn identical() {
        assert_eq!(check("x + y", "x + y"), Ok(true));
    }

    #[test]
    fn reordered() {
        assert_eq!(check("x + y", "y + x"), Ok(true));
        assert_eq!(check("2xy", "y * x * 2"), Ok(true));
    }

    #[test]
    fn expanded_square() {
        assert_eq!(check("(x+1)^2", "x^2+2x+1"), Ok(true));
    }

    #[test]
    fn different() {
        assert_eq!(check("x + y", "x * y"), Ok(false));
        assert_eq!(check("2x", "3x"), Ok(false));
    }

    #[test]
    fn repeated_factors_are_counted() {
        assert_eq!(check("x x y", "x y y"), Ok(false));
        assert_eq!(check("x x y", "x y x"), Ok(true));
        assert_eq!(check("x^2 y", "x x y"), Ok(true));
    }

    #[test]
    fn fractions() {
        assert_eq!(check("x/2 + x/2", "x"), Ok(true));
        assert_eq!(check(r"\frac{1}{2} + \frac{1}{3}", "5/6"), Ok(true));
    }

    #[test]
    fn errors() {
        assert_eq!(check("x/0", "x"), Err(SimplifyError::DivisionByZero));
        assert_eq!(check("n!", "n"), Err(SimplifyError::Unsupported { operator: "!".to_string() }));
    }
}
