//! A representation of mathematical expressions that is easier to manipulate than a [`Node`].
//!
//! The [`Node`] tree keeps every operand exactly where it was written. That is what comparing
//! formulas needs, but it gets in the way of algebra. [`SymExpr`] flattens nested sums and
//! products into lists of terms and factors, and folds numbers together as they meet.
//!
//! # Strict equality
//!
//! Deciding whether two expressions are mathematically equal is as hard as simplifying them:
//! `x^2 + 2x + 1` and `(x + 1)^2` are equal, but this is not obvious without expanding one of
//! them. Simplification, in turn, needs to know when two terms are "the same" so it can combine
//! them.
//!
//! To break the cycle, [`SymExpr`] implements a subset of mathematical equality, called **strict
//! equality**. Two expressions are strictly equal if:
//!
//! - They are the same type of expression (i.e. both [`SymExpr::Primary`], both
//!   [`SymExpr::Add`], etc.).
//! - If both are [`SymExpr::Primary`], both expressions must have strictly equal values.
//! - If both are [`SymExpr::Add`] or [`SymExpr::Mul`], both expressions must have strictly equal
//!   terms / factors, in any order.
//! - If both are [`SymExpr::Exp`], both expressions must have strictly equal base and exponent.
//!
//! Strict equality can **never** report false positives, and it does not depend on
//! simplification, so the simplifier can use it to find like terms and factors.
//!
//! The [`PartialEq`] and [`Eq`] implementations for [`SymExpr`] implement **strict equality**.

mod iter;

use crate::{
    primitive::{float, int, rational},
    symbolic::simplify::{fraction::make_fraction, SimplifyError},
    tree::{Leaf, Node, Number, Tag},
};
use formsim_parser::parser::Precedence;
use iter::ExprIter;
use rug::{Float, Integer};
use std::{cmp::Ordering, fmt, ops::{Add, AddAssign, Mul, MulAssign, Neg}};

/// A single term / factor, such as a number, variable, or function call.
#[derive(Debug, Clone, PartialEq)]
pub enum Primary {
    /// An integer, such as `2` or `144`.
    Integer(Integer),

    /// A floating-point number, such as `3.14` or `0.5`.
    Float(Float),

    /// A variable, such as `x` or `y`.
    Symbol(String),

    /// A function call, such as `sin(x)` or `f(x, y)`.
    Call(String, Vec<SymExpr>),
}

/// The simplifier never produces `NaN`, so floats compare reflexively.
impl Eq for Primary {}

impl fmt::Display for Primary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(num) => write!(f, "{}", num),
            Self::Float(num) => write!(f, "{}", num.to_f64()),
            Self::Symbol(sym) => write!(f, "{}", sym),
            Self::Call(name, args) => {
                write!(f, "{}(", name)?;
                let mut iter = args.iter();
                if let Some(arg) = iter.next() {
                    write!(f, "{}", arg)?;
                    for arg in iter {
                        write!(f, ", {}", arg)?;
                    }
                }
                write!(f, ")")
            },
        }
    }
}

/// Adds two [`Primary`]s together. If both are numbers, they are added together, producing a
/// [`Primary::Float`] if either one is a float. Otherwise, the two [`Primary`]s are wrapped in a
/// [`SymExpr::Add`].
impl Add<Primary> for Primary {
    type Output = SymExpr;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Primary::Integer(lhs), Primary::Integer(rhs)) => {
                SymExpr::Primary(Primary::Integer(lhs + rhs))
            },
            (Primary::Float(lhs), Primary::Float(rhs)) => {
                SymExpr::Primary(Primary::Float(lhs + rhs))
            },
            (Primary::Integer(i), Primary::Float(f)) | (Primary::Float(f), Primary::Integer(i)) => {
                SymExpr::Primary(Primary::Float(f + i))
            },
            (lhs, rhs) => SymExpr::Add(vec![
                SymExpr::Primary(lhs),
                SymExpr::Primary(rhs),
            ]),
        }
    }
}

/// Multiplies two [`Primary`]s together. If both are numbers, they are multiplied together,
/// producing a [`Primary::Float`] if either one is a float. Otherwise, the two [`Primary`]s are
/// wrapped in a [`SymExpr::Mul`].
impl Mul<Primary> for Primary {
    type Output = SymExpr;

    fn mul(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Primary::Integer(lhs), Primary::Integer(rhs)) => {
                SymExpr::Primary(Primary::Integer(lhs * rhs))
            },
            (Primary::Float(lhs), Primary::Float(rhs)) => {
                SymExpr::Primary(Primary::Float(lhs * rhs))
            },
            (Primary::Integer(i), Primary::Float(f)) | (Primary::Float(f), Primary::Integer(i)) => {
                SymExpr::Primary(Primary::Float(f * i))
            },
            (lhs, rhs) => SymExpr::Mul(vec![
                SymExpr::Primary(lhs),
                SymExpr::Primary(rhs),
            ]),
        }
    }
}

/// A mathematical expression with information about its terms and factors.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone, Eq)]
pub enum SymExpr {
    /// A single term or factor.
    Primary(Primary),

    /// Multiple terms added together.
    Add(Vec<SymExpr>),

    /// Multiple factors multiplied together.
    Mul(Vec<SymExpr>),

    /// An expression raised to a power.
    Exp(Box<SymExpr>, Box<SymExpr>),
}

impl SymExpr {
    /// Returns the precedence of the expression when it is written in infix form, or [`None`] if
    /// it never needs parentheses.
    fn precedence(&self) -> Option<Precedence> {
        match self {
            Self::Primary(_) if self.numeric_sign() == Some(Ordering::Less) => Some(Precedence::Neg),
            Self::Primary(_) => None,
            Self::Add(_) => Some(Precedence::Term),
            Self::Mul(_) => Some(Precedence::Factor),
            Self::Exp(_, _) => Some(Precedence::Exp),
        }
    }

    /// Returns true if this expression must be parenthesized when written as an operand of
    /// `parent`. If `inclusive` is true, operands of equal precedence are parenthesized too.
    fn needs_parens(&self, parent: &Self, inclusive: bool) -> bool {
        match (self.precedence(), parent.precedence()) {
            (Some(child), Some(parent)) => child < parent || (inclusive && child == parent),
            _ => false,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, parent: &Self, inclusive: bool) -> fmt::Result {
        if self.needs_parens(parent, inclusive) {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }

    /// If the expression is a [`Primary::Integer`], returns a reference to the contained integer.
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Self::Primary(Primary::Integer(int)) => Some(int),
            _ => None,
        }
    }

    /// If the expression is a [`Primary::Integer`], returns the contained integer.
    pub fn into_integer(self) -> Option<Integer> {
        match self {
            Self::Primary(Primary::Integer(int)) => Some(int),
            _ => None,
        }
    }

    /// Returns true if the expression is a [`Primary::Integer`].
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Primary(Primary::Integer(_)))
    }

    /// Returns true if the expression is a [`Primary::Float`].
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Primary(Primary::Float(_)))
    }

    /// Returns true if the expression is a [`Primary::Integer`] or a [`Primary::Float`].
    pub fn is_number(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Returns true if the expression is the number zero, either as an integer or as a float.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Primary(Primary::Integer(n)) => n.is_zero(),
            Self::Primary(Primary::Float(n)) => n.is_zero(),
            _ => false,
        }
    }

    /// Returns true if the expression is a [`Primary::Integer`] raised to the power of -1.
    pub fn is_integer_recip(&self) -> bool {
        self.as_integer_recip().is_some()
    }

    /// If the expression is a [`Primary::Integer`] raised to the power of -1, returns a reference
    /// to the contained integer (the denominator of the fraction).
    pub fn as_integer_recip(&self) -> Option<&Integer> {
        if let Self::Exp(base, exp) = self {
            if exp.as_integer()? == &-1 {
                return base.as_integer();
            }
        }

        None
    }

    /// If the expression is a [`Primary::Integer`] raised to the power of -1, returns the
    /// contained integer (the denominator of the fraction).
    pub fn into_integer_recip(self) -> Option<Integer> {
        if let Self::Exp(base, exp) = self {
            if exp.as_integer()? == &-1 {
                return base.into_integer();
            }
        }

        None
    }

    /// If the expression is a [`Primary::Symbol`], returns a reference to the contained symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Primary(Primary::Symbol(sym)) => Some(sym),
            _ => None,
        }
    }

    /// If the expression is made only of numbers (an integer, a float, a fraction, or a product
    /// of those), returns whether it is negative, zero, or positive.
    pub fn numeric_sign(&self) -> Option<Ordering> {
        match self {
            Self::Primary(Primary::Integer(n)) => Some(n.cmp0()),
            Self::Primary(Primary::Float(n)) => n.cmp0(),
            Self::Exp(..) => self.as_integer_recip().map(|n| n.cmp0()),
            Self::Mul(factors) => factors.iter().try_fold(Ordering::Greater, |sign, factor| {
                Some(match (sign, factor.numeric_sign()?) {
                    (Ordering::Equal, _) | (_, Ordering::Equal) => Ordering::Equal,
                    (a, b) if a == b => Ordering::Greater,
                    _ => Ordering::Less,
                })
            }),
            _ => None,
        }
    }

    /// If the expression is made only of numbers, returns its approximate value as a float.
    pub fn numeric_value(&self) -> Option<Float> {
        match self {
            Self::Primary(Primary::Integer(n)) => Some(float(n)),
            Self::Primary(Primary::Float(n)) => Some(n.clone()),
            Self::Exp(..) => {
                let denominator = self.as_integer_recip()?;
                if denominator.is_zero() {
                    None
                } else {
                    Some(float(1) / float(denominator))
                }
            },
            Self::Mul(factors) => factors.iter()
                .try_fold(float(1), |product, factor| Some(product * factor.numeric_value()?)),
            _ => None,
        }
    }

    /// Trivially downgrades the expression into a simpler form.
    ///
    /// Some operations may result in a [`SymExpr::Add`] with zero / one term, or a
    /// [`SymExpr::Mul`] with zero / one factor. This function checks for these cases and
    /// simplifies the expression into the single term / factor, or a [`SymExpr::Primary`]
    /// containing the integer 0 or 1.
    pub(crate) fn downgrade(self) -> Self {
        match self {
            Self::Add(mut terms) => {
                if terms.is_empty() {
                    Self::Primary(Primary::Integer(int(0)))
                } else if terms.len() == 1 {
                    terms.remove(0)
                } else {
                    Self::Add(terms)
                }
            },
            Self::Mul(mut factors) => {
                if factors.is_empty() {
                    Self::Primary(Primary::Integer(int(1)))
                } else if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Self::Mul(factors)
                }
            },
            _ => self,
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }
}

impl fmt::Display for SymExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary(primary) => write!(f, "{}", primary),
            Self::Add(terms) => {
                let mut iter = terms.iter();
                if let Some(term) = iter.next() {
                    term.fmt_operand(f, self, false)?;
                    for term in iter {
                        write!(f, " + ")?;
                        term.fmt_operand(f, self, false)?;
                    }
                }
                Ok(())
            },
            Self::Mul(factors) => {
                // `a * b^-1` is written as `a / b`
                let (denominators, numerators): (Vec<_>, Vec<_>) = factors.iter()
                    .partition(|factor| matches!(
                        factor,
                        Self::Exp(_, exp) if exp.as_integer().map_or(false, |n| n == &-1)
                    ));

                let mut iter = numerators.iter();
                match iter.next() {
                    Some(factor) => factor.fmt_operand(f, self, false)?,
                    None => write!(f, "1")?,
                }
                for factor in iter {
                    write!(f, " * ")?;
                    factor.fmt_operand(f, self, false)?;
                }
                for factor in denominators {
                    if let Self::Exp(base, _) = factor {
                        write!(f, " / ")?;
                        base.fmt_operand(f, self, true)?;
                    }
                }
                Ok(())
            },
            Self::Exp(base, exp) => {
                base.fmt_operand(f, self, true)?;
                write!(f, "^")?;
                exp.fmt_operand(f, self, false)
            },
        }
    }
}

/// Returns true if `rhs` is a reordering of `lhs`, with every operand appearing the same number
/// of times on both sides.
fn same_multiset(lhs: &[SymExpr], rhs: &[SymExpr]) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }

    let mut used = vec![false; rhs.len()];
    lhs.iter().all(|l| {
        let found = rhs.iter()
            .enumerate()
            .position(|(i, r)| !used[i] && l == r);
        match found {
            Some(i) => {
                used[i] = true;
                true
            },
            None => false,
        }
    })
}

/// Checks if two expressions are **strictly** equal.
///
/// For more information about strict equality, see the [module-level documentation](self).
impl PartialEq for SymExpr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs == rhs,
            (Self::Add(lhs), Self::Add(rhs)) | (Self::Mul(lhs), Self::Mul(rhs)) => {
                same_multiset(lhs, rhs)
            },
            (Self::Exp(lhs_base, lhs_exp), Self::Exp(rhs_base, rhs_exp)) => {
                lhs_base == rhs_base && lhs_exp == rhs_exp
            },
            _ => false,
        }
    }
}

/// Converts an expression tree into a [`SymExpr`], flattening nested sums and products.
///
/// Fails with [`SimplifyError::Unsupported`] for factorials, remainders, and malformed powers.
impl TryFrom<&Node> for SymExpr {
    type Error = SimplifyError;

    fn try_from(node: &Node) -> Result<Self, Self::Error> {
        let op = match node {
            Node::Leaf(Leaf::Symbol(name)) => return Ok(Self::Primary(Primary::Symbol(name.clone()))),
            Node::Leaf(Leaf::Constant(n)) => return Ok(match n {
                Number::Integer(n) => Self::Primary(Primary::Integer(n.clone())),
                Number::Rational(n) => make_fraction(
                    Self::Primary(Primary::Integer(n.numer().clone())),
                    Self::Primary(Primary::Integer(n.denom().clone())),
                ),
                Number::Float(n) => Self::Primary(Primary::Float(n.clone())),
            }),
            Node::Operator(op) => op,
        };

        let children = op.children.iter()
            .map(Self::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        match &op.tag {
            Tag::Add => Ok(children.into_iter()
                .fold(Self::Add(Vec::new()), |sum, term| sum + term)
                .downgrade()),
            Tag::Mul => Ok(children.into_iter()
                .fold(Self::Mul(Vec::new()), |product, factor| product * factor)
                .downgrade()),
            Tag::Pow => {
                let mut children = children.into_iter();
                match (children.next(), children.next(), children.next()) {
                    (Some(base), Some(exp), None) => Ok(Self::Exp(Box::new(base), Box::new(exp))),
                    _ => Err(SimplifyError::Unsupported {
                        operator: format!("^ with {} operands", op.children.len()),
                    }),
                }
            },
            Tag::Call(name) => Ok(Self::Primary(Primary::Call(name.clone(), children))),
            tag @ (Tag::Factorial | Tag::Mod) => Err(SimplifyError::Unsupported {
                operator: tag.to_string(),
            }),
        }
    }
}

/// Converts a [`SymExpr`] back into an expression tree. Integer fractions become
/// [`Number::Rational`] constants.
impl From<&SymExpr> for Node {
    fn from(expr: &SymExpr) -> Self {
        let as_rational = |numerator: &Integer, denominator: &Integer| {
            rational(numerator.clone(), denominator.clone())
                .map(|r| Node::constant(Number::from_rational(r)))
        };

        match expr {
            SymExpr::Primary(Primary::Integer(n)) => Node::constant(Number::Integer(n.clone())),
            SymExpr::Primary(Primary::Float(n)) => Node::constant(Number::Float(n.clone())),
            SymExpr::Primary(Primary::Symbol(sym)) => Node::symbol(sym.clone()),
            SymExpr::Primary(Primary::Call(name, args)) => {
                Node::operator(Tag::Call(name.clone()), args.iter().map(Node::from).collect())
            },
            SymExpr::Add(terms) => Node::operator(Tag::Add, terms.iter().map(Node::from).collect()),
            SymExpr::Mul(factors) => {
                if let [a, b] = factors.as_slice() {
                    let fraction = match (a.as_integer(), b.as_integer(), a.as_integer_recip(), b.as_integer_recip()) {
                        (Some(n), _, _, Some(d)) | (_, Some(n), Some(d), _) => as_rational(n, d),
                        _ => None,
                    };
                    if let Some(fraction) = fraction {
                        return fraction;
                    }
                }
                Node::operator(Tag::Mul, factors.iter().map(Node::from).collect())
            },
            SymExpr::Exp(base, exp) => {
                if let Some(fraction) = expr.as_integer_recip().and_then(|d| as_rational(&int(1), d)) {
                    return fraction;
                }
                Node::operator(Tag::Pow, vec![Node::from(&**base), Node::from(&**exp)])
            },
        }
    }
}

/// Adds two [`SymExpr`]s together. No simplification is done, except for the case where the
/// operands are a mix of [`Primary`] and / or [`SymExpr::Add`], in which case both are combined in
/// one list of terms (flattening).
impl Add for SymExpr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs + rhs,
            (Self::Add(mut terms), Self::Add(rhs_terms)) => {
                terms.extend(rhs_terms);
                Self::Add(terms)
            },
            (Self::Add(mut terms), other) | (other, Self::Add(mut terms)) => {
                terms.push(other);
                Self::Add(terms)
            },
            (lhs, rhs) => Self::Add(vec![lhs, rhs]),
        }
    }
}

impl AddAssign for SymExpr {
    fn add_assign(&mut self, rhs: Self) {
        let lhs = std::mem::replace(self, Self::Add(Vec::new()));
        *self = lhs + rhs;
    }
}

/// Multiplies two [`SymExpr`]s together. No simplification is done, except for the case where the
/// operands are a mix of [`Primary`] and / or [`SymExpr::Mul`], in which case both are combined in
/// one list of factors (flattening).
impl Mul for SymExpr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs * rhs,
            (Self::Mul(mut factors), Self::Mul(other)) => {
                factors.extend(other);
                Self::Mul(factors)
            },
            (Self::Mul(mut factors), other) | (other, Self::Mul(mut factors)) => {
                factors.push(other);
                Self::Mul(factors)
            },
            (lhs, rhs) => Self::Mul(vec![lhs, rhs]),
        }
    }
}

impl MulAssign for SymExpr {
    fn mul_assign(&mut self, rhs: Self) {
        let lhs = std::mem::replace(self, Self::Mul(Vec::new()));
        *self = lhs * rhs;
    }
}

/// Multiplies this expression by -1. No simplification is done, except for the case where the
/// expression is a numeric [`Primary`], in which case the number is negated.
impl Neg for SymExpr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Self::Primary(Primary::Integer(int)) => Self::Primary(Primary::Integer(-int)),
            Self::Primary(Primary::Float(float)) => Self::Primary(Primary::Float(-float)),
            expr => Self::Primary(Primary::Integer(int(-1))) * expr,
        }
    }
}

/// NOTE: strict equality ignores the order of terms and factors, but `pretty_assertions` does
/// not. If one of these tests fails, the diff will look worse than the actual difference.
#[cfg(test)]
mod tests {
    use crate::tree::Node;
    use formsim_parser::parser::{ast::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    fn tree(input: &str) -> Node {
        let ast = Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        Node::try_from(&ast).unwrap()
    }

    /// Parse the given expression and return the [`SymExpr`] representation.
    fn parse_expr(input: &str) -> SymExpr {
        SymExpr::try_from(&tree(input)).unwrap()
    }

    fn sym(name: &str) -> SymExpr {
        SymExpr::Primary(Primary::Symbol(name.to_string()))
    }

    fn integer(n: i32) -> SymExpr {
        SymExpr::Primary(Primary::Integer(int(n)))
    }

    #[test]
    fn strict_equality() {
        let a = parse_expr("2(x + (y - 5))");
        let b = parse_expr("(y - 5 + x) * 2");
        assert_eq!(a, b);
    }

    #[test]
    fn strict_equality_2() {
        // these are NOT strictly equal (but are semantically equal)
        let a = parse_expr("2(x + (y - 5))");
        let b = parse_expr("2x + 2y - 10");
        assert_ne!(a, b);
    }

    #[test]
    fn strict_equality_counts_repeats() {
        let a = SymExpr::Mul(vec![sym("x"), sym("x"), sym("y")]);
        let b = SymExpr::Mul(vec![sym("x"), sym("y"), sym("y")]);
        assert_ne!(a, b);
        assert_ne!(parse_expr("x + x + y"), parse_expr("x + y + y"));
        assert_eq!(parse_expr("x y x"), parse_expr("x x y"));
    }

    #[test]
    fn simple_expr() {
        let expr = parse_expr("x^2 + 5x + 6");
        assert_eq!(expr, SymExpr::Add(vec![
            integer(6),
            SymExpr::Mul(vec![sym("x"), integer(5)]),
            SymExpr::Exp(Box::new(sym("x")), Box::new(integer(2))),
        ]));
    }

    #[test]
    fn factors_flatten() {
        let expr = parse_expr("2x^2 y / 5");
        assert_eq!(expr, SymExpr::Mul(vec![
            integer(2),
            SymExpr::Exp(Box::new(sym("x")), Box::new(integer(2))),
            sym("y"),
            SymExpr::Exp(Box::new(integer(5)), Box::new(integer(-1))),
        ]));
    }

    #[test]
    fn unsupported_operators() {
        let err = SymExpr::try_from(&tree("n!")).unwrap_err();
        assert_eq!(err, SimplifyError::Unsupported { operator: "!".to_string() });

        let err = SymExpr::try_from(&tree("7 % x")).unwrap_err();
        assert_eq!(err, SimplifyError::Unsupported { operator: "%".to_string() });
    }

    #[test]
    fn fractions_convert_back_to_rationals() {
        let expr = parse_expr("x + 1/2");
        assert_eq!(Node::from(&expr), tree("x + 1/2"));
    }

    #[test]
    fn numeric_sign() {
        assert_eq!(parse_expr("-3").numeric_sign(), Some(Ordering::Less));
        assert_eq!(parse_expr("-1/2").numeric_sign(), Some(Ordering::Less));
        assert_eq!(parse_expr("2 * 0.5").numeric_sign(), Some(Ordering::Greater));
        assert_eq!(parse_expr("2x").numeric_sign(), None);
    }

    #[test]
    fn fmt_expr() {
        assert_eq!(parse_expr("3(x + 1)").to_string(), "3 * (x + 1)");
        assert_eq!(parse_expr("x / 2").to_string(), "x / 2");
        assert_eq!(parse_expr("(x^2)^3").to_string(), "(x^2)^3");
        assert_eq!(parse_expr("f(x, y)").to_string(), "f(x, y)");
    }
}
