//! Conversion from the syntax tree produced by [`formsim_parser`] into a [`Node`].

use crate::primitive::{float_from_str, int, int_from_str, rational};
use formsim_attrs::ErrorKind;
use formsim_error::Error;
use formsim_parser::parser::{
    ast::{Call, Expr as AstExpr, Literal, Root, Unary},
    token::op::{BinOpKind, UnaryOpKind},
};
use rug::Integer;
use super::{Leaf, Node, Number, Tag};

/// A numeric literal could not be converted to a number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a valid number", literal),
    labels = ["this number"],
)]
pub struct InvalidNumber {
    /// The literal as written.
    pub literal: String,
}

/// Returns the expression inside any number of grouping delimiters.
fn ungroup(expr: &AstExpr) -> &AstExpr {
    match expr {
        AstExpr::Paren(paren) => paren.innermost(),
        expr => expr,
    }
}

/// `-a`, folding the sign into constants.
fn negate(node: Node) -> Node {
    match node {
        Node::Leaf(Leaf::Constant(n)) => Node::constant(-n),
        node => Node::operator(Tag::Mul, vec![Node::integer(-1), node]),
    }
}

/// `a^-1`
fn reciprocal(node: Node) -> Node {
    Node::operator(Tag::Pow, vec![node, Node::integer(-1)])
}

/// `a^(1/n)`, with an exact exponent if `n` is a non-zero integer.
fn root(radicand: Node, index: Node) -> Node {
    let exponent = match index.as_number() {
        Some(Number::Integer(n)) if !n.is_zero() => rational(int(1), n.clone())
            .map(|r| Node::constant(Number::from_rational(r))),
        _ => None,
    };
    Node::operator(Tag::Pow, vec![radicand, exponent.unwrap_or_else(|| reciprocal(index))])
}

/// If the expression is an integer literal, possibly negated, returns its value.
fn integer_literal(expr: &AstExpr) -> Result<Option<Integer>, Error> {
    match ungroup(expr) {
        AstExpr::Literal(Literal::Int(lit)) => int_from_str(&lit.value)
            .map(Some)
            .ok_or_else(|| Error::new(vec![lit.span.clone()], InvalidNumber {
                literal: lit.value.clone(),
            })),
        AstExpr::Unary(unary) if unary.op.kind == UnaryOpKind::Neg => {
            Ok(integer_literal(&unary.operand)?.map(|n| -n))
        },
        _ => Ok(None),
    }
}

/// If both sides of a division are integer literals and the divisor is not zero, returns the
/// exact quotient as a constant.
fn integer_ratio(numerator: &AstExpr, denominator: &AstExpr) -> Result<Option<Node>, Error> {
    let (Some(n), Some(d)) = (integer_literal(numerator)?, integer_literal(denominator)?) else {
        return Ok(None);
    };
    Ok(rational(n, d).map(|r| Node::constant(Number::from_rational(r))))
}

/// Lowers a chain of `+` and `-` into a single [`Tag::Add`] node, keeping the terms in source
/// order.
fn lower_sum(expr: &AstExpr) -> Result<Node, Error> {
    let mut terms = Vec::new();
    let mut stack = vec![(expr, false)];
    while let Some((expr, negated)) = stack.pop() {
        match ungroup(expr) {
            AstExpr::Binary(bin)
                if !negated && matches!(bin.op.kind, BinOpKind::Add | BinOpKind::Sub) => {
                // rhs first, so that lhs is popped first
                stack.push((&bin.rhs, bin.op.kind == BinOpKind::Sub));
                stack.push((&bin.lhs, false));
            },
            term => {
                let term = lower(term)?;
                terms.push(if negated { negate(term) } else { term });
            },
        }
    }
    Ok(Node::operator(Tag::Add, terms))
}

/// Lowers a chain of `*`, `/` and implicit multiplication into a single [`Tag::Mul`] node,
/// keeping the factors in source order.
fn lower_product(expr: &AstExpr) -> Result<Node, Error> {
    let mut factors = Vec::new();
    let mut stack = vec![(expr, false)];
    while let Some((expr, divisor)) = stack.pop() {
        let expr = ungroup(expr);
        if !divisor {
            if let AstExpr::Binary(bin) = expr {
                match bin.op.kind {
                    BinOpKind::Mul => {
                        stack.push((&bin.rhs, false));
                        stack.push((&bin.lhs, false));
                        continue;
                    },
                    BinOpKind::Div => {
                        if let Some(quotient) = integer_ratio(&bin.lhs, &bin.rhs)? {
                            factors.push(quotient);
                        } else {
                            stack.push((&bin.rhs, true));
                            stack.push((&bin.lhs, false));
                        }
                        continue;
                    },
                    _ => (),
                }
            }
        }

        let factor = lower(expr)?;
        factors.push(if divisor { reciprocal(factor) } else { factor });
    }

    if factors.len() == 1 {
        Ok(factors.remove(0))
    } else {
        Ok(Node::operator(Tag::Mul, factors))
    }
}

fn lower_literal(literal: &Literal) -> Result<Node, Error> {
    match literal {
        Literal::Int(lit) => int_from_str(&lit.value)
            .map(|n| Node::constant(Number::Integer(n)))
            .ok_or_else(|| Error::new(vec![lit.span.clone()], InvalidNumber {
                literal: lit.value.clone(),
            })),
        Literal::Float(lit) => float_from_str(&lit.value)
            .map(|n| Node::constant(Number::Float(n)))
            .ok_or_else(|| Error::new(vec![lit.span.clone()], InvalidNumber {
                literal: lit.value.clone(),
            })),
        Literal::Symbol(sym) => Ok(Node::symbol(sym.name.clone())),
    }
}

fn lower_call(call: &Call) -> Result<Node, Error> {
    let args = call.args.iter().map(lower).collect::<Result<Vec<_>, _>>()?;
    if call.name.name == "sqrt" && args.len() == 1 {
        let mut args = args;
        return Ok(root(args.remove(0), Node::integer(2)));
    }
    Ok(Node::operator(Tag::Call(call.name.name.clone()), args))
}

fn lower_root(root_expr: &Root) -> Result<Node, Error> {
    let radicand = lower(&root_expr.radicand)?;
    let index = match &root_expr.index {
        Some(index) => lower(index)?,
        None => Node::integer(2),
    };
    Ok(root(radicand, index))
}

fn lower_unary(unary: &Unary) -> Result<Node, Error> {
    match unary.op.kind {
        UnaryOpKind::Pos => lower(&unary.operand),
        UnaryOpKind::Neg => Ok(negate(lower(&unary.operand)?)),
        UnaryOpKind::Factorial => {
            // `n!!!` nests without bound, so count the operators instead of recursing
            let mut count = 1;
            let mut operand = ungroup(&unary.operand);
            while let AstExpr::Unary(inner) = operand {
                if inner.op.kind != UnaryOpKind::Factorial {
                    break;
                }
                count += 1;
                operand = ungroup(&inner.operand);
            }

            let mut node = lower(operand)?;
            for _ in 0..count {
                node = Node::operator(Tag::Factorial, vec![node]);
            }
            Ok(node)
        },
    }
}

/// Lowers any expression.
fn lower(expr: &AstExpr) -> Result<Node, Error> {
    match expr {
        AstExpr::Literal(literal) => lower_literal(literal),
        AstExpr::Paren(paren) => lower(paren.innermost()),
        AstExpr::Call(call) => lower_call(call),
        AstExpr::Frac(frac) => match integer_ratio(&frac.numerator, &frac.denominator)? {
            Some(quotient) => Ok(quotient),
            None => Ok(Node::operator(Tag::Mul, vec![
                lower(&frac.numerator)?,
                reciprocal(lower(&frac.denominator)?),
            ])),
        },
        AstExpr::Root(root) => lower_root(root),
        AstExpr::Unary(unary) => lower_unary(unary),
        AstExpr::Binary(bin) => match bin.op.kind {
            BinOpKind::Add | BinOpKind::Sub => lower_sum(expr),
            BinOpKind::Mul | BinOpKind::Div => lower_product(expr),
            BinOpKind::Mod => Ok(Node::operator(Tag::Mod, vec![lower(&bin.lhs)?, lower(&bin.rhs)?])),
            BinOpKind::Exp => Ok(Node::operator(Tag::Pow, vec![lower(&bin.lhs)?, lower(&bin.rhs)?])),
        },
    }
}

/// Lowers a parsed formula into an expression tree.
///
/// The only failure is a numeric literal that cannot be represented, reported with its span.
impl TryFrom<&AstExpr> for Node {
    type Error = Error;

    fn try_from(expr: &AstExpr) -> Result<Self, Self::Error> {
        lower(expr)
    }
}

#[cfg(test)]
mod tests {
    use crate::primitive::float;
    use formsim_parser::parser::Parser;
    use pretty_assertions::assert_eq;
    use super::*;

    fn tree(input: &str) -> Node {
        let ast = Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        Node::try_from(&ast).unwrap()
    }

    fn x() -> Node {
        Node::symbol("x")
    }

    fn y() -> Node {
        Node::symbol("y")
    }

    fn half() -> Node {
        Node::constant(Number::from_rational(rational(int(1), int(2)).unwrap()))
    }

    #[test]
    fn sums_flatten_in_order() {
        assert_eq!(tree("x - y + 3 - 2"), Node::operator(Tag::Add, vec![
            x(),
            Node::operator(Tag::Mul, vec![Node::integer(-1), y()]),
            Node::integer(3),
            Node::integer(-2),
        ]));
    }

    #[test]
    fn grouped_sums_flatten() {
        assert_eq!(tree("x + (y + 1)"), tree("(x + y) + 1"));
        assert_eq!(tree("x - (y + 1)"), Node::operator(Tag::Add, vec![
            x(),
            Node::operator(Tag::Mul, vec![
                Node::integer(-1),
                Node::operator(Tag::Add, vec![y(), Node::integer(1)]),
            ]),
        ]));
    }

    #[test]
    fn products_flatten_in_order() {
        assert_eq!(tree("2x y / z"), Node::operator(Tag::Mul, vec![
            Node::integer(2),
            x(),
            y(),
            Node::operator(Tag::Pow, vec![Node::symbol("z"), Node::integer(-1)]),
        ]));
        assert_eq!(tree(r"2 \cdot x"), tree("2 * x"));
    }

    #[test]
    fn integer_division_is_rational() {
        assert_eq!(tree("1/2"), half());
        assert_eq!(tree(r"\frac{1}{2}"), half());
        assert_eq!(tree("4/2"), Node::integer(2));
        assert_eq!(tree("-1/2").to_string(), "-1/2");
    }

    #[test]
    fn division_by_zero_literal_is_kept() {
        assert_eq!(tree("1/0"), Node::operator(Tag::Mul, vec![
            Node::integer(1),
            Node::operator(Tag::Pow, vec![Node::integer(0), Node::integer(-1)]),
        ]));
    }

    #[test]
    fn unary_operators() {
        assert_eq!(tree("-3"), Node::integer(-3));
        assert_eq!(tree("+x"), x());
        assert_eq!(tree("-x"), Node::operator(Tag::Mul, vec![Node::integer(-1), x()]));
        assert_eq!(tree("n!!"), Node::operator(Tag::Factorial, vec![
            Node::operator(Tag::Factorial, vec![Node::symbol("n")]),
        ]));
    }

    #[test]
    fn roots_and_powers() {
        assert_eq!(tree(r"\sqrt{x}"), Node::operator(Tag::Pow, vec![x(), half()]));
        assert_eq!(tree("sqrt(x)"), Node::operator(Tag::Pow, vec![x(), half()]));
        assert_eq!(tree(r"\sqrt[3]{x}").to_string(), "x^(1/3)");
        assert_eq!(tree("x^y^2"), Node::operator(Tag::Pow, vec![
            x(),
            Node::operator(Tag::Pow, vec![y(), Node::integer(2)]),
        ]));
    }

    #[test]
    fn calls_and_commands() {
        assert_eq!(tree(r"\sin x"), Node::operator(Tag::Call("sin".to_string()), vec![x()]));
        assert_eq!(tree("f(x, y)"), Node::operator(Tag::Call("f".to_string()), vec![x(), y()]));
        assert_eq!(tree(r"2\pi"), Node::operator(Tag::Mul, vec![Node::integer(2), Node::symbol("pi")]));
    }

    #[test]
    fn literals() {
        assert_eq!(tree("2.5"), Node::constant(Number::Float(float(2.5))));
        assert_eq!(tree("x_{12}"), Node::symbol("x_12"));
        assert_eq!(tree("7 % 3"), Node::operator(Tag::Mod, vec![Node::integer(7), Node::integer(3)]));
    }
}
