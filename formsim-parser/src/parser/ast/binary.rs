use crate::parser::{
    ast::{expr::Expr, literal::{LitInt, Literal}, unary::Unary},
    error::{Error, NonFatal},
    token::op::{BinOp, BinOpKind},
    Associativity,
    Parser,
    Precedence,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A binary operator, including implicit multiplication.
#[derive(Debug, Clone, PartialEq)]
enum BinOpExt {
    /// A binary operator, such as `+` or `*`.
    Op(BinOp),

    /// Implicit multiplication, such as `2x` or `x(x + 1)`.
    ///
    /// This is not a real operator, but it is treated as one for the purposes of parsing.
    ImplicitMultiplication,
}

impl BinOpExt {
    /// Returns the precedence of the binary operator.
    fn precedence(&self) -> Precedence {
        match self {
            BinOpExt::Op(op) => op.precedence(),
            BinOpExt::ImplicitMultiplication => Precedence::Factor,
        }
    }
}

impl From<BinOp> for BinOpExt {
    fn from(op: BinOp) -> Self {
        BinOpExt::Op(op)
    }
}

/// A binary expression, such as `1 + 2`. Binary expressions can include nested expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binary {
    /// The left-hand side of the binary expression.
    pub lhs: Box<Expr>,

    /// The operator of the binary expression.
    pub op: BinOp,

    /// The right-hand side of the binary expression.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary expression was parsed from.
    pub span: Range<usize>,
}

impl Binary {
    /// Returns the span of the binary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// After parsing the left-hand-side, the operator, and the right-hand-side of a potential
    /// binary expression, parse ahead to see if the right-hand-side is incomplete.
    ///
    /// If we are parsing the expression `1 + 2 * 3`, we will first parse the left-hand-side `1`,
    /// then the operator `+`, then the right-hand-side `2`. However, before we build the
    /// corresponding AST node, we should check if the operator after `2` has higher precedence
    /// than `+` (if it exists). If it does, we parse the expression starting with `2` first, so
    /// that we get `2 * 3` as the right-hand-side to the `1 +` node.
    ///
    /// Implicit multiplication is also handled here. In an expression such as `1 + 2x`, there is
    /// no operator after `2`, so we assume an implicit multiplication operator, which has higher
    /// precedence than addition. [`Self::parse_expr`] reports whether it consumed anything, so
    /// the loop stops once there is nothing left to multiply with.
    fn complete_rhs(
        input: &mut Parser,
        lhs: Expr,
        op: BinOpExt,
        mut rhs: Expr,
    ) -> Result<Expr, Error> {
        let precedence = op.precedence();

        loop {
            if let Some(next_op) = input.peek::<BinOp>() {
                if next_op.precedence() > precedence || next_op.associativity() == Associativity::Right {
                    // this operator has a higher precedence or it is right associative, so we should
                    // parse its expression starting with `rhs` first
                    let next_precedence = next_op.precedence();
                    rhs = input.nested(|input| Self::parse_expr(input, rhs, next_precedence))?.0;
                } else {
                    // lower precedence, or equal precedence and left-associativity, such as
                    // `1 * 2 + 3` or `1 * 2 * 3`; let `lhs` become `1 * 2` and pick up the
                    // operator on the next iteration of the outside loop
                    break;
                }
            } else {
                // there is no operator; this could be implicit multiplication, unless the
                // previous operator binds at least as tightly
                if precedence >= Precedence::Factor {
                    break;
                }

                let (expr, changed) = Self::parse_expr(input, rhs, Precedence::Factor)?;

                // `rhs = expr;` must happen in all cases, even if `changed` is false, otherwise it
                // would've been moved into `Self::parse_expr` above
                rhs = expr;

                if !changed {
                    break;
                }
            }
        }

        // create the binary node representing `lhs op rhs`
        let (start_span, end_span) = (lhs.span().start, rhs.span().end);
        let op = match op {
            BinOpExt::Op(op) => op,
            BinOpExt::ImplicitMultiplication => BinOp {
                kind: BinOpKind::Mul,
                implicit: true,
                span: lhs.span().end..rhs.span().start,
            },
        };
        Ok(Expr::Binary(Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
            span: start_span..end_span,
        }))
    }

    /// After parsing the left-hand-side of a potential binary expression, parse ahead to see if
    /// there is a binary operator (with at least the given precedence) and a right-hand-side.
    ///
    /// Returns the resulting expression, and whether anything was parsed after `lhs`.
    pub fn parse_expr(
        input: &mut Parser,
        mut lhs: Expr,
        precedence: Precedence,
    ) -> Result<(Expr, bool), Error> {
        let mut changed = false;
        loop {
            if let Ok(op) = input.try_parse_then::<BinOp, _>(|bin_op, input| {
                if bin_op.precedence() >= precedence {
                    Ok(())
                } else {
                    Err(input.error(NonFatal))
                }
            }) {
                let rhs = Unary::parse_or_lower(input)?;
                lhs = Self::complete_rhs(input, lhs, op.into(), rhs)?;
            } else if Precedence::Factor >= precedence {
                // implicit multiplication test

                // ensure that we get here because there is *no* operator, not because the operator
                // has lower precedence
                if input.peek::<BinOp>().is_some() {
                    break;
                }

                // if there is no operand, there is no implicit multiplication
                match input.try_parse_with_fn(|input| input.nested(Unary::parse_postfix)) {
                    Ok(rhs) => {
                        lhs = Self::complete_rhs(input, lhs, BinOpExt::ImplicitMultiplication, rhs)?;
                    },
                    Err(err) if err.fatal => return Err(err),
                    Err(_) => break,
                }
            } else {
                break;
            }

            changed = true;
        }

        Ok((lhs, changed))
    }
}

/// Returns a leaf expression to leave behind when a child is moved out of a node being dropped.
fn hollow() -> Box<Expr> {
    Box::new(Expr::Literal(Literal::Int(LitInt { value: String::new(), span: 0..0 })))
}

/// A long chain of left-associative operators, such as `a + b + c + ...`, nests as deep as it is
/// long, so its children are moved onto a flat stack before they are dropped.
impl Drop for Binary {
    fn drop(&mut self) {
        let mut stack = vec![
            std::mem::replace(&mut self.lhs, hollow()),
            std::mem::replace(&mut self.rhs, hollow()),
        ];
        while let Some(mut expr) = stack.pop() {
            match &mut *expr {
                Expr::Binary(bin) => {
                    stack.push(std::mem::replace(&mut bin.lhs, hollow()));
                    stack.push(std::mem::replace(&mut bin.rhs, hollow()));
                },
                Expr::Unary(unary) => stack.push(std::mem::replace(&mut unary.operand, hollow())),
                Expr::Paren(paren) => stack.push(std::mem::replace(&mut paren.expr, hollow())),
                _ => (),
            }
        }
    }
}

impl std::fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        self.lhs.fmt(f)?;
        self.op.fmt(f)?;
        self.rhs.fmt(f)?;
        write!(f, ")")
    }
}
