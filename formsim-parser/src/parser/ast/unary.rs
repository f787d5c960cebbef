use crate::{
    parser::{
        ast::{binary::Binary, expr::Expr},
        error::Error,
        token::op::{UnaryOp, UnaryOpKind},
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A unary expression, such as `-x` or `n!`. Unary expressions can include nested expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unary {
    /// The operand of the unary expression (left or right, depending on the associativity).
    pub operand: Box<Expr>,

    /// The operator of the unary expression.
    pub op: UnaryOp,

    /// The region of the source code that this unary expression was parsed from.
    pub span: Range<usize>,
}

impl Unary {
    /// Returns the span of the unary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses a right-associative (prefix) unary expression, such as `-x`. The operand extends
    /// over any following operators with higher precedence than the unary operator, so `-x^2`
    /// is `-(x^2)`.
    fn parse_prefix(input: &mut Parser) -> Result<Self, Error> {
        let op = input.try_parse::<UnaryOp>()?;
        let operand = {
            let lhs = Self::parse_or_lower(input)?;
            Binary::parse_expr(input, lhs, op.precedence())?.0
        };
        let span = op.span.start..operand.span().end;
        Ok(Self {
            operand: Box::new(operand),
            op,
            span,
        })
    }

    /// Parses a primary expression followed by any number of left-associative (postfix) unary
    /// operators, such as `n!!`.
    pub fn parse_postfix(input: &mut Parser) -> Result<Expr, Error> {
        let mut result = Expr::parse_primary(input)?;
        let start_span = result.span().start;

        while input.peek_kind() == Some(TokenKind::Factorial) {
            let op = input.try_parse::<UnaryOp>()?;
            let span = start_span..op.span.end;
            result = Expr::Unary(Self {
                operand: Box::new(result),
                op,
                span,
            });
        }

        Ok(result)
    }

    /// Parses a unary expression, or lower precedence expressions.
    ///
    /// This is the entry point for every operand, so it is where the parser's nesting depth is
    /// tracked.
    pub fn parse_or_lower(input: &mut Parser) -> Result<Expr, Error> {
        input.nested(|input| match input.peek_kind() {
            Some(TokenKind::Sub | TokenKind::Add) => Self::parse_prefix(input).map(Expr::Unary),
            _ => Self::parse_postfix(input),
        })
    }
}

impl std::fmt::Display for Unary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(")?;
        match self.op.kind {
            UnaryOpKind::Factorial => {
                self.operand.fmt(f)?;
                self.op.fmt(f)?;
            },
            UnaryOpKind::Neg | UnaryOpKind::Pos => {
                self.op.fmt(f)?;
                self.operand.fmt(f)?;
            },
        }
        write!(f, ")")
    }
}
