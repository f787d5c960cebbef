use crate::{
    parser::{
        ast::{
            binary::Binary,
            call::Call,
            latex::{Frac, Root},
            literal::Literal,
            paren::{Delimiter, Paren},
            unary::Unary,
        },
        error::{Error, UnexpectedEof, UnexpectedToken},
        Parse,
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
    try_parse_catch_fatal,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The token kinds that can start an expression.
const EXPR_START: &[TokenKind] = &[
    TokenKind::Int,
    TokenKind::Float,
    TokenKind::Name,
    TokenKind::Command,
    TokenKind::Frac,
    TokenKind::Sqrt,
    TokenKind::OpenParen,
    TokenKind::OpenCurly,
    TokenKind::OpenSquare,
    TokenKind::Sub,
    TokenKind::Add,
];

/// Represents any kind of expression in a formula.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A grouped expression, containing a single expression.
    Paren(Paren),

    /// A function call, containing the function name and the arguments.
    Call(Call),

    /// A LaTeX fraction.
    Frac(Frac),

    /// A LaTeX root.
    Root(Root),

    /// A unary operation, such as `-x` or `n!`.
    Unary(Unary),

    /// A binary operation, such as `x + y`.
    Binary(Binary),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Literal(literal) => literal.span(),
            Expr::Paren(paren) => paren.span(),
            Expr::Call(call) => call.span(),
            Expr::Frac(frac) => frac.span(),
            Expr::Root(root) => root.span(),
            Expr::Unary(unary) => unary.span(),
            Expr::Binary(binary) => binary.span(),
        }
    }

    /// Parses a primary expression: a literal, a group, a function call, or a LaTeX construct.
    /// These are the only expressions that can be the right-hand-side of implicit
    /// multiplication.
    pub fn parse_primary(input: &mut Parser) -> Result<Self, Error> {
        let Some(kind) = input.peek_kind() else {
            return Err(Error::new(vec![input.peek_span()], UnexpectedEof));
        };

        match kind {
            TokenKind::Int | TokenKind::Float => input.try_parse::<Literal>().map(Expr::Literal),
            TokenKind::Name => {
                let err = try_parse_catch_fatal!(
                    input.try_parse::<Call>().map(Expr::Call),
                    input.try_parse::<Literal>().map(Expr::Literal),
                );
                Err(err)
            },
            TokenKind::Command => input.try_parse_with_fn(Call::parse_command),
            TokenKind::Frac => input.try_parse::<Frac>().map(Expr::Frac),
            TokenKind::Sqrt => input.try_parse::<Root>().map(Expr::Root),
            kind if Delimiter::opened_by(kind).is_some() => input.try_parse::<Paren>().map(Expr::Paren),
            found => Err(Error::new(vec![input.peek_span()], UnexpectedToken {
                expected: EXPR_START,
                found,
            })),
        }
    }
}

impl Parse for Expr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let lhs = Unary::parse_or_lower(input)?;
        Ok(Binary::parse_expr(input, lhs, Precedence::Any)?.0)
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Literal(literal) => literal.fmt(f),
            Expr::Paren(paren) => paren.fmt(f),
            Expr::Call(call) => call.fmt(f),
            Expr::Frac(frac) => frac.fmt(f),
            Expr::Root(root) => root.fmt(f),
            Expr::Unary(unary) => unary.fmt(f),
            Expr::Binary(binary) => binary.fmt(f),
        }
    }
}
