//! Unary and binary operator tokens.
//!
//! Each operator kind is tied to exactly one token in a small table. Parsing and the error for a
//! wrong token both read from it.

use crate::{
    parser::{
        error::{Error, UnexpectedToken},
        Associativity,
        Parse,
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A unary operation: `-x`, `+x` or `x!`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOpKind {
    Factorial,
    Neg,
    Pos,
}

impl UnaryOpKind {
    /// Every unary operation, with the token it is written as.
    const ALL: [(TokenKind, UnaryOpKind); 3] = [
        (TokenKind::Factorial, UnaryOpKind::Factorial),
        (TokenKind::Sub, UnaryOpKind::Neg),
        (TokenKind::Add, UnaryOpKind::Pos),
    ];

    /// The tokens that can start or end a unary operation.
    const TOKENS: &'static [TokenKind] = &[TokenKind::Factorial, TokenKind::Sub, TokenKind::Add];

    /// Postfix operators bind tighter than anything else; prefix signs sit between products and
    /// powers, so `-x^2` is `-(x^2)`.
    pub fn precedence(&self) -> Precedence {
        if self.is_postfix() {
            Precedence::Factorial
        } else {
            Precedence::Neg
        }
    }

    pub fn associativity(&self) -> Associativity {
        if self.is_postfix() {
            Associativity::Left
        } else {
            Associativity::Right
        }
    }

    /// Returns true if the operator is written after its operand.
    pub fn is_postfix(&self) -> bool {
        matches!(self, Self::Factorial)
    }

    /// The text of the operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Factorial => "!",
            Self::Neg => "-",
            Self::Pos => "+",
        }
    }
}

/// A unary operator that takes one operand.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnaryOp {
    /// The kind of unary operator.
    pub kind: UnaryOpKind,

    /// The region of the source code that this operator was parsed from.
    pub span: Range<usize>,
}

impl UnaryOp {
    pub fn precedence(&self) -> Precedence {
        self.kind.precedence()
    }

    pub fn associativity(&self) -> Associativity {
        self.kind.associativity()
    }
}

impl Parse for UnaryOp {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let (kind, span) = parse_kind(input, &UnaryOpKind::ALL, UnaryOpKind::TOKENS)?;
        Ok(Self { kind, span })
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.kind.symbol())
    }
}

/// A binary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinOpKind {
    Exp,
    Mul,
    Div,
    Mod,
    Add,
    Sub,
}

impl BinOpKind {
    /// Every binary operation, with the token it is written as.
    const ALL: [(TokenKind, BinOpKind); 6] = [
        (TokenKind::Exp, BinOpKind::Exp),
        (TokenKind::Mul, BinOpKind::Mul),
        (TokenKind::Div, BinOpKind::Div),
        (TokenKind::Mod, BinOpKind::Mod),
        (TokenKind::Add, BinOpKind::Add),
        (TokenKind::Sub, BinOpKind::Sub),
    ];

    const TOKENS: &'static [TokenKind] = &[
        TokenKind::Exp,
        TokenKind::Mul,
        TokenKind::Div,
        TokenKind::Mod,
        TokenKind::Add,
        TokenKind::Sub,
    ];

    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Add | Self::Sub => Precedence::Term,
            Self::Mul | Self::Div | Self::Mod => Precedence::Factor,
            Self::Exp => Precedence::Exp,
        }
    }

    /// Only exponentiation groups to the right: `a^b^c` is `a^(b^c)`.
    pub fn associativity(&self) -> Associativity {
        if *self == Self::Exp {
            Associativity::Right
        } else {
            Associativity::Left
        }
    }

    /// The text of the operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Exp => "^",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Add => "+",
            Self::Sub => "-",
        }
    }
}

/// A binary operator that takes two operands.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinOp {
    /// The kind of binary operator.
    pub kind: BinOpKind,

    /// Whether this binary operator was implicitly inserted by the parser, as in `2x`.
    pub implicit: bool,

    /// The region of the source code that this operator was parsed from. Empty for implicit
    /// operators.
    pub span: Range<usize>,
}

impl BinOp {
    pub fn precedence(&self) -> Precedence {
        self.kind.precedence()
    }

    pub fn associativity(&self) -> Associativity {
        self.kind.associativity()
    }
}

impl Parse for BinOp {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let (kind, span) = parse_kind(input, &BinOpKind::ALL, BinOpKind::TOKENS)?;
        Ok(Self { kind, implicit: false, span })
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, " {} ", self.kind.symbol())
    }
}

/// Reads one token and looks it up in an operator table.
fn parse_kind<K: Copy>(
    input: &mut Parser,
    table: &[(TokenKind, K)],
    expected: &'static [TokenKind],
) -> Result<(K, Range<usize>), Error> {
    let token = input.next_token()?;
    match table.iter().find(|(kind, _)| *kind == token.kind) {
        Some(&(_, op)) => Ok((op, token.span)),
        None => Err(Error::new(vec![token.span.clone()], UnexpectedToken {
            expected,
            found: token.kind,
        })),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn binary_operators_from_tokens() {
        let mut parser = Parser::new("^ * / % + -");
        let mut kinds = Vec::new();
        for _ in 0..6 {
            let op = parser.try_parse::<BinOp>().unwrap();
            assert!(!op.implicit);
            kinds.push(op.kind);
        }
        assert_eq!(kinds, vec![
            BinOpKind::Exp,
            BinOpKind::Mul,
            BinOpKind::Div,
            BinOpKind::Mod,
            BinOpKind::Add,
            BinOpKind::Sub,
        ]);
    }

    #[test]
    fn operator_text() {
        let op = BinOp { kind: BinOpKind::Mod, implicit: false, span: 0..1 };
        assert_eq!(op.to_string(), " % ");
        let op = UnaryOp { kind: UnaryOpKind::Factorial, span: 1..2 };
        assert_eq!(op.to_string(), "!");
    }

    #[test]
    fn non_operator_is_rejected() {
        let mut parser = Parser::new("x");
        assert!(parser.try_parse::<BinOp>().is_err());
        let mut parser = Parser::new("*");
        assert!(parser.try_parse::<UnaryOp>().is_err());
    }

    #[test]
    fn signs_bind_looser_than_powers() {
        assert!(UnaryOpKind::Neg.precedence() < BinOpKind::Exp.precedence());
        assert!(UnaryOpKind::Neg.precedence() > BinOpKind::Mul.precedence());
        assert_eq!(BinOpKind::Exp.associativity(), Associativity::Right);
        assert_eq!(UnaryOpKind::Factorial.associativity(), Associativity::Left);
    }
}
