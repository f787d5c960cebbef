//! LaTeX constructs that take their operands as groups, `\frac{a}{b}` and `\sqrt[n]{a}`.

use crate::{
    parser::{
        ast::{expr::Expr, paren::{Delimiter, Paren}, unary::Unary},
        error::{Error, MissingArgument},
        token::{Frac as FracToken, OpenCurly, OpenSquare, Sqrt},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parses a single argument of a LaTeX command: either a braced group, whose braces are
/// dropped, or a single operand such as `2` or `x`.
fn parse_group(input: &mut Parser, command: &str, command_span: &Range<usize>) -> Result<Expr, Error> {
    if let Ok(open) = input.try_parse::<OpenCurly>() {
        let (expr, _) = Paren::parse_contents(input, Delimiter::Curly, open.span)?;
        return Ok(expr);
    }

    input.nested(Unary::parse_postfix).map_err(|err| if err.fatal {
        err
    } else {
        Error::new_fatal(vec![command_span.clone()], MissingArgument {
            command: command.to_owned(),
        })
    })
}

/// A LaTeX fraction, such as `\frac{a}{b}`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frac {
    /// The numerator.
    pub numerator: Box<Expr>,

    /// The denominator.
    pub denominator: Box<Expr>,

    /// The region of the source code that this fraction was parsed from.
    pub span: Range<usize>,
}

impl Frac {
    /// Returns the span of the fraction.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for Frac {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let command = input.try_parse::<FracToken>()?;
        let numerator = parse_group(input, &command.lexeme, &command.span)?;
        let denominator = parse_group(input, &command.lexeme, &command.span)?;
        let end = input.prev_token().map_or(command.span.end, |token| token.span.end);

        Ok(Self {
            numerator: Box::new(numerator),
            denominator: Box::new(denominator),
            span: command.span.start..end,
        })
    }
}

impl std::fmt::Display for Frac {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\\frac{{")?;
        self.numerator.fmt(f)?;
        write!(f, "}}{{")?;
        self.denominator.fmt(f)?;
        write!(f, "}}")
    }
}

/// A LaTeX root, such as `\sqrt{x}` or `\sqrt[3]{x}`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Root {
    /// The index of the root, if given. `\sqrt{x}` has no index and is a square root.
    pub index: Option<Box<Expr>>,

    /// The radicand.
    pub radicand: Box<Expr>,

    /// The region of the source code that this root was parsed from.
    pub span: Range<usize>,
}

impl Root {
    /// Returns the span of the root.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for Root {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let command = input.try_parse::<Sqrt>()?;
        let index = if input.peek_kind() == Some(TokenKind::OpenSquare) {
            let open = input.try_parse::<OpenSquare>()?;
            let (index, _) = Paren::parse_contents(input, Delimiter::Square, open.span)?;
            Some(Box::new(index))
        } else {
            None
        };
        let radicand = parse_group(input, &command.lexeme, &command.span)?;
        let end = input.prev_token().map_or(command.span.end, |token| token.span.end);

        Ok(Self {
            index,
            radicand: Box::new(radicand),
            span: command.span.start..end,
        })
    }
}

impl std::fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\\sqrt")?;
        if let Some(index) = &self.index {
            write!(f, "[")?;
            index.fmt(f)?;
            write!(f, "]")?;
        }
        write!(f, "{{")?;
        self.radicand.fmt(f)?;
        write!(f, "}}")
    }
}
