use crate::{
    parser::{
        ast::expr::Expr,
        error::{EmptyParenthesis, Error, UnclosedParenthesis, UnexpectedToken},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The pair of delimiters surrounding a grouped expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Delimiter {
    /// Parentheses, `(` and `)`.
    Paren,

    /// Curly braces, `{` and `}`, used for grouping in LaTeX.
    Curly,

    /// Square brackets, `[` and `]`.
    Square,
}

impl Delimiter {
    /// Returns the delimiter opened by the given token kind, if any.
    pub fn opened_by(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::OpenParen => Some(Self::Paren),
            TokenKind::OpenCurly => Some(Self::Curly),
            TokenKind::OpenSquare => Some(Self::Square),
            _ => None,
        }
    }

    /// Returns the token kind that closes this delimiter.
    pub fn close_kind(self) -> TokenKind {
        match self {
            Self::Paren => TokenKind::CloseParen,
            Self::Curly => TokenKind::CloseCurly,
            Self::Square => TokenKind::CloseSquare,
        }
    }

    /// Returns the opening and closing characters of this delimiter.
    pub fn chars(self) -> (char, char) {
        match self {
            Self::Paren => ('(', ')'),
            Self::Curly => ('{', '}'),
            Self::Square => ('[', ']'),
        }
    }
}

/// A grouped expression, such as `(x + 1)` or `{x + 1}`. A [`Paren`] can only contain a single
/// expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Paren {
    /// The inner expression.
    pub expr: Box<Expr>,

    /// The delimiters surrounding the expression.
    pub delimiter: Delimiter,

    /// The region of the source code that this [`Paren`] was parsed from.
    pub span: Range<usize>,
}

impl Paren {
    /// Returns the span of the grouped expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns the innermost expression in the grouped expression.
    pub fn innermost(&self) -> &Expr {
        let mut inner = &self.expr;
        while let Expr::Paren(paren) = inner.as_ref() {
            inner = &paren.expr;
        }
        inner
    }

    /// Parses the contents of a group whose opening delimiter has already been consumed, up to
    /// and including the closing delimiter. Returns the inner expression and the end of the
    /// closing delimiter's span.
    ///
    /// Once a group is opened, every error inside it is fatal.
    pub(crate) fn parse_contents(
        input: &mut Parser,
        delimiter: Delimiter,
        open_span: Range<usize>,
    ) -> Result<(Expr, usize), Error> {
        let (open, close) = delimiter.chars();

        if input.peek_kind() == Some(delimiter.close_kind()) {
            let close_span = input.next_token()?.span;
            return Err(Error::new_fatal(
                vec![open_span.start..close_span.end],
                EmptyParenthesis,
            ));
        }

        let expr = input.try_parse::<Expr>().map_err(|mut err| {
            err.fatal = true;
            err
        })?;

        match input.next_token() {
            Ok(token) if token.kind == delimiter.close_kind() => Ok((expr, token.span.end)),
            _ => Err(Error::new_fatal(vec![open_span], UnclosedParenthesis { open, close })),
        }
    }
}

impl Parse for Paren {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        let Some(delimiter) = Delimiter::opened_by(token.kind) else {
            return Err(Error::new(vec![token.span], UnexpectedToken {
                expected: &[TokenKind::OpenParen, TokenKind::OpenCurly, TokenKind::OpenSquare],
                found: token.kind,
            }));
        };

        let (expr, end) = Self::parse_contents(input, delimiter, token.span.clone())?;
        Ok(Self {
            expr: Box::new(expr),
            delimiter,
            span: token.span.start..end,
        })
    }
}

impl std::fmt::Display for Paren {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (open, close) = self.delimiter.chars();
        write!(f, "{}", open)?;
        self.expr.fmt(f)?;
        write!(f, "{}", close)
    }
}
