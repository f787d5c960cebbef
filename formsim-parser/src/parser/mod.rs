pub mod ast;
pub mod error;
pub mod token;

use error::{Error, NestingTooDeep, ExpectedEof, UnexpectedEof};
use formsim_error::ErrorKind;
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;

/// The maximum number of nested sub-expressions (parentheses, unary operators, exponent chains,
/// and so on) that the parser will descend into before giving up.
pub const MAX_NESTING: usize = 128;

/// Attempts to parse a value from the given stream of tokens, using multiple parsing functions
/// in order. The first function that succeeds is used to parse the value.
///
/// This function can also catch fatal errors and immediately short-circuit the parsing
/// process.
///
/// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
/// value is returned. Otherwise, the error of the last attempted parsing function is returned.
#[macro_export]
macro_rules! try_parse_catch_fatal {
    ($($expr:expr),+ $(,)?) => {{
        $(
            #[allow(unused_variables)]
            let err = match $expr {
                Ok(value) => return Ok(value),
                Err(err) if err.fatal => return Err(err),
                // ignore this error and try the next parser, or return it
                Err(err) => err,
            };
        )+
        err
    }};
}

/// A high-level parser for formulas. This is the type to use to parse an arbitrary formula into
/// an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,

    /// The number of nested sub-expressions the parser is currently inside.
    depth: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
            depth: 0,
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Creates a fatal error that points at the current token, or the end of the source code if
    /// the cursor is at the end of the stream.
    pub fn error_fatal(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new_fatal(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the previous token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the beginning of the stream.
    pub fn prev_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor.checked_sub(1)?)
    }

    /// Returns the current token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the end of the stream.
    pub fn current_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Returns the tokens that have not been parsed yet, starting at the cursor.
    pub fn remaining(&self) -> &[Token<'source>] {
        &self.tokens[self.cursor.min(self.tokens.len())..]
    }

    /// Advances the cursor past any whitespace tokens.
    pub fn advance_past_whitespace(&mut self) {
        while let Some(token) = self.current_token() {
            if !token.is_whitespace() {
                break;
            }
            self.cursor += 1;
        }
    }

    /// Returns the kind of the next non-whitespace token without moving the cursor.
    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.remaining()
            .iter()
            .find(|token| !token.is_whitespace())
            .map(|token| token.kind)
    }

    /// Returns the span of the next non-whitespace token without moving the cursor, or the end
    /// of the source code if there are no more tokens.
    pub fn peek_span(&self) -> Range<usize> {
        self.remaining()
            .iter()
            .find(|token| !token.is_whitespace())
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if token.is_whitespace() {
                continue;
            } else {
                // cloning is cheap: only Range<_> is cloned
                return Ok(token.clone());
            }
        }

        Err(self.error(UnexpectedEof))
    }

    /// Runs the given parsing function one nesting level deeper, failing with a fatal error if
    /// the parser is already [`MAX_NESTING`] levels deep.
    pub fn nested<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        if self.depth >= MAX_NESTING {
            return Err(self.error_fatal(NestingTooDeep { limit: MAX_NESTING }));
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Parses a value and then restores the cursor, regardless of whether parsing succeeded.
    pub fn peek<T: Parse>(&mut self) -> Option<T> {
        let start = self.cursor;
        let value = T::parse(self).ok();
        self.cursor = start;
        value
    }

    /// Speculatively parses a value from the given stream of tokens. This function can be used
    /// in the [`Parse::parse`] implementation of a type with the given [`Parser`], as it will
    /// automatically backtrack the cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Speculatively parses multiple values (at least one) from the given stream of tokens, each
    /// delimited by a certain token.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// values are returned. Otherwise, the stream is left unchanged and an error is returned,
    /// including when a delimiter is not followed by a value.
    pub fn try_parse_delimited<T: Parse>(&mut self, delimiter: TokenKind) -> Result<Vec<T>, Error> {
        let start = self.cursor;
        let mut values = Vec::new();

        loop {
            match self.try_parse::<T>() {
                Ok(value) => values.push(value),
                Err(err) => {
                    self.cursor = start;
                    return Err(err);
                },
            }

            if self.peek_kind() == Some(delimiter) {
                self.advance_past_whitespace();
                self.cursor += 1;
            } else {
                return Ok(values);
            }
        }
    }

    /// Speculatively parses a value from the given stream of tokens, using a custom parsing
    /// function to parse the value.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        let start = self.cursor;
        match f(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Speculatively parses a value from the given stream of tokens, with a validation predicate.
    /// The value must parse successfully, **and** the predicate must return [`Ok`] for this
    /// function to return successfully.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_then<T: Parse, F>(&mut self, predicate: F) -> Result<T, Error>
    where
        F: FnOnce(&T, &Parser) -> Result<(), Error>,
    {
        let start = self.cursor;

        // closure workaround allows us to use `?` in the closure
        let compute = || {
            let value = T::parse(self)?;
            predicate(&value, self)?;
            Ok(value)
        };

        match compute() {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Attempts to parse a value from the given stream of tokens. All the tokens must be consumed
    /// by the parser (trailing whitespace is allowed); if not, an error is returned.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Error> {
        let value = T::parse(self)?;
        self.advance_past_whitespace();
        if self.cursor == self.tokens.len() {
            Ok(value)
        } else {
            let span = self.span().start..self.eof_span().end;
            Err(Error::new(vec![span], ExpectedEof))
        }
    }
}

/// Any type that can be parsed from a source of tokens.
pub trait Parse: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    ///
    /// This function should be used by consumers of the library.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

/// The associativity of a binary or unary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    /// The binary / unary operation is left-associative.
    ///
    /// For binary operations, this means `a op b op c` is evaluated as `(a op b) op c`. For unary
    /// operations, this means `a op op` is evaluated as `(a op) op` (the operators appear to the
    /// right of the operand).
    Left,

    /// The binary / unary operation is right-associative.
    ///
    /// For binary operations, this means `a op b op c` is evaluated as `a op (b op c)`. For unary
    /// operations, this means `op op a` is evaluated as `op (op a)` (the operators appear to the
    /// left of the operand).
    Right,
}

/// The precedence of an operation, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precedence {
    /// Any precedence.
    Any,

    /// Precedence of addition (`+`) and subtraction (`-`), which separate terms.
    Term,

    /// Precedence of multiplication (`*`), division (`/`), modulo (`%`), and implicit
    /// multiplication, which separate factors.
    Factor,

    /// Precedence of unary negation (`-`) and unary plus (`+`).
    Neg,

    /// Precedence of exponentiation (`^`).
    Exp,

    /// Precedence of factorial (`!`).
    Factorial,
}

impl PartialOrd for Precedence {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        let left = *self as u8;
        let right = *other as u8;
        left.partial_cmp(&right)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use ast::{
        binary::Binary,
        call::Call,
        expr::Expr,
        latex::{Frac, Root},
        literal::{Literal, LitFloat, LitInt, LitSym},
        paren::{Delimiter, Paren},
        unary::Unary,
    };
    use token::op::{BinOp, BinOpKind, UnaryOp, UnaryOpKind};

    fn int(value: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Int(LitInt { value: value.to_string(), span }))
    }

    fn sym(name: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Symbol(LitSym { name: name.to_string(), span }))
    }

    fn binary(lhs: Expr, kind: BinOpKind, implicit: bool, op_span: Range<usize>, rhs: Expr) -> Expr {
        let span = lhs.span().start..rhs.span().end;
        Expr::Binary(Binary {
            lhs: Box::new(lhs),
            op: BinOp { kind, implicit, span: op_span },
            rhs: Box::new(rhs),
            span,
        })
    }

    /// Parses the whole input and formats it back with every operation parenthesized.
    fn structure(input: &str) -> String {
        Parser::new(input).try_parse_full::<Expr>().unwrap().to_string()
    }

    #[test]
    fn literal_int() {
        let mut parser = Parser::new("16");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, int("16", 0..2));
    }

    #[test]
    fn literal_float() {
        let mut parser = Parser::new("3.14");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Literal(Literal::Float(LitFloat {
            value: "3.14".to_string(),
            span: 0..4,
        })));
    }

    #[test]
    fn subscripted_symbol() {
        let mut parser = Parser::new("x_{12}");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, sym("x_12", 0..6));
    }

    #[test]
    fn binary_left_associative() {
        let mut parser = Parser::new("x + y - 2");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, binary(
            binary(sym("x", 0..1), BinOpKind::Add, false, 2..3, sym("y", 4..5)),
            BinOpKind::Sub,
            false,
            6..7,
            int("2", 8..9),
        ));
    }

    #[test]
    fn binary_precedence() {
        assert_eq!(structure("1 + 2 * 3 + 4"), "((1 + (2 * 3)) + 4)");
        assert_eq!(structure("1 * 2 + 3 * 4"), "((1 * 2) + (3 * 4))");
        assert_eq!(structure("a / b % c"), "((a / b) % c)");
    }

    #[test]
    fn exponent_right_associative() {
        assert_eq!(structure("2 ^ 3 ^ 4"), "(2 ^ (3 ^ 4))");
        assert_eq!(structure("2 ** x * y"), "((2 ^ x) * y)");
    }

    #[test]
    fn implicit_multiplication() {
        let mut parser = Parser::new("2x");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, binary(int("2", 0..1), BinOpKind::Mul, true, 1..1, sym("x", 1..2)));
        assert_eq!(structure("2x^2 + 3(x + 1)"), "((2 * (x ^ 2)) + (3 * ((x + 1))))");
        assert_eq!(structure("a b c"), "((a * b) * c)");
    }

    #[test]
    fn unknown_names_multiply_single_groups() {
        assert_eq!(structure("x(y + 1)"), "(x * ((y + 1)))");
        assert_eq!(structure("f(x) + f(x, y)"), "((f * (x)) + f(x, y))");
        assert_eq!(structure("sin(x)"), "sin(x)");
    }

    #[test]
    fn long_chains_drop_without_overflow() {
        let input = vec!["x"; 200_000].join(" + ");
        let expr = Parser::new(&input).try_parse_full::<Expr>().unwrap();
        assert_eq!(expr.span(), 0..input.len());
        drop(expr);

        let input = vec!["x"; 200_000].join(" ");
        assert!(Parser::new(&input).try_parse_full::<Expr>().is_ok());
    }

    #[test]
    fn unary_operators() {
        let mut parser = Parser::new("-x");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Unary(Unary {
            operand: Box::new(sym("x", 1..2)),
            op: UnaryOp { kind: UnaryOpKind::Neg, span: 0..1 },
            span: 0..2,
        }));
        assert_eq!(structure("-x^2"), "(-(x ^ 2))");
        assert_eq!(structure("2^-1"), "(2 ^ (-1))");
        assert_eq!(structure("n!^2"), "((n!) ^ 2)");
        assert_eq!(structure("x - -y"), "(x - (-y))");
    }

    #[test]
    fn function_calls() {
        let mut parser = Parser::new("sin(x)");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Call(Call {
            name: LitSym { name: "sin".to_string(), span: 0..3 },
            args: vec![sym("x", 4..5)],
            span: 0..6,
        }));
        assert_eq!(structure("f(x, y)"), "f(x, y)");
        assert_eq!(structure("x(y + 1)"), "(x * ((y + 1)))");
    }

    #[test]
    fn latex_commands() {
        assert_eq!(structure(r"\frac{1}{2}x"), r"(\frac{1}{2} * x)");
        assert_eq!(structure(r"\sqrt{x} + \sqrt[3]{y}"), r"(\sqrt{x} + \sqrt[3]{y})");
        assert_eq!(structure(r"2 \cdot \pi \times r"), "((2 * pi) * r)");
        assert_eq!(structure(r"\sin^2 x + \cos\left(x\right)"), "((sin(x) ^ 2) + cos(x))");
        assert_eq!(structure(r"x^{2 y}"), "(x ^ {(2 * y)})");
    }

    #[test]
    fn frac_and_root_nodes() {
        let mut parser = Parser::new(r"\sqrt[n]{x}");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Root(Root {
            index: Some(Box::new(sym("n", 6..7))),
            radicand: Box::new(sym("x", 9..10)),
            span: 0..11,
        }));

        let mut parser = Parser::new(r"\frac{a}{b}");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, Expr::Frac(Frac {
            numerator: Box::new(sym("a", 6..7)),
            denominator: Box::new(sym("b", 9..10)),
            span: 0..11,
        }));
    }

    #[test]
    fn braces_group() {
        let mut parser = Parser::new("{x}");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Paren(Paren {
            expr: Box::new(sym("x", 1..2)),
            delimiter: Delimiter::Curly,
            span: 0..3,
        }));
    }

    #[test]
    fn trailing_whitespace() {
        assert_eq!(structure("x + 1   "), "(x + 1)");
    }

    #[test]
    fn unclosed_parenthesis() {
        let mut parser = Parser::new("(x + 1");
        let err = parser.try_parse_full::<Expr>().unwrap_err();

        assert_eq!(err.spans, vec![0..1]);
        assert_eq!(err.kind.message(), "unclosed parenthesis");
    }

    #[test]
    fn empty_parenthesis() {
        let mut parser = Parser::new("2 * ()");
        let err = parser.try_parse_full::<Expr>().unwrap_err();

        assert_eq!(err.kind.message(), "missing expression inside parenthesis");
    }

    #[test]
    fn unexpected_eof() {
        let mut parser = Parser::new("x +");
        let err = parser.try_parse_full::<Expr>().unwrap_err();

        assert_eq!(err.kind.message(), "unexpected end of input");
    }

    #[test]
    fn expected_eof() {
        let mut parser = Parser::new("x + y )");
        let err = parser.try_parse_full::<Expr>().unwrap_err();

        assert_eq!(err.spans, vec![6..7]);
        assert_eq!(err.kind.message(), "expected end of input");
    }

    #[test]
    fn unknown_symbol() {
        let mut parser = Parser::new("x + $");
        let err = parser.try_parse_full::<Expr>().unwrap_err();

        assert_eq!(err.spans, vec![4..5]);
        assert_eq!(err.kind.message(), "unexpected token");
    }

    #[test]
    fn nesting_limit() {
        let deep = format!("{}x{}", "(".repeat(MAX_NESTING * 2), ")".repeat(MAX_NESTING * 2));
        let mut parser = Parser::new(&deep);
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert!(err.fatal);
        assert_eq!(err.kind.message(), format!("expression is nested more than {} levels deep", MAX_NESTING));

        let shallow = format!("{}x{}", "(".repeat(20), ")".repeat(20));
        assert!(Parser::new(&shallow).try_parse_full::<Expr>().is_ok());
    }
}
