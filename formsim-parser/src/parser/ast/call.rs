use crate::{
    parser::{
        ast::{
            binary::Binary,
            expr::Expr,
            literal::{Literal, LitSym},
            paren::Delimiter,
            unary::Unary,
        },
        error::{Error, MissingArgument, NonFatal, UnclosedParenthesis},
        token::{op::{BinOp, BinOpKind}, CloseParen, Command, Exp, Name, OpenParen},
        Parse,
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Names that are always parsed as a function call when followed by parentheses, and LaTeX
/// commands (without the backslash) that are parsed as a function applied to their argument.
pub const FUNCTIONS: &[&str] = &[
    "sin", "cos", "tan", "cot", "sec", "csc",
    "asin", "acos", "atan", "arcsin", "arccos", "arctan",
    "sinh", "cosh", "tanh",
    "exp", "ln", "log", "sqrt", "abs",
];

/// Returns true if the given name is a known function.
pub fn is_function(name: &str) -> bool {
    FUNCTIONS.contains(&name)
}

/// A function call, such as `sin(x)`, `f(x, y)` or `\sin x`.
///
/// A name that is not a known function is only parsed as a call when it is given more than one
/// argument; `x(y + 1)` is the implicit multiplication of `x` and `(y + 1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    /// The name of the function to call.
    pub name: LitSym,

    /// The arguments to the function.
    pub args: Vec<Expr>,

    /// The region of the source code that this function call was parsed from.
    pub span: Range<usize>,
}

impl Call {
    /// Returns the span of the function call.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns true if the parenthesized group starting at the cursor contains a comma outside of
    /// any nested group.
    fn group_has_comma(input: &Parser) -> bool {
        let mut depth = 0usize;
        for token in input.remaining() {
            match token.kind {
                TokenKind::OpenParen | TokenKind::OpenCurly | TokenKind::OpenSquare => depth += 1,
                TokenKind::CloseParen | TokenKind::CloseCurly | TokenKind::CloseSquare => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return false;
                    }
                },
                TokenKind::Comma if depth == 1 => return true,
                _ => {},
            }
        }
        false
    }

    /// Parses the comma-separated arguments of a call, starting at the opening parenthesis.
    /// Returns the arguments and the end of the closing parenthesis' span.
    fn parse_args(input: &mut Parser) -> Result<(Vec<Expr>, usize), Error> {
        let open_paren = input.try_parse::<OpenParen>()?;
        let args = input.try_parse_delimited::<Expr>(TokenKind::Comma)
            .map_err(|mut err| {
                err.fatal = true;
                err
            })?;
        let close_paren = input.try_parse::<CloseParen>()
            .map_err(|_| {
                let (open, close) = Delimiter::Paren.chars();
                Error::new_fatal(vec![open_paren.span.clone()], UnclosedParenthesis { open, close })
            })?;
        Ok((args, close_paren.span.end))
    }

    /// Parses a LaTeX function command, such as `\sin x`, `\ln(x)` or `\cos^2 \theta`. A command
    /// that is not a known function is parsed as a symbol, such as `\pi`.
    ///
    /// A power written directly after the command applies to the result of the call, so
    /// `\sin^2 x` is `(sin(x))^2`.
    pub fn parse_command(input: &mut Parser) -> Result<Expr, Error> {
        let command = input.try_parse::<Command>()?;
        let name = LitSym::from_lexeme(&command.lexeme, command.span.clone());
        if !is_function(&name.name) {
            return Ok(Expr::Literal(Literal::Symbol(name)));
        }

        let power = match input.try_parse::<Exp>() {
            Ok(caret) => Some((caret.span, Unary::parse_or_lower(input)?)),
            Err(_) => None,
        };

        let (args, end) = match input.peek_kind().and_then(Delimiter::opened_by) {
            Some(Delimiter::Paren) => Self::parse_args(input)?,
            Some(_) => {
                let group = input.nested(Unary::parse_postfix)?;
                let end = group.span().end;
                (vec![group], end)
            },
            None => {
                let operand = Unary::parse_or_lower(input)
                    .map_err(|err| if err.fatal {
                        err
                    } else {
                        Error::new_fatal(vec![command.span.clone()], MissingArgument {
                            command: command.lexeme.clone(),
                        })
                    })?;
                let (operand, _) = Binary::parse_expr(input, operand, Precedence::Exp)?;
                let end = operand.span().end;
                (vec![operand], end)
            },
        };

        let call = Expr::Call(Self {
            name,
            args,
            span: command.span.start..end,
        });

        Ok(match power {
            Some((caret_span, power)) => {
                let span = call.span().start..end;
                Expr::Binary(Binary {
                    lhs: Box::new(call),
                    op: BinOp { kind: BinOpKind::Exp, implicit: false, span: caret_span },
                    rhs: Box::new(power),
                    span,
                })
            },
            None => call,
        })
    }
}

impl Parse for Call {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = input.try_parse::<Name>()?;
        let name = LitSym::from_lexeme(&name.lexeme, name.span);
        if input.peek_kind() != Some(TokenKind::OpenParen) {
            return Err(input.error(NonFatal));
        }

        input.advance_past_whitespace();
        if !is_function(&name.name) && !Self::group_has_comma(input) {
            return Err(input.error(NonFatal));
        }

        let (args, end) = Self::parse_args(input)?;
        let span = name.span.start..end;
        Ok(Self { name, args, span })
    }
}

impl std::fmt::Display for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.name.fmt(f)?;
        write!(f, "(")?;
        if let Some((last, args)) = self.args.split_last() {
            for arg in args {
                arg.fmt(f)?;
                write!(f, ", ")?;
            }
            last.fmt(f)?;
        }
        write!(f, ")")
    }
}
