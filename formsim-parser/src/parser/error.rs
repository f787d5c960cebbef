//! Kinds of errors that can occur while parsing a formula.

use ariadne::Fmt;
use formsim_attrs::ErrorKind;
use formsim_error::EXPR;
use crate::tokenizer::TokenKind;

pub use formsim_error::Error;

/// An intentionally useless error. This should only be used for non-fatal errors, as it contains
/// no useful information.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "an internal non-fatal error occurred while parsing",
    labels = ["here"],
    help = "you should never see this error; please report this as a bug"
)]
pub struct NonFatal;

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of input",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of input",
    labels = [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
)]
pub struct ExpectedEof;

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected token",
    labels = [format!("expected one of: {}", expected.iter().map(|t| format!("{:?}", t)).collect::<Vec<_>>().join(", "))],
    help = format!("found {:?}", found),
)]
pub struct UnexpectedToken {
    /// The token(s) that were expected.
    pub expected: &'static [TokenKind],

    /// The token that was found.
    pub found: TokenKind,
}

/// A parenthesis, brace or bracket was not closed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = if *close == ')' { "unclosed parenthesis".to_string() } else { format!("unclosed `{}`", open) },
    labels = [format!("this `{}` is not closed", open)],
    help = format!("add a closing `{}` somewhere after this", close),
)]
pub struct UnclosedParenthesis {
    /// The opening delimiter.
    pub open: char,

    /// The closing delimiter that was expected.
    pub close: char,
}

/// There was no expression inside a pair of parentheses.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing expression inside parenthesis",
    labels = ["add an expression here"],
)]
pub struct EmptyParenthesis;

/// A LaTeX command that needs an argument was not given one.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("missing argument for `{}`", command),
    labels = ["this command needs an argument"],
    help = format!("write the argument in braces, such as `{}{{x}}`", command),
)]
pub struct MissingArgument {
    /// The command missing an argument.
    pub command: String,
}

/// The formula is nested too deeply to be parsed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("expression is nested more than {} levels deep", limit),
    labels = ["the limit is reached here"],
    help = "try simplifying the formula by removing redundant parentheses",
)]
pub struct NestingTooDeep {
    /// The maximum nesting depth.
    pub limit: usize,
}
