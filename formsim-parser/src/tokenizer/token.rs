use logos::Logos;
use std::ops::Range;

/// The different kinds of tokens that can be produced by the tokenizer.
///
/// Both plain infix notation (`2*x^2 + 1`) and a subset of LaTeX (`2 \cdot x^{2} + 1`) are
/// tokenized into the same kinds, so the parser does not need to distinguish between them.
#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    #[regex(r"[ \t\n\r]+")]
    Whitespace,

    /// LaTeX spacing commands, such as `\,` or `\quad`.
    #[regex(r"\\[,;:! ]")]
    #[token(r"\quad")]
    #[token(r"\qquad")]
    LatexSpace,

    /// LaTeX delimiter sizing commands, `\left` and `\right`. They only change how the following
    /// delimiter is typeset.
    #[token(r"\left")]
    #[token(r"\right")]
    Sizing,

    #[token("+")]
    Add,

    #[token("-")]
    Sub,

    #[token("*")]
    #[token(r"\cdot")]
    #[token(r"\times")]
    Mul,

    #[token("/")]
    #[token(r"\div")]
    Div,

    #[token("%")]
    Mod,

    #[token("^")]
    #[token("**")]
    Exp,

    #[token("!")]
    Factorial,

    #[token(",")]
    Comma,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token("{")]
    OpenCurly,

    #[token("}")]
    CloseCurly,

    #[token("[")]
    OpenSquare,

    #[token("]")]
    CloseSquare,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r"[0-9]+\.[0-9]*")]
    Float,

    /// A name with an optional subscript, such as `x`, `theta`, `x_1` or `x_{12}`.
    #[regex(r"[a-zA-Z]+(_([a-zA-Z0-9]|\{[a-zA-Z0-9]+\}))?")]
    Name,

    #[token(r"\frac")]
    #[token(r"\dfrac")]
    #[token(r"\tfrac")]
    Frac,

    #[token(r"\sqrt")]
    Sqrt,

    /// Any other LaTeX command, such as `\sin` or `\pi`.
    #[regex(r"\\[a-zA-Z]+")]
    Command,

    #[regex(r".", priority = 0)]
    Symbol,
}

impl TokenKind {
    /// Returns true if the token carries no meaning for the parser.
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::LatexSpace | TokenKind::Sizing)
    }
}

/// A token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'source> {
    /// The region of the source code that this token originated from.
    pub span: Range<usize>,

    /// The kind of token.
    pub kind: TokenKind,

    /// The raw lexeme that was parsed into this token.
    pub lexeme: &'source str,
}

impl Token<'_> {
    /// Returns true if the token carries no meaning for the parser.
    pub fn is_whitespace(&self) -> bool {
        self.kind.is_whitespace()
    }
}
