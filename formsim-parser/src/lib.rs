//! Parser for mathematical formulas written in plain infix notation (`2*x^2 + 1`) or in a subset
//! of LaTeX (`2 \cdot x^{2} + \frac{1}{2}`).
//!
//! Parsing produces a spanned [`Expr`] syntax tree. Errors carry the spans of the offending
//! source and render to user-facing reports through [`formsim_error`].
//!
//! ```
//! use formsim_parser::parser::{ast::Expr, Parser};
//!
//! let expr = Parser::new(r"\frac{x}{2} + y^2").try_parse_full::<Expr>().unwrap();
//! assert_eq!(expr.to_string(), r"(\frac{x}{2} + (y ^ 2))");
//! ```
//!
//! [`Expr`]: parser::ast::Expr

pub mod parser;
pub mod tokenizer;
