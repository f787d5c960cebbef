//! Structural and algebraic comparison of math formulas.
//!
//! A comparison takes two formulas through the following stages:
//!
//! 1. [`parse`] turns each formula into an expression tree.
//! 2. [`normalize`](normalize::normalize) renames the variables of each tree to `x_1`, `x_2`,
//!    ..., so that formulas that only differ in variable names look the same.
//! 3. [`similarity`](similarity::similarity) scores how much of the two normalized trees lines
//!    up, node by node.
//! 4. [`equivalent`](equivalence::equivalent) decides whether the difference of the normalized
//!    trees simplifies to zero.
//!
//! [`compare_sources`] runs all of them and collects the results in a [`Comparison`].
//!
//! ```
//! use formsim_compare::{compare_sources, CompareOptions};
//!
//! let comparison = compare_sources("x + y", "a + b", &CompareOptions::default()).unwrap();
//! assert!(comparison.equivalent);
//! assert_eq!(comparison.similarity.percentage(), 100.0);
//! assert_eq!(comparison.first.normalized.to_string(), "x_1 + x_2");
//! ```

pub mod equivalence;
pub mod normalize;
pub mod pipeline;
pub mod similarity;

pub use equivalence::{equivalent, equivalent_with};
pub use normalize::{normalize, normalize_with, Mapping, NormalizeOptions, Normalizer};
pub use pipeline::{compare_sources, compare_trees, CompareOptions, Comparison, ComparisonError, Formula, Side};
pub use similarity::{similarity, similarity_with, ArityPolicy, Similarity};

use formsim_compute::tree::Node;
use formsim_error::Error;
use formsim_parser::parser::{ast::Expr, Parser};
use std::io;

/// A formula could not be turned into an expression tree.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ParseError(#[from] Error);

impl ParseError {
    /// Returns the underlying error, with its spans.
    pub fn error(&self) -> &Error {
        &self.0
    }

    /// Writes the error report, rendered against the formula, to the given writer.
    pub fn write_report<W: io::Write>(&self, src_id: &str, input: &str, writer: W) -> io::Result<()> {
        self.0.write_report(src_id, input, writer)
    }

    /// Prints the error report, rendered against the formula, to stderr.
    pub fn report_to_stderr(&self, src_id: &str, input: &str) -> io::Result<()> {
        self.0.report_to_stderr(src_id, input)
    }
}

/// Parses a formula into an expression tree.
pub fn parse(input: &str) -> Result<Node, ParseError> {
    let ast = Parser::new(input).try_parse_full::<Expr>()?;
    let tree = Node::try_from(&ast)?;
    tracing::debug!(target: "parse", input, %tree, "parsed formula");
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors() {
        assert!(parse("x +").is_err());
        assert!(parse("(x + 1").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn parse_long_sum() {
        let tree = parse(&vec!["x"; 200_000].join(" + ")).unwrap();
        assert_eq!(tree.children().len(), 200_000);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn parse_tree() {
        assert_eq!(parse("2x + 1").unwrap().to_string(), "2 * x + 1");
    }
}
