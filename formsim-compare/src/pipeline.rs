//! The full comparison of two formulas, from source text to report.

use crate::{
    equivalence::equivalent_with,
    normalize::{normalize_with, Mapping, NormalizeOptions},
    parse,
    similarity::{similarity_with, ArityPolicy, Similarity},
    ParseError,
};
use formsim_compute::{
    symbolic::{simplify_with, SimplifyError, SimplifyOptions, SymExpr},
    tree::Node,
};
use std::fmt;
use thiserror::Error;

/// Options for [`compare_sources`] and [`compare_trees`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompareOptions {
    /// Options for renaming variables.
    pub normalize: NormalizeOptions,

    /// What to do with operators of different arity.
    pub arity: ArityPolicy,

    /// Limits on the simplifier.
    pub simplify: SimplifyOptions,
}

impl CompareOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the placeholder prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.normalize = self.normalize.prefix(prefix);
        self
    }

    /// Sets the arity policy.
    pub fn arity(mut self, arity: ArityPolicy) -> Self {
        self.arity = arity;
        self
    }

    /// Sets the simplifier's step limit.
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.simplify = self.simplify.max_steps(max_steps);
        self
    }
}

/// Which of the two formulas something refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "first formula"),
            Self::Second => write!(f, "second formula"),
        }
    }
}

/// Why two formulas could not be compared.
#[derive(Debug, Error)]
pub enum ComparisonError {
    /// One of the formulas could not be parsed.
    #[error("could not parse the {side}: {source}")]
    Parse {
        /// The formula that failed to parse.
        side: Side,

        /// The parser's error.
        #[source]
        source: ParseError,
    },

    /// Simplification failed, either while reporting the simplified forms or while checking
    /// equivalence.
    #[error("simplification failed: {0}")]
    Simplification(#[from] SimplifyError),
}

/// Everything computed for one of the two formulas.
#[derive(Debug, Clone)]
pub struct Formula {
    /// The tree produced by the parser.
    pub tree: Node,

    /// The tree, simplified.
    pub simplified: SymExpr,

    /// The tree with its variables renamed.
    pub normalized: Node,

    /// The names given to the variables.
    pub mapping: Mapping,
}

impl Formula {
    fn new(tree: Node, options: &CompareOptions) -> Result<Self, SimplifyError> {
        options.simplify.check_depth(tree.depth())?;
        let simplified = simplify_with(&SymExpr::try_from(&tree)?, &options.simplify)?;
        let (normalized, mapping) = normalize_with(&tree, &options.normalize);
        Ok(Self { tree, simplified, normalized, mapping })
    }
}

/// The result of comparing two formulas.
#[derive(Debug, Clone)]
pub struct Comparison {
    /// The first formula.
    pub first: Formula,

    /// The second formula.
    pub second: Formula,

    /// True if the difference of the normalized formulas simplifies to zero.
    pub equivalent: bool,

    /// The structural similarity of the normalized formulas.
    pub similarity: Similarity,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "equivalent: {}", if self.equivalent { "yes" } else { "no" })?;
        writeln!(f, "similarity: {}", self.similarity)?;
        for (side, formula) in [(Side::First, &self.first), (Side::Second, &self.second)] {
            writeln!(f, "{}:", side)?;
            writeln!(f, "  simplified: {}", formula.simplified)?;
            writeln!(f, "  normalized: {}", formula.normalized)?;
            writeln!(f, "  mapping: {}", formula.mapping)?;
        }
        Ok(())
    }
}

/// Compares two trees.
pub fn compare_trees(
    first: Node,
    second: Node,
    options: &CompareOptions,
) -> Result<Comparison, ComparisonError> {
    let first = Formula::new(first, options)?;
    let second = Formula::new(second, options)?;

    let equivalent = equivalent_with(&first.normalized, &second.normalized, &options.simplify)?;
    let similarity = similarity_with(&first.normalized, &second.normalized, options.arity);

    tracing::debug!(
        target: "compare",
        equivalent,
        percentage = similarity.percentage(),
        "compared formulas",
    );
    Ok(Comparison { first, second, equivalent, similarity })
}

/// Parses and compares two formulas.
///
/// Both formulas are parsed before anything else happens, so a syntax error in either one is
/// reported without doing any other work.
pub fn compare_sources(
    first: &str,
    second: &str,
    options: &CompareOptions,
) -> Result<Comparison, ComparisonError> {
    let first = parse(first)
        .map_err(|source| ComparisonError::Parse { side: Side::First, source })?;
    let second = parse(second)
        .map_err(|source| ComparisonError::Parse { side: Side::Second, source })?;
    compare_trees(first, second, options)
}
