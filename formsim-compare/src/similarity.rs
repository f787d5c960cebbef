//! Structural similarity of two expression trees.
//!
//! The trees are aligned node by node, from the roots down. Each aligned pair of nodes earns
//! some credit out of a total:
//!
//! - A pair of fully equal subtrees counts as a single full match, `(1, 1)`, regardless of size.
//! - A leaf paired with a node of a different kind (symbol, constant or operator) counts as
//!   `(0, 1)`.
//! - Two leaves of the same kind with different values count as a half match, `(0.5, 1)`.
//! - Two operators count as `(1, 1)` if their tags are equal, or `(0, 1)` otherwise, plus the
//!   credit of their children, paired by position.
//!
//! When the operators have a different number of children, the [`ArityPolicy`] decides what
//! happens to the children with no counterpart.

use formsim_compute::tree::{Node, Operator};
use std::{fmt, ops::{Add, AddAssign}};

/// What to do with the children of the longer operator when two operators have a different
/// number of children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArityPolicy {
    /// Ignore them. `f(x, y)` and `f(x, y, z)` are 100% similar.
    #[default]
    Truncate,

    /// Count each one as a mismatch, `(0, 1)`. `f(x, y)` and `f(x, y, z)` are 75% similar.
    Penalize,
}

/// The credit earned by comparing two trees.
///
/// Matches are counted in halves, so that adding up scores is exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Similarity {
    half_matches: u64,
    total: u64,
}

impl Similarity {
    /// A full match, `(1, 1)`.
    pub const MATCH: Self = Self { half_matches: 2, total: 1 };

    /// A half match, `(0.5, 1)`.
    pub const HALF_MATCH: Self = Self { half_matches: 1, total: 1 };

    /// A mismatch, `(0, 1)`.
    pub const MISMATCH: Self = Self { half_matches: 0, total: 1 };

    /// Returns the number of matches. This is a multiple of `0.5`.
    pub fn matches(&self) -> f64 {
        self.half_matches as f64 / 2.0
    }

    /// Returns the number of matches, times two.
    pub fn half_matches(&self) -> u64 {
        self.half_matches
    }

    /// Returns the total number of aligned pairs that were scored.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Returns the score as a percentage between 0 and 100, or 0 if nothing was scored.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matches() / self.total as f64 * 100.0
        }
    }
}

impl Add for Similarity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            half_matches: self.half_matches + rhs.half_matches,
            total: self.total + rhs.total,
        }
    }
}

impl AddAssign for Similarity {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl fmt::Display for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}% ({} / {})", self.percentage(), self.matches(), self.total)
    }
}

/// Work left to do while comparing.
enum Frame<'a> {
    /// Compare the two nodes and push the result.
    Visit(&'a Node, &'a Node),

    /// Pop the results of the paired children of two operators, and push the result for the
    /// operators themselves.
    Combine {
        lhs: &'a Operator,
        rhs: &'a Operator,
    },
}

/// Scores a pair of nodes where at least one is a leaf.
fn compare_leaves(lhs: &Node, rhs: &Node) -> (bool, Similarity) {
    match (lhs, rhs) {
        (Node::Leaf(a), Node::Leaf(b)) if a == b => (true, Similarity::MATCH),
        _ if lhs.kind() == rhs.kind() => (false, Similarity::HALF_MATCH),
        _ => (false, Similarity::MISMATCH),
    }
}

/// Compares two trees with [`ArityPolicy::Truncate`].
pub fn similarity(lhs: &Node, rhs: &Node) -> Similarity {
    similarity_with(lhs, rhs, ArityPolicy::Truncate)
}

/// Compares two trees with the given arity policy.
///
/// The result is symmetric in the two trees, and its percentage is between 0 and 100.
pub fn similarity_with(lhs: &Node, rhs: &Node, policy: ArityPolicy) -> Similarity {
    let mut frames = vec![Frame::Visit(lhs, rhs)];

    // for each compared pair, whether the subtrees are equal, and their score
    let mut results: Vec<(bool, Similarity)> = Vec::new();

    while let Some(frame) = frames.pop() {
        match frame {
            Frame::Visit(Node::Operator(a), Node::Operator(b)) => {
                frames.push(Frame::Combine { lhs: a, rhs: b });
                frames.extend(a.children.iter().zip(&b.children).rev().map(|(a, b)| Frame::Visit(a, b)));
            },
            Frame::Visit(a, b) => results.push(compare_leaves(a, b)),
            Frame::Combine { lhs, rhs } => {
                let paired = lhs.children.len().min(rhs.children.len());
                let unpaired = lhs.children.len().abs_diff(rhs.children.len());
                let children = results.split_off(results.len() - paired);

                let tags_equal = lhs.tag == rhs.tag;
                let equal = tags_equal && unpaired == 0 && children.iter().all(|(equal, _)| *equal);
                if equal {
                    results.push((true, Similarity::MATCH));
                    continue;
                }

                let mut score = if tags_equal { Similarity::MATCH } else { Similarity::MISMATCH };
                for (_, child) in children {
                    score += child;
                }
                if policy == ArityPolicy::Penalize {
                    score.total += unpaired as u64;
                }
                results.push((false, score));
            },
        }
    }

    let score = results.pop().map_or_else(Similarity::default, |(_, score)| score);
    tracing::debug!(
        target: "similarity",
        half_matches = score.half_matches,
        total = score.total,
        ?policy,
        "compared trees",
    );
    score
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{
        afe_abs,
        afe_relative_error_msg,
        afe_is_relative_eq,
        assert_float_relative_eq,
    };
    use formsim_compute::tree::Tag;
    use pretty_assertions::assert_eq;
    use super::*;

    fn call(name: &str, children: Vec<Node>) -> Node {
        Node::operator(Tag::Call(name.to_string()), children)
    }

    fn x(n: usize) -> Node {
        Node::symbol(format!("x_{}", n))
    }

    #[test]
    fn equal_trees_are_one_match() {
        let tree = Node::operator(Tag::Add, vec![x(1), Node::operator(Tag::Mul, vec![Node::integer(2), x(2)])]);
        let score = similarity(&tree, &tree);
        assert_eq!(score, Similarity::MATCH);
        assert_float_relative_eq!(score.percentage(), 100.0);
    }

    #[test]
    fn mismatched_tag() {
        let a = Node::operator(Tag::Add, vec![x(1), x(2)]);
        let b = Node::operator(Tag::Mul, vec![x(1), x(2)]);
        let score = similarity(&a, &b);
        assert_eq!((score.matches(), score.total()), (2.0, 3));
        assert_float_relative_eq!(score.percentage(), 200.0 / 3.0);
    }

    #[test]
    fn constants_half_match() {
        let a = Node::operator(Tag::Mul, vec![Node::integer(2), x(1)]);
        let b = Node::operator(Tag::Mul, vec![Node::integer(3), x(1)]);
        let score = similarity(&a, &b);
        assert_eq!((score.matches(), score.total()), (2.5, 3));
        assert_float_relative_eq!(score.percentage(), 250.0 / 3.0);
    }

    #[test]
    fn leaf_against_other_kind() {
        assert_eq!(similarity(&x(1), &Node::integer(1)), Similarity::MISMATCH);
        assert_eq!(similarity(&x(1), &call("f", vec![x(1)])), Similarity::MISMATCH);
        assert_eq!(similarity(&x(1), &x(2)), Similarity::HALF_MATCH);
    }

    #[test]
    fn arity_policies() {
        let a = call("f", vec![x(1), x(2)]);
        let b = call("f", vec![x(1), x(2), x(3)]);

        let truncated = similarity_with(&a, &b, ArityPolicy::Truncate);
        assert_eq!((truncated.matches(), truncated.total()), (3.0, 3));

        let penalized = similarity_with(&a, &b, ArityPolicy::Penalize);
        assert_eq!((penalized.matches(), penalized.total()), (3.0, 4));
        assert_float_relative_eq!(penalized.percentage(), 75.0);

        assert_eq!(similarity_with(&b, &a, ArityPolicy::Penalize), penalized);
    }

    #[test]
    fn symmetric() {
        let a = Node::operator(Tag::Add, vec![x(1), Node::operator(Tag::Pow, vec![x(2), Node::integer(2)])]);
        let b = Node::operator(Tag::Add, vec![Node::integer(4), Node::operator(Tag::Mul, vec![x(1)])]);
        assert_eq!(similarity(&a, &b), similarity(&b, &a));
    }

    #[test]
    fn empty_score_is_zero_percent() {
        assert_eq!(Similarity::default().percentage(), 0.0);
    }

    #[test]
    fn display() {
        let score = Similarity::MATCH + Similarity::HALF_MATCH + Similarity::MATCH;
        assert_eq!(score.to_string(), "83.33% (2.5 / 3)");
    }
}
