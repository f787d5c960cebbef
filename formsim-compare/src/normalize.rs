//! Renaming of variables to sequential placeholders.
//!
//! Two formulas that differ only in the names of their variables, such as `x + y` and `a + b`,
//! normalize to the same tree. Every distinct symbol is replaced by `x_1`, `x_2`, ..., numbered in
//! the order the symbols are first encountered in a left-to-right, pre-order traversal.
//!
//! ```
//! use formsim_compare::normalize::normalize;
//! use formsim_compute::tree::{Node, Tag};
//!
//! let tree = Node::operator(Tag::Add, vec![Node::symbol("b"), Node::symbol("a"), Node::symbol("b")]);
//! let (normalized, mapping) = normalize(&tree);
//!
//! assert_eq!(normalized.to_string(), "x_1 + x_2 + x_1");
//! assert_eq!(mapping.get("a"), Some("x_2"));
//! ```
//!
//! Commutative operators are not reordered, so `a + b` and `b + a` normalize to the same tree,
//! but `a + 2` and `2 + a` do not.

use formsim_compute::tree::{Leaf, Node, Operator};
use std::{collections::HashMap, fmt};

/// Options for [`normalize_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalizeOptions {
    /// The name placeholders start with, before the `_` and the counter.
    ///
    /// The default is `x`.
    pub prefix: String,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self { prefix: "x".to_string() }
    }
}

impl NormalizeOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the placeholder prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

/// The placeholder assigned to each original symbol name, in first-encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    pairs: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl Mapping {
    /// Returns the placeholder assigned to the given original name.
    pub fn get(&self, original: &str) -> Option<&str> {
        self.index.get(original).map(|&i| self.pairs[i].1.as_str())
    }

    /// Returns the `(original, placeholder)` pairs, in the order the originals were encountered.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(original, placeholder)| (original.as_str(), placeholder.as_str()))
    }

    /// Returns the number of distinct symbols.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if the tree had no symbols.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.iter();
        if let Some((original, placeholder)) = iter.next() {
            write!(f, "{} -> {}", original, placeholder)?;
            for (original, placeholder) in iter {
                write!(f, ", {} -> {}", original, placeholder)?;
            }
        }
        Ok(())
    }
}

/// Work left to do for one node of the input tree.
enum Frame<'a> {
    /// Normalize the node and push the result.
    Enter(&'a Node),

    /// Pop the normalized children of the operator, and push the rebuilt operator.
    Exit(&'a Operator),
}

/// The state of a single normalization: the placeholder counter and the mapping built so far.
///
/// A [`Normalizer`] is created for each call to [`normalize_with`] and consumed by it, so two
/// normalizations never share state.
#[derive(Debug)]
pub struct Normalizer<'a> {
    options: &'a NormalizeOptions,
    mapping: Mapping,
}

impl<'a> Normalizer<'a> {
    /// Creates a normalizer with an empty mapping.
    pub fn new(options: &'a NormalizeOptions) -> Self {
        Self {
            options,
            mapping: Mapping::default(),
        }
    }

    /// Returns the placeholder for the given name, assigning the next one if the name is new.
    fn placeholder(&mut self, name: &str) -> String {
        if let Some(placeholder) = self.mapping.get(name) {
            return placeholder.to_string();
        }

        let placeholder = format!("{}_{}", self.options.prefix, self.mapping.len() + 1);
        self.mapping.index.insert(name.to_string(), self.mapping.pairs.len());
        self.mapping.pairs.push((name.to_string(), placeholder.clone()));
        placeholder
    }

    /// Normalizes the tree, returning the new tree and the mapping that was built.
    pub fn run(mut self, tree: &Node) -> (Node, Mapping) {
        let mut frames = vec![Frame::Enter(tree)];
        let mut output: Vec<Node> = Vec::new();

        while let Some(frame) = frames.pop() {
            match frame {
                Frame::Enter(Node::Leaf(Leaf::Symbol(name))) => {
                    output.push(Node::symbol(self.placeholder(name)));
                },
                Frame::Enter(Node::Leaf(leaf @ Leaf::Constant(_))) => {
                    output.push(Node::Leaf(leaf.clone()));
                },
                Frame::Enter(Node::Operator(op)) => {
                    frames.push(Frame::Exit(op));
                    // reversed, so that the first child is popped (and numbered) first
                    frames.extend(op.children.iter().rev().map(Frame::Enter));
                },
                Frame::Exit(op) => {
                    let children = output.split_off(output.len() - op.children.len());
                    output.push(Node::operator(op.tag.clone(), children));
                },
            }
        }

        let normalized = output.pop().unwrap_or_else(|| tree.clone());
        tracing::debug!(
            target: "normalize",
            symbols = self.mapping.len(),
            nodes = tree.size(),
            "normalized tree",
        );
        (normalized, self.mapping)
    }
}

/// Normalizes the tree with the default options, placing `x_1`, `x_2`, ... in place of the
/// original symbols.
pub fn normalize(tree: &Node) -> (Node, Mapping) {
    normalize_with(tree, &NormalizeOptions::default())
}

/// Normalizes the tree with the given options.
pub fn normalize_with(tree: &Node, options: &NormalizeOptions) -> (Node, Mapping) {
    Normalizer::new(options).run(tree)
}
