//! The expression tree that formulas are normalized and compared on.
//!
//! A [`Node`] is either a [`Leaf`] (a symbol or a numeric constant) or an [`Operator`] with a
//! [`Tag`] and an ordered list of children. Unlike [`SymExpr`](crate::symbolic::SymExpr), the
//! tree never reorders or merges operands: `y + x` and `x + y` are different trees, and two
//! operator nodes are only equal if their children are equal at the same positions.
//!
//! Trees are usually produced from the syntax tree of a parsed formula:
//!
//! ```
//! use formsim_compute::tree::{Node, Tag};
//! use formsim_parser::parser::{ast::Expr, Parser};
//!
//! let ast = Parser::new("x + 2y").try_parse_full::<Expr>().unwrap();
//! let tree = Node::try_from(&ast).unwrap();
//!
//! assert_eq!(tree, Node::operator(Tag::Add, vec![
//!     Node::symbol("x"),
//!     Node::operator(Tag::Mul, vec![Node::integer(2), Node::symbol("y")]),
//! ]));
//! assert_eq!(tree.to_string(), "x + 2 * y");
//! ```
//!
//! Equality, traversal, cloning and dropping are all done with an explicit stack, so arbitrarily
//! deep trees can be built, compared and cloned without overflowing the call stack. Formatting
//! with [`Display`](fmt::Display) or [`Debug`](fmt::Debug) recurses once per level, and is meant
//! for trees of the depth a parsed formula can have.

mod iter;
mod lower;

use formsim_parser::parser::Precedence;
use rug::{Float, Integer, Rational};
use std::{fmt, ops::Neg};

pub use iter::PreOrderIter;
pub use lower::InvalidNumber;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A numeric constant.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Number {
    /// An integer, such as `2` or `-144`.
    Integer(Integer),

    /// An exact fraction, such as `1/2`. The denominator is never `1`.
    Rational(Rational),

    /// A floating-point number, such as `3.14`.
    Float(Float),
}

impl Number {
    /// Creates a number from a [`Rational`], storing it as an [`Number::Integer`] if the
    /// denominator is `1`.
    pub fn from_rational(value: Rational) -> Self {
        if *value.denom() == 1 {
            Self::Integer(value.into_numer_denom().0)
        } else {
            Self::Rational(value)
        }
    }

    /// Returns true if the number is zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Integer(n) => n.is_zero(),
            Self::Rational(n) => *n == 0,
            Self::Float(n) => n.is_zero(),
        }
    }

    /// Returns true if the number is strictly less than zero.
    pub fn is_negative(&self) -> bool {
        match self {
            Self::Integer(n) => *n < 0,
            Self::Rational(n) => *n < 0,
            Self::Float(n) => *n < 0,
        }
    }
}

/// Numbers are compared by value, so `2`, `4/2` and `2.0` are all equal.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Rational(a), Self::Rational(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Integer(i), Self::Rational(r)) | (Self::Rational(r), Self::Integer(i)) => i == r,
            (Self::Integer(i), Self::Float(f)) | (Self::Float(f), Self::Integer(i)) => f == i,
            (Self::Rational(r), Self::Float(f)) | (Self::Float(f), Self::Rational(r)) => f == r,
        }
    }
}

impl Neg for Number {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Self::Integer(n) => Self::Integer(-n),
            Self::Rational(n) => Self::Rational(-n),
            Self::Float(n) => Self::Float(-n),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::Rational(n) => write!(f, "{}/{}", n.numer(), n.denom()),
            Self::Float(n) => write!(f, "{}", n.to_f64()),
        }
    }
}

/// A leaf of the expression tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Leaf {
    /// A variable, such as `x` or `alpha`. The name is the symbol's identity.
    Symbol(String),

    /// A numeric constant.
    Constant(Number),
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbol(name) => write!(f, "{}", name),
            Self::Constant(n) => n.fmt(f),
        }
    }
}

/// The operation performed by an [`Operator`] node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Tag {
    /// A sum of any number of terms.
    Add,

    /// A product of any number of factors.
    Mul,

    /// A power, with the children `[base, exponent]`.
    Pow,

    /// The factorial of a single operand.
    Factorial,

    /// The remainder of a division, with the children `[dividend, divisor]`.
    Mod,

    /// A call to the named function, with the arguments as children.
    Call(String),
}

impl Tag {
    /// Returns the precedence of the operation when it is written in infix form, or [`None`] if
    /// it is written like a function call.
    fn precedence(&self) -> Option<Precedence> {
        match self {
            Self::Add => Some(Precedence::Term),
            Self::Mul | Self::Mod => Some(Precedence::Factor),
            Self::Pow => Some(Precedence::Exp),
            Self::Factorial => Some(Precedence::Factorial),
            Self::Call(_) => None,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "+"),
            Self::Mul => write!(f, "*"),
            Self::Pow => write!(f, "^"),
            Self::Factorial => write!(f, "!"),
            Self::Mod => write!(f, "%"),
            Self::Call(name) => write!(f, "{}", name),
        }
    }
}

/// An internal node of the expression tree.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Operator {
    /// The operation.
    pub tag: Tag,

    /// The operands, in the order they were written.
    pub children: Vec<Node>,
}

/// Children are moved onto a flat stack before they are dropped, so dropping a deep tree does not
/// recurse.
impl Drop for Operator {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            if let Node::Operator(op) = &mut node {
                stack.append(&mut op.children);
            }
        }
    }
}

/// The kind of a [`Node`], used to decide how much credit a mismatched pair of nodes earns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Symbol,
    Constant,
    Operator,
}

/// A node of the expression tree.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Node {
    /// A symbol or a constant.
    Leaf(Leaf),

    /// An operation applied to an ordered list of children.
    Operator(Operator),
}

impl Node {
    /// Creates a symbol leaf.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Leaf(Leaf::Symbol(name.into()))
    }

    /// Creates an integer constant leaf.
    pub fn integer<T>(n: T) -> Self
    where
        Integer: From<T>,
    {
        Self::Leaf(Leaf::Constant(Number::Integer(Integer::from(n))))
    }

    /// Creates a constant leaf.
    pub fn constant(n: Number) -> Self {
        Self::Leaf(Leaf::Constant(n))
    }

    /// Creates an operator node.
    pub fn operator(tag: Tag, children: Vec<Node>) -> Self {
        Self::Operator(Operator { tag, children })
    }

    /// Returns the kind of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Leaf(Leaf::Symbol(_)) => NodeKind::Symbol,
            Self::Leaf(Leaf::Constant(_)) => NodeKind::Constant,
            Self::Operator(_) => NodeKind::Operator,
        }
    }

    /// Returns true if the node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// If the node is a symbol, returns its name.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Leaf(Leaf::Symbol(name)) => Some(name),
            _ => None,
        }
    }

    /// If the node is a constant, returns its value.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Leaf(Leaf::Constant(n)) => Some(n),
            _ => None,
        }
    }

    /// If the node is an operator, returns its tag.
    pub fn tag(&self) -> Option<&Tag> {
        match self {
            Self::Operator(op) => Some(&op.tag),
            Self::Leaf(_) => None,
        }
    }

    /// Returns the children of the node. Leaves have no children.
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Operator(op) => &op.children,
            Self::Leaf(_) => &[],
        }
    }

    /// Returns an iterator over the nodes of the tree in depth-first pre-order, visiting children
    /// from left to right.
    pub fn pre_order_iter(&self) -> PreOrderIter {
        PreOrderIter::new(self)
    }

    /// Returns the number of nodes in the tree.
    pub fn size(&self) -> usize {
        self.pre_order_iter().count()
    }

    /// Returns the number of levels in the tree. A single leaf has a depth of 1.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);
            stack.extend(node.children().iter().map(|child| (child, depth + 1)));
        }
        max
    }

    /// Returns the precedence of the node when it is written in infix form, or [`None`] if it
    /// never needs parentheses.
    fn precedence(&self) -> Option<Precedence> {
        match self {
            Self::Leaf(Leaf::Symbol(_)) => None,
            Self::Leaf(Leaf::Constant(n)) if n.is_negative() => Some(Precedence::Neg),
            Self::Leaf(Leaf::Constant(Number::Rational(_))) => Some(Precedence::Factor),
            Self::Leaf(Leaf::Constant(_)) => None,
            Self::Operator(op) => op.tag.precedence(),
        }
    }

    /// Returns true if `child` must be parenthesized when written as an operand of `parent`.
    fn needs_parens(parent: &Tag, child: &Node) -> bool {
        let (Some(parent_prec), Some(child_prec)) = (parent.precedence(), child.precedence()) else {
            return false;
        };

        match parent {
            Tag::Add => child_prec < parent_prec,
            Tag::Mul => child_prec < parent_prec
                || (child_prec == parent_prec && child.tag() != Some(&Tag::Mul)),
            Tag::Mod | Tag::Pow | Tag::Factorial => child_prec <= parent_prec,
            Tag::Call(_) => false,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, parent: &Tag) -> fmt::Result {
        if Self::needs_parens(parent, self) {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

/// Two nodes are equal if they have the same shape, equal leaves, and equal tags, with children
/// compared position by position.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((lhs, rhs)) = stack.pop() {
            match (lhs, rhs) {
                (Self::Leaf(lhs), Self::Leaf(rhs)) => {
                    if lhs != rhs {
                        return false;
                    }
                },
                (Self::Operator(lhs), Self::Operator(rhs)) => {
                    if lhs.tag != rhs.tag || lhs.children.len() != rhs.children.len() {
                        return false;
                    }
                    stack.extend(lhs.children.iter().zip(rhs.children.iter()));
                },
                _ => return false,
            }
        }
        true
    }
}

/// Work left to do while cloning a tree.
enum CloneFrame<'a> {
    Enter(&'a Node),
    Exit(&'a Operator),
}

/// Clones with an explicit stack, so that deep trees can be cloned.
impl Clone for Node {
    fn clone(&self) -> Self {
        let mut frames = vec![CloneFrame::Enter(self)];
        let mut output: Vec<Node> = Vec::new();

        while let Some(frame) = frames.pop() {
            match frame {
                CloneFrame::Enter(Self::Leaf(leaf)) => output.push(Self::Leaf(leaf.clone())),
                CloneFrame::Enter(Self::Operator(op)) => {
                    frames.push(CloneFrame::Exit(op));
                    frames.extend(op.children.iter().rev().map(CloneFrame::Enter));
                },
                CloneFrame::Exit(op) => {
                    let children = output.split_off(output.len() - op.children.len());
                    output.push(Self::operator(op.tag.clone(), children));
                },
            }
        }

        match output.pop() {
            Some(node) => node,
            None => unreachable!(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Self::Leaf(leaf) => return leaf.fmt(f),
            Self::Operator(op) => op,
        };

        match &op.tag {
            Tag::Add | Tag::Mul | Tag::Mod | Tag::Pow => {
                let separator = match op.tag {
                    Tag::Add => " + ",
                    Tag::Mul => " * ",
                    Tag::Mod => " % ",
                    _ => "^",
                };
                let mut iter = op.children.iter();
                if let Some(child) = iter.next() {
                    child.fmt_operand(f, &op.tag)?;
                    for child in iter {
                        write!(f, "{}", separator)?;
                        child.fmt_operand(f, &op.tag)?;
                    }
                }
                Ok(())
            },
            Tag::Factorial => {
                for child in &op.children {
                    child.fmt_operand(f, &op.tag)?;
                }
                write!(f, "!")
            },
            Tag::Call(name) => {
                write!(f, "{}(", name)?;
                let mut iter = op.children.iter();
                if let Some(arg) = iter.next() {
                    write!(f, "{}", arg)?;
                    for arg in iter {
                        write!(f, ", {}", arg)?;
                    }
                }
                write!(f, ")")
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::primitive::{float, int, rational};
    use super::*;

    /// Builds a chain of `depth` nested sums, `x + (x + (x + ...))`.
    fn deep_chain(depth: usize) -> Node {
        let mut node = Node::symbol("x");
        for _ in 0..depth {
            node = Node::operator(Tag::Add, vec![Node::symbol("x"), node]);
        }
        node
    }

    #[test]
    fn numbers_compare_by_value() {
        let two = Number::Integer(int(2));
        assert_eq!(two, Number::from_rational(rational(int(4), int(2)).unwrap()));
        assert_eq!(two, Number::Float(float(2)));
        assert_ne!(two, Number::Rational(rational(int(1), int(2)).unwrap()));
    }

    #[test]
    fn child_order_matters() {
        let a = Node::operator(Tag::Add, vec![Node::symbol("x"), Node::symbol("y")]);
        let b = Node::operator(Tag::Add, vec![Node::symbol("y"), Node::symbol("x")]);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn arity_matters() {
        let a = Node::operator(Tag::Call("f".to_string()), vec![Node::symbol("x")]);
        let b = Node::operator(Tag::Call("f".to_string()), vec![Node::symbol("x"), Node::symbol("y")]);
        assert_ne!(a, b);
    }

    #[test]
    fn size_and_depth() {
        let tree = Node::operator(Tag::Add, vec![
            Node::symbol("x"),
            Node::operator(Tag::Mul, vec![Node::integer(2), Node::symbol("y")]),
        ]);
        assert_eq!(tree.size(), 5);
        assert_eq!(tree.depth(), 3);
        assert_eq!(Node::symbol("x").depth(), 1);
    }

    #[test]
    fn pre_order() {
        let tree = Node::operator(Tag::Add, vec![
            Node::operator(Tag::Pow, vec![Node::symbol("a"), Node::integer(2)]),
            Node::symbol("b"),
        ]);
        let visited = tree.pre_order_iter()
            .map(|node| match node {
                Node::Leaf(leaf) => leaf.to_string(),
                Node::Operator(op) => op.tag.to_string(),
            })
            .collect::<Vec<_>>();
        assert_eq!(visited, vec!["+", "^", "a", "2", "b"]);
    }

    #[test]
    fn display_parenthesizes_operands() {
        let tree = Node::operator(Tag::Mul, vec![
            Node::integer(3),
            Node::operator(Tag::Add, vec![Node::symbol("x"), Node::integer(1)]),
            Node::operator(Tag::Pow, vec![
                Node::symbol("y"),
                Node::constant(Number::Rational(rational(int(1), int(2)).unwrap())),
            ]),
        ]);
        assert_eq!(tree.to_string(), "3 * (x + 1) * y^(1/2)");

        let tree = Node::operator(Tag::Factorial, vec![
            Node::operator(Tag::Add, vec![Node::symbol("n"), Node::integer(-1)]),
        ]);
        assert_eq!(tree.to_string(), "(n + -1)!");

        let tree = Node::operator(Tag::Call("f".to_string()), vec![Node::symbol("x"), Node::symbol("y")]);
        assert_eq!(tree.to_string(), "f(x, y)");
    }

    #[test]
    fn deep_trees_do_not_overflow() {
        let a = deep_chain(100_000);
        let b = deep_chain(100_000);
        assert!(a == b);
        assert_eq!(a.depth(), 100_001);
        assert_eq!(a.size(), 200_001);
    }

    #[test]
    fn deep_trees_clone() {
        let a = deep_chain(100_000);
        let b = a.clone();
        assert!(a == b);
        assert_eq!(b.depth(), 100_001);
    }
}
