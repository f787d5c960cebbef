//! Algebraic manipulation of expressions.
//!
//! # Expression representation
//!
//! Algebraic expressions in this module are represented as a tree of [`SymExpr`] nodes. It's
//! similar to the [`Node`](crate::tree::Node) tree that formulas are compared on, with the main
//! difference being that [`SymExpr`] nodes **flatten** out the tree structure and are free to
//! reorder terms and factors.
//!
//! For example, the expression `x + (y + z)` is represented as a single [`SymExpr::Add`] node with
//! _three_ children, `x`, `y`, and `z`. This makes it easier to combine "like terms" (e.g.
//! `x + x = 2x`), since the terms in question are all at the same level in the tree.
//!
//! A [`Node`](crate::tree::Node) converts to a [`SymExpr`] with [`TryFrom`]. The conversion fails
//! for operators the simplifier cannot reason about, such as factorials.
//!
//! ```
//! use formsim_compute::symbolic::expr::{Primary, SymExpr};
//! use formsim_compute::tree::{Node, Tag};
//!
//! let tree = Node::operator(Tag::Add, vec![
//!     Node::symbol("x"),
//!     Node::operator(Tag::Add, vec![Node::symbol("y"), Node::symbol("z")]),
//! ]);
//!
//! let expr = SymExpr::try_from(&tree).unwrap();
//! assert_eq!(expr, SymExpr::Add(vec![
//!     SymExpr::Primary(Primary::Symbol("x".to_string())),
//!     SymExpr::Primary(Primary::Symbol("y".to_string())),
//!     SymExpr::Primary(Primary::Symbol("z".to_string())),
//! ]));
//! ```
//!
//! # Simplification
//!
//! Expressions are reduced with the [`simplify()`] function, which repeatedly applies a set of
//! rewrite rules until none of them apply. The rules are defined in [`simplify::rules`], and
//! cover combining like terms / factors, distributing multiplication over addition, basic power
//! rules, and expanding small powers of sums.
//!
//! ```
//! use formsim_compute::primitive::int;
//! use formsim_compute::symbolic::{expr::{Primary, SymExpr}, simplify};
//!
//! let x = SymExpr::Primary(Primary::Symbol("x".to_string()));
//! let simplified = simplify(&(x.clone() + x.clone() + x)).unwrap();
//!
//! // `x + x + x = 3x`
//! assert_eq!(simplified, SymExpr::Mul(vec![
//!     SymExpr::Primary(Primary::Integer(int(3))),
//!     SymExpr::Primary(Primary::Symbol("x".to_string())),
//! ]));
//! ```
//!
//! Simplification can fail: see [`SimplifyError`].

pub mod expr;
pub mod simplify;
pub mod step_collector;

pub use expr::SymExpr;
pub use simplify::{simplify, simplify_with, simplify_with_steps, SimplifyError, SimplifyOptions};
pub use step_collector::StepCollector;
