//! Expression trees and symbolic manipulation for formula comparison.
//!
//! The [`tree`] module defines the ordered [`Node`](tree::Node) tree that formulas are compared
//! on. Trees are lowered from the syntax tree produced by [`formsim_parser`], and keep the order
//! of their operands exactly as written.
//!
//! The [`symbolic`] module defines a flattened representation, [`SymExpr`](symbolic::SymExpr),
//! along with a rule-based simplifier used to decide whether two formulas are algebraically
//! equivalent.

pub mod primitive;
pub mod symbolic;
pub mod tree;
