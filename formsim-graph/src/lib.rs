pub mod tree_graph;
mod text_align;

pub use tree_graph::{RenderError, TreeGraph, TreeGraphOptions};
