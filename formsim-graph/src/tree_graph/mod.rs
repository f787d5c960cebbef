//! Drawing of expression trees.
//!
//! A [`TreeGraph`] lays out an expression tree with the root at the top and one row per level of
//! depth. Leaves are placed left to right in the order they appear in the formula, and each
//! operator is centered above its first and last child. The result is rendered with [`cairo`], and
//! can be written to a PNG file.
//!
//! ```no_run
//! use formsim_compute::tree::{Node, Tag};
//! use formsim_graph::TreeGraph;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tree = Node::operator(Tag::Add, vec![Node::symbol("x"), Node::integer(2)]);
//! TreeGraph::new(&tree).write_png("tree.png")?;
//! # Ok(())
//! # }
//! ```

pub mod opts;

use cairo::{Context, Error, Format, FontSlant, FontWeight, ImageSurface};
use formsim_compute::tree::{Node, NodeKind};
use std::{f64::consts::TAU, fs::File, path::Path};
use super::text_align::ShowTextAlign;
pub use opts::TreeGraphOptions;

/// A tree could not be rendered or saved.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Cairo failed to draw the tree.
    #[error("could not draw the tree: {0}")]
    Cairo(#[from] Error),

    /// Cairo failed to encode the image.
    #[error("could not encode the image: {0}")]
    Encode(#[from] cairo::IoError),

    /// The output file could not be created.
    #[error("could not create the output file: {0}")]
    Io(#[from] std::io::Error),
}

/// A node of the tree, with its place in the layout.
#[derive(Clone, Debug, PartialEq)]
pub struct LaidOutNode {
    /// The text drawn inside the node.
    pub label: String,

    /// Whether the node is an operator, symbol or constant.
    pub kind: NodeKind,

    /// The horizontal position, in units of leaves. Leaves are at whole numbers.
    pub column: f64,

    /// The distance from the root.
    pub depth: usize,

    /// The index of the parent in [`TreeGraph::nodes`].
    pub parent: Option<usize>,

    /// The indices of the children in [`TreeGraph::nodes`].
    pub children: Vec<usize>,
}

/// A laid out expression tree, ready to draw.
///
/// See the [module-level documentation](self) for more information.
#[derive(Clone, Debug)]
pub struct TreeGraph {
    /// The nodes of the tree, in pre-order. The root is at index 0.
    pub nodes: Vec<LaidOutNode>,

    /// The number of leaves, which is the number of columns of the layout.
    pub columns: usize,

    /// The number of levels of the layout.
    pub levels: usize,

    /// The rendering options.
    pub options: TreeGraphOptions,
}

impl TreeGraph {
    /// Lays out the tree with the default options.
    pub fn new(tree: &Node) -> TreeGraph {
        TreeGraph::with_opts(tree, TreeGraphOptions::default())
    }

    /// Lays out the tree with the given options.
    pub fn with_opts(tree: &Node, options: TreeGraphOptions) -> TreeGraph {
        let mut nodes: Vec<LaidOutNode> = Vec::new();
        let mut columns = 0;
        let mut levels = 0;

        // pre-order, so that leaves are met from left to right, and parents come before children
        let mut stack = vec![(tree, None, 0)];
        while let Some((node, parent, depth)) = stack.pop() {
            let idx = nodes.len();
            levels = levels.max(depth + 1);

            let label = match node {
                Node::Leaf(leaf) => leaf.to_string(),
                Node::Operator(op) => {
                    stack.extend(op.children.iter().rev().map(|child| (child, Some(idx), depth + 1)));
                    op.tag.to_string()
                },
            };

            // leaves, and operators with no operands, each take up the next free column
            let column = if node.children().is_empty() {
                columns += 1;
                (columns - 1) as f64
            } else {
                0.0
            };

            if let Some(parent) = parent {
                nodes[parent].children.push(idx);
            }
            nodes.push(LaidOutNode {
                label,
                kind: node.kind(),
                column,
                depth,
                parent,
                children: Vec::new(),
            });
        }

        // children always come after their parent, so walking backwards places every child first
        for idx in (0..nodes.len()).rev() {
            let (first, last) = match (nodes[idx].children.first(), nodes[idx].children.last()) {
                (Some(&first), Some(&last)) => (first, last),
                _ => continue,
            };
            nodes[idx].column = (nodes[first].column + nodes[last].column) / 2.0;
        }

        tracing::debug!(target: "graph", nodes = nodes.len(), columns, levels, "laid out tree");
        TreeGraph { nodes, columns, levels, options }
    }

    /// Returns the canvas coordinates of the center of the node at the given index.
    pub fn center(&self, idx: usize) -> (f64, f64) {
        let node = &self.nodes[idx];
        self.options.to_canvas(node.column, node.depth)
    }

    /// Creates an [`ImageSurface`] large enough for the tree and draws the tree to it.
    ///
    /// The resulting [`ImageSurface`] can be written to a file or manipulated further.
    pub fn draw(&self) -> Result<ImageSurface, Error> {
        let (width, height) = self.options.canvas_size(self.columns.max(1), self.levels.max(1));
        let surface = ImageSurface::create(
            Format::ARgb32,
            width.ceil() as i32,
            height.ceil() as i32,
        )?;
        let context = Context::new(&surface)?;

        let (r, g, b) = self.options.background_color;
        context.set_source_rgb(r, g, b);
        context.paint()?;

        context.select_font_face("sans-serif", FontSlant::Normal, FontWeight::Normal);
        context.set_font_size(self.options.font_size);

        self.draw_edges(&context)?;
        self.draw_nodes(&context)?;

        Ok(surface)
    }

    /// Draws the tree and writes it to a PNG file at the given path.
    pub fn write_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let surface = self.draw()?;
        let mut file = File::create(path.as_ref())?;
        surface.write_to_png(&mut file)?;
        tracing::debug!(target: "graph", path = %path.as_ref().display(), "wrote tree image");
        Ok(())
    }

    /// Draws a line from each node to each of its children.
    fn draw_edges(&self, context: &Context) -> Result<(), Error> {
        let (r, g, b) = self.options.ink_color;
        context.set_source_rgb(r, g, b);
        context.set_line_width(2.0);

        for (idx, node) in self.nodes.iter().enumerate() {
            let from = self.center(idx);
            for &child in &node.children {
                let to = self.center(child);
                context.move_to(from.0, from.1);
                context.line_to(to.0, to.1);
            }
        }
        context.stroke()
    }

    /// Draws each node as a filled circle with its label in the middle.
    fn draw_nodes(&self, context: &Context) -> Result<(), Error> {
        for (idx, node) in self.nodes.iter().enumerate() {
            let (x, y) = self.center(idx);
            let fill = match node.kind {
                NodeKind::Operator => self.options.operator_color,
                NodeKind::Symbol | NodeKind::Constant => self.options.leaf_color,
            };

            context.new_path();
            context.arc(x, y, self.options.node_radius, 0.0, TAU);
            context.set_source_rgb(fill.0, fill.1, fill.2);
            context.fill_preserve()?;

            let (r, g, b) = self.options.ink_color;
            context.set_source_rgb(r, g, b);
            context.set_line_width(1.5);
            context.stroke()?;

            context.show_text_align(&node.label, (x, y), (0.5, 0.5))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use formsim_compute::tree::Tag;
    use pretty_assertions::assert_eq;
    use super::*;

    fn columns(graph: &TreeGraph) -> Vec<(String, f64, usize)> {
        graph.nodes.iter()
            .map(|node| (node.label.clone(), node.column, node.depth))
            .collect()
    }

    #[test]
    fn leaves_left_to_right() {
        // x + 2 * y
        let tree = Node::operator(Tag::Add, vec![
            Node::symbol("x"),
            Node::operator(Tag::Mul, vec![Node::integer(2), Node::symbol("y")]),
        ]);
        let graph = TreeGraph::new(&tree);

        assert_eq!(columns(&graph), vec![
            ("+".to_string(), 1.0, 0),
            ("x".to_string(), 0.0, 1),
            ("*".to_string(), 1.5, 1),
            ("2".to_string(), 1.0, 2),
            ("y".to_string(), 2.0, 2),
        ]);
        assert_eq!(graph.columns, 3);
        assert_eq!(graph.levels, 3);
        assert_eq!(graph.nodes[0].children, vec![1, 2]);
        assert_eq!(graph.nodes[4].parent, Some(2));
    }

    #[test]
    fn single_leaf() {
        let graph = TreeGraph::new(&Node::symbol("x"));
        assert_eq!(columns(&graph), vec![("x".to_string(), 0.0, 0)]);
        assert_eq!(graph.columns, 1);
    }

    #[test]
    fn call_without_arguments() {
        // f() + x
        let tree = Node::operator(Tag::Add, vec![
            Node::operator(Tag::Call("f".to_string()), vec![]),
            Node::symbol("x"),
        ]);
        let graph = TreeGraph::new(&tree);
        assert_eq!(columns(&graph), vec![
            ("+".to_string(), 0.5, 0),
            ("f".to_string(), 0.0, 1),
            ("x".to_string(), 1.0, 1),
        ]);
        assert_eq!(graph.columns, 2);
    }

    #[test]
    fn deep_tree_layout() {
        let mut tree = Node::symbol("x");
        for _ in 0..10_000 {
            tree = Node::operator(Tag::Factorial, vec![tree]);
        }
        let graph = TreeGraph::new(&tree);
        assert_eq!(graph.levels, 10_001);
        assert!(graph.nodes.iter().all(|node| node.column == 0.0));
    }
}
