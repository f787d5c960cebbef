/// An RGB color, with each component in the range `0.0` to `1.0`.
pub type Rgb = (f64, f64, f64);

/// Options to use when drawing a tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeGraphOptions {
    /// The radius of the circle drawn for each node, in pixels.
    ///
    /// The default value is `22.0`.
    pub node_radius: f64,

    /// The horizontal distance between two neighboring leaves, in pixels.
    ///
    /// The default value is `64.0`.
    pub horizontal_spacing: f64,

    /// The vertical distance between a node and its children, in pixels.
    ///
    /// The default value is `80.0`.
    pub level_height: f64,

    /// The empty space around the tree, in pixels.
    ///
    /// The default value is `16.0`.
    pub padding: f64,

    /// The font size of the node labels.
    ///
    /// The default value is `18.0`.
    pub font_size: f64,

    /// The fill color of operator nodes.
    ///
    /// The default value is light blue, `(0.68, 0.85, 0.90)`.
    pub operator_color: Rgb,

    /// The fill color of symbols and constants.
    ///
    /// The default value is light green, `(0.56, 0.93, 0.56)`.
    pub leaf_color: Rgb,

    /// The color of the background.
    ///
    /// The default value is white.
    pub background_color: Rgb,

    /// The color of the edges, node outlines and labels.
    ///
    /// The default value is `(0.15, 0.15, 0.15)`.
    pub ink_color: Rgb,
}

/// The default options for a tree. Returns a [`TreeGraphOptions`] with the following values:
///
/// - [`node_radius`](TreeGraphOptions::node_radius): `22.0`
/// - [`horizontal_spacing`](TreeGraphOptions::horizontal_spacing): `64.0`
/// - [`level_height`](TreeGraphOptions::level_height): `80.0`
/// - [`padding`](TreeGraphOptions::padding): `16.0`
/// - [`font_size`](TreeGraphOptions::font_size): `18.0`
impl Default for TreeGraphOptions {
    fn default() -> TreeGraphOptions {
        TreeGraphOptions {
            node_radius: 22.0,
            horizontal_spacing: 64.0,
            level_height: 80.0,
            padding: 16.0,
            font_size: 18.0,
            operator_color: (0.68, 0.85, 0.90),
            leaf_color: (0.56, 0.93, 0.56),
            background_color: (1.0, 1.0, 1.0),
            ink_color: (0.15, 0.15, 0.15),
        }
    }
}

impl TreeGraphOptions {
    /// Set the node radius. Returns an updated [`TreeGraphOptions`] for chaining.
    pub fn node_radius(mut self, node_radius: f64) -> Self {
        self.node_radius = node_radius;
        self
    }

    /// Set the horizontal spacing. Returns an updated [`TreeGraphOptions`] for chaining.
    pub fn horizontal_spacing(mut self, horizontal_spacing: f64) -> Self {
        self.horizontal_spacing = horizontal_spacing;
        self
    }

    /// Set the level height. Returns an updated [`TreeGraphOptions`] for chaining.
    pub fn level_height(mut self, level_height: f64) -> Self {
        self.level_height = level_height;
        self
    }

    /// Set the padding. Returns an updated [`TreeGraphOptions`] for chaining.
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Set the font size. Returns an updated [`TreeGraphOptions`] for chaining.
    pub fn font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Set the operator and leaf colors. Returns an updated [`TreeGraphOptions`] for chaining.
    pub fn node_colors(mut self, operator_color: Rgb, leaf_color: Rgb) -> Self {
        self.operator_color = operator_color;
        self.leaf_color = leaf_color;
        self
    }

    /// Set the background and ink colors. Returns an updated [`TreeGraphOptions`] for chaining.
    pub fn colors(mut self, background_color: Rgb, ink_color: Rgb) -> Self {
        self.background_color = background_color;
        self.ink_color = ink_color;
        self
    }

    /// Converts a layout position, given as a column (in units of leaves) and a depth, to canvas
    /// coordinates of the node's center.
    pub fn to_canvas(&self, column: f64, depth: usize) -> (f64, f64) {
        (
            self.padding + (column + 0.5) * self.horizontal_spacing,
            self.padding + (depth as f64 + 0.5) * self.level_height,
        )
    }

    /// Returns the canvas size needed for a layout with the given number of columns and levels.
    pub fn canvas_size(&self, columns: usize, levels: usize) -> (f64, f64) {
        (
            2.0 * self.padding + columns as f64 * self.horizontal_spacing,
            2.0 * self.padding + levels as f64 * self.level_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn canvas_coordinates() {
        let options = TreeGraphOptions::default()
            .horizontal_spacing(10.0)
            .level_height(20.0)
            .padding(5.0);
        assert_eq!(options.to_canvas(0.0, 0), (10.0, 15.0));
        assert_eq!(options.to_canvas(1.5, 2), (25.0, 55.0));
        assert_eq!(options.canvas_size(3, 2), (40.0, 50.0));
    }
}
