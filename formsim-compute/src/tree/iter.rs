use super::Node;

/// An iterator that traverses the tree in depth-first pre-order, visiting children from left to
/// right.
///
/// This iterator is created by [`Node::pre_order_iter`].
pub struct PreOrderIter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> PreOrderIter<'a> {
    pub fn new(node: &'a Node) -> Self {
        Self { stack: vec![node] }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}
