use super::{Primary, SymExpr};

/// An iterator that iteratively traverses the tree of expressions in left-to-right post-order
/// (i.e. depth-first).
///
/// This iterator is created by [`SymExpr::post_order_iter`].
pub struct ExprIter<'a> {
    stack: Vec<&'a SymExpr>,
    last_visited: Option<&'a SymExpr>,
}

impl<'a> ExprIter<'a> {
    /// Creates a new iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn new(expr: &'a SymExpr) -> Self {
        Self {
            stack: vec![expr],
            last_visited: None,
        }
    }

    /// Pops the current expression in the stack and marks it as the last visited expression.
    fn visit(&mut self) -> Option<&'a SymExpr> {
        self.last_visited = Some(self.stack.pop()?);
        self.last_visited
    }

    /// Returns true if the last child in the slice was the last visited expression, or if there
    /// are no children at all.
    fn children_done(&self, children: &'a [SymExpr]) -> bool {
        children.last().map_or(true, |last| self.is_last_visited(last))
    }

    /// Returns true if the given expression matches the last visited expression.
    fn is_last_visited(&self, expr: &'a SymExpr) -> bool {
        match self.last_visited {
            Some(last_visited) => std::ptr::eq(last_visited, expr),
            None => false,
        }
    }
}

impl<'a> Iterator for ExprIter<'a> {
    type Item = &'a SymExpr;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let expr = *self.stack.last()?;
            match expr {
                SymExpr::Primary(Primary::Call(_, children))
                    | SymExpr::Add(children)
                    | SymExpr::Mul(children) => {
                    if self.children_done(children) {
                        return self.visit();
                    }
                    self.stack.extend(children.iter().rev());
                },
                SymExpr::Primary(_) => return self.visit(),
                SymExpr::Exp(lhs, rhs) => {
                    if self.is_last_visited(rhs) {
                        return self.visit();
                    }
                    self.stack.push(rhs);
                    self.stack.push(lhs);
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::primitive::int;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn post_order() {
        let x = SymExpr::Primary(Primary::Symbol("x".to_string()));
        let two = SymExpr::Primary(Primary::Integer(int(2)));
        let expr = SymExpr::Add(vec![
            SymExpr::Exp(Box::new(x.clone()), Box::new(two.clone())),
            SymExpr::Primary(Primary::Call("f".to_string(), vec![x.clone()])),
        ]);

        let visited = expr.post_order_iter().map(|e| e.to_string()).collect::<Vec<_>>();
        assert_eq!(visited, vec!["x", "2", "x^2", "x", "f(x)", "x^2 + f(x)"]);
    }
}
