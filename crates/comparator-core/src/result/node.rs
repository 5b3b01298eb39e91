//! Tagged tree shared by both result containers.

/// One node of a result tree.
///
/// Operator results nest `arity` levels of `Branch` (one child per input
/// signal), then one `Branch` of channels, then `Leaf` arrays. `Empty` marks
/// a combination that was not evaluated; the engine itself never produces
/// one, but trees imported from elsewhere may.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<T> {
    Empty,
    Leaf(T),
    Branch(Vec<Node<T>>),
}

impl<T> Node<T> {
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    #[must_use]
    pub const fn is_empty_node(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub const fn as_leaf(&self) -> Option<&T> {
        match self {
            Self::Leaf(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn children(&self) -> &[Node<T>] {
        match self {
            Self::Branch(c) => c,
            _ => &[],
        }
    }

    /// Number of children (0 for leaves and empty nodes).
    #[must_use]
    pub fn len(&self) -> usize {
        self.children().len()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Node<T>> {
        self.children().get(index)
    }

    /// Follow `path` one level at a time, stopping early at a leaf or an
    /// empty node. Returns the node reached and how many indices were used.
    ///
    /// Fails with the first index that is out of range for its branch.
    pub fn descend(&self, path: &[usize]) -> Result<(&Node<T>, usize), (usize, usize)> {
        let mut node = self;
        for (used, &i) in path.iter().enumerate() {
            match node {
                Self::Branch(children) => {
                    node = children.get(i).ok_or((i, children.len()))?;
                }
                Self::Leaf(_) | Self::Empty => return Ok((node, used)),
            }
        }
        Ok((node, path.len()))
    }

    /// Number of `Branch` levels above the first reachable leaf.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Branch(children) => children
                .iter()
                .find(|c| !c.is_empty_node())
                .map_or(1, |c| 1 + c.depth()),
            _ => 0,
        }
    }

    /// First leaf in depth-first order, skipping empty nodes.
    #[must_use]
    pub fn first_leaf(&self) -> Option<&T> {
        match self {
            Self::Leaf(v) => Some(v),
            Self::Empty => None,
            Self::Branch(children) => children.iter().find_map(Node::first_leaf),
        }
    }

    /// All leaves in depth-first order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&T> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a T>) {
        match self {
            Self::Leaf(v) => out.push(v),
            Self::Empty => {}
            Self::Branch(children) => {
                for c in children {
                    c.collect_leaves(out);
                }
            }
        }
    }

    /// Same-shape tree with every leaf transformed by `f`.
    pub fn map<U>(&self, f: &mut impl FnMut(&T) -> U) -> Node<U> {
        match self {
            Self::Empty => Node::Empty,
            Self::Leaf(v) => Node::Leaf(f(v)),
            Self::Branch(children) => Node::Branch(children.iter().map(|c| c.map(f)).collect()),
        }
    }

    /// Like [`Node::map`], but `f` may turn a leaf into an empty node.
    pub fn filter_map<U>(&self, f: &mut impl FnMut(&T) -> Option<U>) -> Node<U> {
        match self {
            Self::Empty => Node::Empty,
            Self::Leaf(v) => f(v).map_or(Node::Empty, Node::Leaf),
            Self::Branch(children) => {
                Node::Branch(children.iter().map(|c| c.filter_map(f)).collect())
            }
        }
    }

    /// Nested-bracket text, leaves rendered by `leaf` and empty nodes as `None`.
    pub fn render_with(&self, leaf: &mut impl FnMut(&T) -> String) -> String {
        let mut out = String::new();
        self.render_into(&mut out, leaf);
        out
    }

    fn render_into(&self, out: &mut String, leaf: &mut impl FnMut(&T) -> String) {
        match self {
            Self::Empty => out.push_str("None"),
            Self::Leaf(v) => out.push_str(&leaf(v)),
            Self::Branch(children) => {
                out.push('[');
                for (i, c) in children.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    c.render_into(out, leaf);
                }
                out.push(']');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Node<u8> {
        Node::Branch(vec![
            Node::Branch(vec![Node::Leaf(1), Node::Leaf(2)]),
            Node::Branch(vec![Node::Empty, Node::Leaf(4)]),
        ])
    }

    #[test]
    fn descend_stops_at_leaf_and_empty() {
        let t = grid();
        assert_eq!(t.descend(&[0, 1]).unwrap(), (&Node::Leaf(2), 2));
        assert_eq!(t.descend(&[0, 1, 7, 7]).unwrap(), (&Node::Leaf(2), 2));
        assert_eq!(t.descend(&[1, 0, 0]).unwrap(), (&Node::Empty, 2));
        assert_eq!(t.descend(&[5]).unwrap_err(), (5, 2));
    }

    #[test]
    fn depth_and_leaves() {
        let t = grid();
        assert_eq!(t.depth(), 2);
        assert_eq!(t.leaves(), vec![&1, &2, &4]);
        assert_eq!(t.first_leaf(), Some(&1));
    }

    #[test]
    fn map_preserves_shape() {
        let t = grid().map(&mut |v| u32::from(*v) * 10);
        assert_eq!(t.descend(&[1, 1]).unwrap().0, &Node::Leaf(40));
        assert!(t.get(1).and_then(|r| r.get(0)).is_some_and(Node::is_empty_node));
    }

    #[test]
    fn filter_map_introduces_empty() {
        let t = grid().filter_map(&mut |v| (*v % 2 == 0).then_some(*v));
        assert_eq!(t.leaves(), vec![&2, &4]);
    }

    #[test]
    fn render_nested_brackets() {
        let text = grid().render_with(&mut |v| v.to_string());
        assert_eq!(text, "[[1, 2], [None, 4]]");
    }
}
