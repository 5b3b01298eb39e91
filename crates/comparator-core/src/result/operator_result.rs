//! Result of applying one operator across every input combination.

use std::fmt;

use crate::error::{ComparatorError, Result};
use crate::result::node::Node;

/// Operator-result tree node: branches down to per-channel output arrays.
pub type OperatorNode = Node<Vec<f64>>;

/// What a positional lookup reached: a subtree, or one sample of a leaf array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection<'a> {
    Node(&'a OperatorNode),
    Sample(f64),
}

impl<'a> Selection<'a> {
    #[must_use]
    pub const fn node(self) -> Option<&'a OperatorNode> {
        match self {
            Self::Node(n) => Some(n),
            Self::Sample(_) => None,
        }
    }

    #[must_use]
    pub const fn sample(self) -> Option<f64> {
        match self {
            Self::Sample(x) => Some(x),
            Self::Node(_) => None,
        }
    }
}

/// Shape of an operator result as a plotting grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubplotDims {
    pub rows: usize,
    pub cols: usize,
    pub channels: usize,
}

/// One operator's nested output, with optional per-signal labels.
///
/// Addressable three ways:
/// - [`by_index`](Self::by_index): top-level slice for one input signal
/// - [`by_path`](Self::by_path): multi-level descent, e.g. `[i, j, channel, sample]`
/// - [`by_label`](Self::by_label): top-level slice by signal label
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorResult {
    name: String,
    root: OperatorNode,
    labels: Option<Vec<String>>,
}

impl OperatorResult {
    #[must_use]
    pub fn new(name: impl Into<String>, tree: Vec<OperatorNode>) -> Self {
        Self {
            name: name.into(),
            root: Node::Branch(tree),
            labels: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    /// Replace the labels. `None` clears them; otherwise exactly one label
    /// per top-level entry is required.
    pub fn set_labels(&mut self, labels: Option<Vec<String>>) -> Result<()> {
        match &labels {
            Some(l) if l.len() != self.len() => {
                return Err(ComparatorError::InvalidLabelAssignment {
                    expected: self.len(),
                    got: l.len(),
                });
            }
            _ => {}
        }
        self.labels = labels;
        Ok(())
    }

    /// Top-level nodes, one per input signal.
    #[must_use]
    pub fn result(&self) -> &[OperatorNode] {
        self.root.children()
    }

    /// The whole tree as a single branch node.
    #[must_use]
    pub const fn root(&self) -> &OperatorNode {
        &self.root
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.root.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OperatorNode> {
        self.result().iter()
    }

    pub fn by_index(&self, index: usize) -> Result<&OperatorNode> {
        self.root.get(index).ok_or(ComparatorError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    pub fn by_label(&self, label: &str) -> Result<&OperatorNode> {
        let pos = self
            .labels
            .as_ref()
            .and_then(|l| l.iter().position(|x| x == label))
            .ok_or_else(|| ComparatorError::LabelNotFound {
                label: label.to_string(),
            })?;
        self.by_index(pos)
    }

    /// Descend `path` level by level. Once a leaf array is reached the next
    /// index selects one sample and the descent stops; any remaining indices
    /// are ignored. An empty path selects the whole tree.
    pub fn by_path(&self, path: &[usize]) -> Result<Selection<'_>> {
        let (node, used) = self
            .root
            .descend(path)
            .map_err(|(index, len)| ComparatorError::IndexOutOfRange { index, len })?;
        match (node, path.get(used)) {
            (Node::Leaf(values), Some(&i)) => values
                .get(i)
                .copied()
                .map(Selection::Sample)
                .ok_or(ComparatorError::IndexOutOfRange {
                    index: i,
                    len: values.len(),
                }),
            _ => Ok(Selection::Node(node)),
        }
    }

    /// Operator arity: number of signal levels above the channel level.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.root.depth().saturating_sub(1)
    }

    /// Channels per leaf: 2 for complex-valued comparisons, 1 otherwise.
    #[must_use]
    pub fn complex_dim(&self) -> usize {
        fn channel_level(nodes: &[OperatorNode]) -> usize {
            match nodes.iter().find(|n| !n.is_empty_node()) {
                Some(Node::Leaf(_)) => nodes.len(),
                Some(Node::Branch(children)) => channel_level(children),
                _ => 0,
            }
        }
        channel_level(self.result())
    }

    #[must_use]
    pub fn is_complex(&self) -> bool {
        self.complex_dim() == 2
    }

    #[must_use]
    pub fn is_real(&self) -> bool {
        !self.is_complex()
    }

    /// Grid layout for a corner plot: one row per signal, one column per
    /// second argument (1 for unary operators), one panel per channel.
    pub fn subplot_dims(&self) -> Result<SubplotDims> {
        let cols = match self.arity() {
            1 => 1,
            2 => self.len(),
            arity => {
                return Err(ComparatorError::UnsupportedArity {
                    operator: self.name.clone(),
                    arity,
                });
            }
        };
        Ok(SubplotDims {
            rows: self.len(),
            cols,
            channels: self.complex_dim(),
        })
    }
}

impl<'a> IntoIterator for &'a OperatorResult {
    type Item = &'a OperatorNode;
    type IntoIter = std::slice::Iter<'a, OperatorNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn render_leaf(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|v| format!("{v}")).collect();
    format!("[{}]", items.join(", "))
}

impl fmt::Display for OperatorResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.labels {
            None => write!(f, "{}", self.root.render_with(&mut |v| render_leaf(v))),
            Some(labels) => {
                for (i, (label, node)) in labels.iter().zip(self.result()).enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    writeln!(f, "{label}:")?;
                    write!(f, "{}", node.render_with(&mut |v| render_leaf(v)))?;
                }
                Ok(())
            }
        }
    }
}
