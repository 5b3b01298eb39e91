//! Product reductions of one operator result, arranged in the same tree.

use std::fmt;

use crate::error::{ComparatorError, Result};
use crate::product::{ProductMap, ProductValue};
use crate::result::format::NumberFormat;
use crate::result::node::Node;

pub type ProductNode = Node<ProductMap>;

/// Tree of per-leaf product maps mirroring an [`OperatorResult`].
///
/// [`OperatorResult`]: crate::result::OperatorResult
#[derive(Debug, Clone, PartialEq)]
pub struct ProductResult {
    root: ProductNode,
    names: Vec<String>,
}

impl Default for ProductResult {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ProductResult {
    /// Wrap a product tree. Names are taken from the first populated leaf.
    #[must_use]
    pub fn new(tree: Vec<ProductNode>) -> Self {
        let root = Node::Branch(tree);
        let names = root
            .first_leaf()
            .map(|m| m.names().map(str::to_string).collect())
            .unwrap_or_default();
        Self { root, names }
    }

    #[must_use]
    pub fn product_names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    #[must_use]
    pub fn result(&self) -> &[ProductNode] {
        self.root.children()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.root.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Same-shaped result restricted to one product. Empty nodes stay empty.
    pub fn by_name(&self, name: &str) -> Result<Self> {
        if !self.contains(name) {
            return Err(ComparatorError::ProductNotFound(name.to_string()));
        }
        Ok(Self {
            root: self.root.filter_map(&mut |m| m.only(name)),
            names: vec![name.to_string()],
        })
    }

    /// Tree of bare values for one product.
    pub fn values(&self, name: &str) -> Result<Node<ProductValue>> {
        if !self.contains(name) {
            return Err(ComparatorError::ProductNotFound(name.to_string()));
        }
        Ok(self.root.filter_map(&mut |m| m.get(name).cloned()))
    }

    pub fn by_index(&self, index: usize) -> Result<&ProductNode> {
        self.root.get(index).ok_or(ComparatorError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Descend `path`, stopping at the first leaf or empty node.
    pub fn by_path(&self, path: &[usize]) -> Result<&ProductNode> {
        self.root
            .descend(path)
            .map(|(node, _)| node)
            .map_err(|(index, len)| ComparatorError::IndexOutOfRange { index, len })
    }

    /// Rows of bare values, one per top-level entry. Only defined when the
    /// result holds exactly one product.
    pub fn iter(&self) -> Result<std::vec::IntoIter<Node<ProductValue>>> {
        match self.names.as_slice() {
            [name] => {
                let Node::Branch(rows) = self.values(name)? else {
                    return Ok(Vec::new().into_iter());
                };
                Ok(rows.into_iter())
            }
            names => Err(ComparatorError::IllDefinedIteration {
                count: names.len(),
                names: names.to_vec(),
            }),
        }
    }

    #[must_use]
    pub fn complex_dim(&self) -> usize {
        fn channel_level(nodes: &[ProductNode]) -> usize {
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

    /// Nested-bracket text, one `name:` block per product.
    #[must_use]
    pub fn render(&self, format: NumberFormat) -> String {
        let blocks: Vec<String> = self
            .names
            .iter()
            .map(|name| {
                let body = self.root.render_with(&mut |m| {
                    m.get(name)
                        .map_or_else(|| "None".to_string(), |v| render_value(v, format))
                });
                format!("{name}:\n{body}")
            })
            .collect();
        blocks.join("\n")
    }
}

fn render_value(value: &ProductValue, format: NumberFormat) -> String {
    match value {
        ProductValue::Scalar(x) => format.format(*x),
        ProductValue::Tuple(v) => {
            let items: Vec<String> = v.iter().map(|x| format.format(*x)).collect();
            format!("({})", items.join(", "))
        }
    }
}

impl fmt::Display for ProductResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(NumberFormat::default()))
    }
}
