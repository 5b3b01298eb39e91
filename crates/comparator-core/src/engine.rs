//! Operator grid evaluation.
//!
//! An operator of arity `k` over `n` signals is evaluated on every ordered
//! `k`-tuple of signal indices (`n^k` combinations, diagonal included). Each
//! combination is evaluated channel by channel, so the tree nests `k` signal
//! levels, then one channel level, then the output array. Products are
//! derived at every leaf as soon as it is produced.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::Result;
use crate::operator::Operator;
use crate::product::{Product, get_products};
use crate::registry::Registry;
use crate::representation::Channel;
use crate::result::{Node, OperatorNode, ProductNode};

type Cell = (OperatorNode, ProductNode);

struct Grid<'a> {
    name: &'a str,
    operator: &'a Operator,
    decomposed: &'a [Vec<Channel>],
    products: &'a Registry<Product>,
    channels: usize,
    memo: HashMap<Vec<usize>, Cell>,
    evaluations: usize,
}

impl Grid<'_> {
    fn level(&mut self, chosen: &mut Vec<usize>) -> Result<Cell> {
        if chosen.len() == self.operator.arity() {
            return self.combination(chosen);
        }
        let mut ops = Vec::with_capacity(self.decomposed.len());
        let mut prods = Vec::with_capacity(self.decomposed.len());
        for i in 0..self.decomposed.len() {
            chosen.push(i);
            let (op, prod) = self.level(chosen)?;
            chosen.pop();
            ops.push(op);
            prods.push(prod);
        }
        Ok((Node::Branch(ops), Node::Branch(prods)))
    }

    /// One signal combination: the channel level and its leaves.
    fn combination(&mut self, chosen: &[usize]) -> Result<Cell> {
        let key = if self.operator.is_symmetric() {
            let mut k = chosen.to_vec();
            k.sort_unstable();
            Some(k)
        } else {
            None
        };
        if let Some(cell) = key.as_ref().and_then(|k| self.memo.get(k)) {
            return Ok(cell.clone());
        }

        let mut ops = Vec::with_capacity(self.channels);
        let mut prods = Vec::with_capacity(self.channels);
        for c in 0..self.channels {
            let args: Vec<&[f64]> = chosen
                .iter()
                .map(|&i| self.decomposed[i][c].data.as_slice())
                .collect();
            let out = self.operator.call(self.name, &args)?;
            prods.push(Node::Leaf(get_products(self.products, &out)?));
            ops.push(Node::Leaf(out));
        }
        self.evaluations += 1;
        trace!(operator = self.name, combination = ?chosen, "evaluated");

        let cell = (Node::Branch(ops), Node::Branch(prods));
        if let Some(k) = key {
            self.memo.insert(k, cell.clone());
        }
        Ok(cell)
    }
}

/// Evaluate `operator` over every ordered combination of the decomposed
/// signals and derive `products` for every leaf.
///
/// Returns the top-level operator and product nodes, one per signal. All
/// signals must decompose into the same number of channels.
pub fn operator_products(
    name: &str,
    operator: &Operator,
    decomposed: &[Vec<Channel>],
    products: &Registry<Product>,
) -> Result<(Vec<OperatorNode>, Vec<ProductNode>)> {
    let channels = decomposed.iter().map(Vec::len).min().unwrap_or(0);
    let mut grid = Grid {
        name,
        operator,
        decomposed,
        products,
        channels,
        memo: HashMap::new(),
        evaluations: 0,
    };
    let (ops, prods) = grid.level(&mut Vec::with_capacity(operator.arity()))?;
    debug!(
        operator = name,
        arity = operator.arity(),
        signals = decomposed.len(),
        channels,
        evaluations = grid.evaluations,
        "operator grid complete"
    );
    match (ops, prods) {
        (Node::Branch(ops), Node::Branch(prods)) => Ok((ops, prods)),
        _ => Ok((Vec::new(), Vec::new())),
    }
}
