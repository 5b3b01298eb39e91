//! Products: named reductions applied to every operator-result leaf.

use std::fmt;
use std::sync::Arc;

use crate::error::{ComparatorError, Result};
use crate::registry::Registry;

/// Output of one reduction: a scalar or a small fixed-size tuple.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductValue {
    Scalar(f64),
    Tuple(Vec<f64>),
}

impl ProductValue {
    #[must_use]
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(x) => Some(*x),
            Self::Tuple(_) => None,
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        match self {
            Self::Scalar(x) => std::slice::from_ref(x),
            Self::Tuple(v) => v,
        }
    }
}

impl From<f64> for ProductValue {
    fn from(x: f64) -> Self {
        Self::Scalar(x)
    }
}

impl From<Vec<f64>> for ProductValue {
    fn from(v: Vec<f64>) -> Self {
        Self::Tuple(v)
    }
}

type ProductFn = dyn Fn(&[f64]) -> std::result::Result<ProductValue, String> + Send + Sync;

/// A pure reduction over one channel of an operator result.
#[derive(Clone)]
pub struct Product {
    fun: Arc<ProductFn>,
}

impl Product {
    /// Infallible reduction returning a scalar or tuple.
    pub fn new<F, V>(fun: F) -> Self
    where
        F: Fn(&[f64]) -> V + Send + Sync + 'static,
        V: Into<ProductValue>,
    {
        Self {
            fun: Arc::new(move |v: &[f64]| Ok(fun(v).into())),
        }
    }

    /// Reduction that may reject its input; the message becomes the
    /// `reason` of [`ComparatorError::Product`].
    pub fn try_new<F>(fun: F) -> Self
    where
        F: Fn(&[f64]) -> std::result::Result<ProductValue, String> + Send + Sync + 'static,
    {
        Self { fun: Arc::new(fun) }
    }

    pub fn apply(&self, name: &str, values: &[f64]) -> Result<ProductValue> {
        (self.fun)(values).map_err(|reason| ComparatorError::Product {
            name: name.to_string(),
            reason,
        })
    }
}

impl fmt::Debug for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Product").finish_non_exhaustive()
    }
}

/// Product name → value for one leaf, in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductMap {
    entries: Vec<(String, ProductValue)>,
}

impl ProductMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ProductValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ProductValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProductValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy holding only `name`, or `None` if this leaf lacks it.
    #[must_use]
    pub fn only(&self, name: &str) -> Option<Self> {
        self.get(name).map(|v| Self {
            entries: vec![(name.to_string(), v.clone())],
        })
    }
}

impl<N: Into<String>> FromIterator<(N, ProductValue)> for ProductMap {
    fn from_iter<I: IntoIterator<Item = (N, ProductValue)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

/// Apply every registered product to `values`, in registration order.
///
/// The first failing reduction aborts the whole mapping.
pub fn get_products(products: &Registry<Product>, values: &[f64]) -> Result<ProductMap> {
    let mut out = ProductMap::new();
    for (name, product) in products.iter() {
        out.insert(name, product.apply(name, values)?);
    }
    Ok(out)
}
