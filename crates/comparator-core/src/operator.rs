//! Named operators with an explicitly declared arity.

use std::fmt;
use std::sync::Arc;

use crate::error::{ComparatorError, Result};

type OperatorFn = dyn Fn(&[&[f64]]) -> Vec<f64> + Send + Sync;

/// A pure function of `arity` channel slices.
///
/// Operators see one real-valued channel per argument (complex signals are
/// decomposed before the call) and return an array; scalar-valued operators
/// return a one-element vector.
#[derive(Clone)]
pub struct Operator {
    arity: usize,
    symmetric: bool,
    fun: Arc<OperatorFn>,
}

impl Operator {
    /// Operator over `arity` arguments. Arity 0 cannot be applied to any
    /// signal and is rejected.
    pub fn new<F>(arity: usize, fun: F) -> Result<Self>
    where
        F: Fn(&[&[f64]]) -> Vec<f64> + Send + Sync + 'static,
    {
        if arity == 0 {
            return Err(ComparatorError::UnknownArity {
                reason: "operators must take at least one argument".to_string(),
            });
        }
        Ok(Self {
            arity,
            symmetric: false,
            fun: Arc::new(fun),
        })
    }

    pub fn unary<F>(fun: F) -> Self
    where
        F: Fn(&[f64]) -> Vec<f64> + Send + Sync + 'static,
    {
        Self {
            arity: 1,
            symmetric: false,
            fun: Arc::new(move |args: &[&[f64]]| fun(args[0])),
        }
    }

    pub fn binary<F>(fun: F) -> Self
    where
        F: Fn(&[f64], &[f64]) -> Vec<f64> + Send + Sync + 'static,
    {
        Self {
            arity: 2,
            symmetric: false,
            fun: Arc::new(move |args: &[&[f64]]| fun(args[0], args[1])),
        }
    }

    /// Declare that argument order does not change the result.
    ///
    /// The engine still fills every ordering; symmetric operators are just
    /// evaluated once per unordered combination.
    #[must_use]
    pub fn symmetric(mut self) -> Self {
        self.symmetric = true;
        self
    }

    #[must_use]
    pub const fn arity(&self) -> usize {
        self.arity
    }

    #[must_use]
    pub const fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Apply to exactly `arity` arguments.
    pub fn call(&self, name: &str, args: &[&[f64]]) -> Result<Vec<f64>> {
        if args.len() != self.arity {
            return Err(ComparatorError::ArityMismatch {
                operator: name.to_string(),
                declared: self.arity,
                got: args.len(),
            });
        }
        Ok((self.fun)(args))
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("arity", &self.arity)
            .field("symmetric", &self.symmetric)
            .finish_non_exhaustive()
    }
}
