//! Error kinds raised by the comparison engine and its result containers.

use thiserror::Error;

/// Every failure the engine can report.
///
/// All of these are raised synchronously at the point of detection. The
/// engine is a deterministic computation, so none of them are retryable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComparatorError {
    #[error("cannot find label {label:?} in labels")]
    LabelNotFound { label: String },
    #[error("cannot assign {got} labels to a result with {expected} top-level entries")]
    InvalidLabelAssignment { expected: usize, got: usize },
    #[error("iteration is ill defined for a product result with {count} products: {names:?}")]
    IllDefinedIteration { count: usize, names: Vec<String> },
    #[error("operator {operator:?} has arity {arity}; only arity 1 or 2 can be laid out")]
    UnsupportedArity { operator: String, arity: usize },
    #[error("operator arity cannot be determined: {reason}")]
    UnknownArity { reason: String },
    #[error("operator {operator:?} declared arity {declared} but was called with {got} arguments")]
    ArityMismatch {
        operator: String,
        declared: usize,
        got: usize,
    },
    #[error("no operator named {0:?} is registered")]
    UnknownOperator(String),
    #[error("no product named {0:?} in result")]
    ProductNotFound(String),
    #[error("product {name:?} failed: {reason}")]
    Product { name: String, reason: String },
    #[error("signal {index} is empty after truncation and windowing")]
    EmptySignal { index: usize },
    #[error("compare requires at least one signal")]
    NoSignals,
    #[error("invalid operation domain: {0}")]
    InvalidDomain(String),
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, ComparatorError>;
