//! Harness failures.

use comparator_core::ComparatorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Comparator(#[from] ComparatorError),
    #[error("unknown operator {0:?}; built-ins are {1}")]
    UnknownOperator(String, String),
    #[error("unknown product {0:?}; built-ins are {1}")]
    UnknownProduct(String, String),
    #[error("invalid plan: {0}")]
    InvalidPlan(String),
    #[error("unsupported format '{0}', expected json|plain")]
    UnsupportedFormat(String),
}
