//! Combinatorial comparison of numeric signals.
//!
//! This crate provides:
//! - Signal transformation: truncation, windowing, time alignment, FFT
//! - Operator evaluation over every ordered combination of input signals
//! - Product reductions at every operator-result leaf
//! - Result containers addressable by index, path and label
//! - Multi-domain fan-out and JSON export

#![forbid(unsafe_code)]

pub mod align;
pub mod builtin;
pub mod comparator;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod export;
pub mod multi_domain;
pub mod operator;
pub mod product;
pub mod registry;
pub mod representation;
pub mod result;
pub mod signal;
pub mod transform;

pub use comparator::{Comparison, SingleDomainComparator};
pub use domain::OperationDomain;
pub use error::{ComparatorError, Result};
pub use multi_domain::{MultiDomainComparator, ObservableRegistry, RegistryEvent, SubscriptionId};
pub use operator::Operator;
pub use product::{Product, ProductMap, ProductValue};
pub use registry::Registry;
pub use representation::Representation;
pub use result::{Node, NumberFormat, OperatorResult, ProductResult, Selection};
pub use signal::Signal;
