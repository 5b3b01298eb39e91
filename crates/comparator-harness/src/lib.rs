//! Plan runner for comparator-core.
//!
//! This crate provides:
//! - JSON comparison plans: signals, labels, built-in operators and products
//! - A runner that executes a plan in one or more domains
//! - A JSONL run log and JSON/plain-text reports

#![forbid(unsafe_code)]

pub mod error;
pub mod plan;
pub mod run_log;
pub mod runner;
pub mod trace_init;

pub use error::HarnessError;
pub use plan::{ComparisonPlan, DomainKind, SignalInput, WindowInput};
pub use run_log::{RunLog, RunLogEntry};
pub use runner::{PlanRunner, RunReport};
