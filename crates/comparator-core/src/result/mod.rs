//! Result containers returned by the comparators.

pub mod format;
pub mod node;
pub mod operator_result;
pub mod product_result;

pub use format::NumberFormat;
pub use node::Node;
pub use operator_result::{OperatorNode, OperatorResult, Selection, SubplotDims};
pub use product_result::{ProductNode, ProductResult};
