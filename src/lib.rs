//! Typed expression core for a packet display-filter language.
//!
//! A filter compiler parses expression text into a tree of [`Node`]s whose
//! kinds are drawn from a [`Registry`] of value types; [`eval::eval`] then
//! walks that tree against decoded field values.

pub mod config;
pub mod drange;
pub mod error;
pub mod eval;
pub mod ftype;
pub mod registry;
pub mod syntax_tree;

#[cfg(test)]
mod proptest_generators;

pub use config::{LocalTimePolicy, RuntimeConfig};
pub use drange::{Ending, RangeList, RangeSpec};
pub use error::{EvalError, FtypeError};
pub use eval::{eval, FieldSource};
pub use ftype::{CmpOp, NsTime, TypeDescriptor, Value, ValueKind};
pub use registry::Registry;
pub use syntax_tree::{FieldRef, Node, Payload, RangeNode, TestNode, TestOp};
