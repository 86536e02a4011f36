//! Content stream data model.

pub mod objects;

pub use objects::{Operand, Operation};
