//! Concrete graph storage and the node handle built on it.

pub mod graph;
pub mod scalar;
