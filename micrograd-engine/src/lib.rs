//! # micrograd-engine
//!
//! Scalar reverse-mode autograd: an arena-backed expression graph, a
//! topological backward pass, and neurons / layers / MLPs built on top.
//! Also carries the env-driven config and the training helpers used by the
//! `micrograd` demo binary.

pub mod autograd;
pub mod config;
pub mod error;
pub mod nn;
pub mod train;

pub use error::{Error, Result};
