//! Errors produced by the autograd engine, the network types and the demo run.
//!
//! Everything fallible in the crate returns [`Result`]. Configuration problems are
//! reported as [`ConfigError`](crate::config::ConfigError) and wrapped here when they
//! surface through [`train::run`](crate::train::run).

use thiserror::Error;

use crate::config::ConfigError;

/// Errors produced by the engine.
///
/// # Variants
///
/// - **UnsupportedOperand**: An operand cannot be promoted to a node of this graph.
///   *When*: A node was passed as the exponent of `try_pow`, or a node from another
///   [`Graph`](crate::autograd::Graph) was combined with this one.
///   *Recovery*: Use a plain `f64` exponent; build every operand on the same graph.
///
/// - **DimensionMismatch**: An input sequence has the wrong length.
///   *When*: Calling a neuron, layer, network or loss with a different number of inputs
///   than it was configured for.
///   *Recovery*: Pass exactly `expected` values.
///
/// - **InvalidArchitecture**: Layer sizes cannot describe a network.
///   *When*: Building an [`Mlp`](crate::nn::Mlp) with no layers or a zero-width layer.
///
/// - **InvalidInit**: Weight initialiser parameters are unusable.
///   *When*: Non-finite bounds, `low > high`, or a negative standard deviation.
///
/// - **Config**: The demo configuration failed to load or validate.
#[derive(Error, Debug)]
pub enum Error {
    /// Operand that cannot take part in the requested operation.
    #[error("unsupported operand: {0}")]
    UnsupportedOperand(String),

    /// Input length does not match the configured arity.
    #[error("dimension mismatch: expected {expected} inputs, got {got}")]
    DimensionMismatch {
        /// Configured arity.
        expected: usize,
        /// Length actually supplied.
        got: usize,
    },

    /// Layer sizes that cannot form a network.
    #[error("invalid architecture: {0}")]
    InvalidArchitecture(String),

    /// Weight initialiser with unusable parameters.
    #[error("invalid weight init: {0}")]
    InvalidInit(String),

    /// Configuration error surfaced while running the demo.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
