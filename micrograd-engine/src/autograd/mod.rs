//! Autograd: scalar computation graphs with reverse-mode differentiation.
//!
//! Nodes are recorded into a [`Graph`] arena as operations are applied; each node
//! stores its forward value and an [`Op`] tag naming the operator and its operands.
//! [`ScalarNode::backward`] orders the graph topologically and propagates gradients
//! from the output node to every node it depends on.

mod backward;
pub mod impls;
mod op;
mod trace;
#[cfg(test)]
mod tests;

pub use impls::graph::Graph;
pub use impls::scalar::{Operand, ValueRef};
pub use op::{NodeId, Op};
pub use trace::trace;

/// Trait for raising a node to a scalar power (e.g. `(&a).pow(2.0)`).
pub trait Pow<Rhs> {
    /// Result of the power operation.
    type Output;

    /// Returns `self^exp` with gradient tracking.
    #[must_use]
    fn pow(self, exp: Rhs) -> Self::Output;
}

/// Trait for the exponential of a node (e.g. `(&a).exp()`).
pub trait Exp {
    /// Result of the exponential.
    type Output;

    /// Returns `exp(self)` with gradient tracking.
    #[must_use]
    fn exp(self) -> Self::Output;
}

/// Trait for the hyperbolic tangent of a node (e.g. `(&a).tanh()`).
pub trait Tanh {
    /// Result of the activation.
    type Output;

    /// Returns `tanh(self)` with gradient tracking.
    #[must_use]
    fn tanh(self) -> Self::Output;
}

/// A differentiable scalar node in the computation graph.
///
/// Use [`ScalarNode::data`] for the forward value and [`ScalarNode::grad`] after
/// [`ScalarNode::backward`].
pub trait ScalarNode: Clone {
    /// Returns the forward pass value.
    fn data(&self) -> f64;

    /// Returns the accumulated gradient of the last backward root with respect to this node.
    fn grad(&self) -> f64;

    /// Runs backpropagation from this node to every node it depends on.
    ///
    /// Gradients are accumulated, not overwritten: call `zero_grad` on the graph (or on
    /// the parameters) between passes, otherwise contributions from earlier passes remain.
    fn backward(&self);

    /// Zeros the gradient at this node (e.g. after an optimizer step).
    fn zero_grad(&self);
}
