//! Feed-forward networks on top of the scalar engine: [`Neuron`] → [`Layer`] → [`Mlp`].
//!
//! Parameters are leaf nodes of the caller's [`Graph`](crate::autograd::Graph). A
//! forward call records new nodes on that graph; backward from a loss fills every
//! parameter's gradient. Zeroing gradients and updating values between steps is the
//! caller's job (see [`Module::zero_grad`] and [`train::Sgd`](crate::train::Sgd)).

mod init;
mod layer;
mod mlp;
mod neuron;

pub use init::WeightInit;
pub use layer::Layer;
pub use mlp::Mlp;
pub use neuron::Neuron;

use crate::autograd::{ScalarNode, Tanh, ValueRef};

/// Anything that owns trainable parameters.
pub trait Module {
    /// All parameters, in a stable order.
    fn parameters(&self) -> Vec<ValueRef>;

    /// Resets the gradient of every parameter to 0.0.
    fn zero_grad(&self) {
        for p in self.parameters() {
            p.zero_grad();
        }
    }
}

/// Nonlinearity applied to a neuron's weighted sum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Activation {
    /// Hyperbolic tangent.
    #[default]
    Tanh,
    /// Rectified linear unit.
    Relu,
    /// Identity; the raw weighted sum.
    Linear,
}

impl Activation {
    /// Applies the nonlinearity, recording it on the graph.
    #[must_use]
    pub fn apply(self, x: &ValueRef) -> ValueRef {
        match self {
            Activation::Tanh => x.tanh(),
            Activation::Relu => x.relu(),
            Activation::Linear => x.clone(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Activation::Tanh => "Tanh",
            Activation::Relu => "ReLU",
            Activation::Linear => "Linear",
        }
    }
}
