//! A single neuron: weighted sum of inputs plus bias, through an activation.

use std::fmt;

use rand::Rng;
use rand_distr::Distribution;

use super::{Activation, Module, WeightInit};
use crate::autograd::{Graph, Operand, ValueRef};
use crate::error::{Error, Result};

/// `activation(b + Σ w_i * x_i)` with one weight per input.
#[derive(Clone, Debug)]
pub struct Neuron {
    w: Vec<ValueRef>,
    b: ValueRef,
    activation: Activation,
}

impl Neuron {
    /// Tanh neuron with `nin` weights and a bias, each uniform in `[-1, 1]`.
    pub fn new<R: Rng + ?Sized>(graph: &Graph, nin: usize, rng: &mut R) -> Self {
        Self::sampled(graph, nin, Activation::Tanh, &WeightInit::default(), rng)
    }

    /// Neuron with an explicit activation and weight distribution.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInit`] if `init` cannot be sampled.
    pub fn with_init<R: Rng + ?Sized>(
        graph: &Graph,
        nin: usize,
        activation: Activation,
        init: &WeightInit,
        rng: &mut R,
    ) -> Result<Self> {
        init.validate()?;
        Ok(Self::sampled(graph, nin, activation, init, rng))
    }

    /// Neuron with fixed weights and bias, e.g. restored or hand-picked values.
    #[must_use]
    pub fn from_weights(graph: &Graph, weights: &[f64], bias: f64, activation: Activation) -> Self {
        Neuron {
            w: weights.iter().map(|&x| graph.leaf(x)).collect(),
            b: graph.leaf(bias),
            activation,
        }
    }

    fn sampled<R: Rng + ?Sized>(
        graph: &Graph,
        nin: usize,
        activation: Activation,
        init: &WeightInit,
        rng: &mut R,
    ) -> Self {
        let w = (0..nin).map(|_| graph.leaf(init.sample(rng))).collect();
        let b = graph.leaf(init.sample(rng));
        Neuron { w, b, activation }
    }

    /// Number of inputs this neuron expects.
    #[must_use]
    pub fn nin(&self) -> usize {
        self.w.len()
    }

    /// Weight nodes, one per input.
    #[must_use]
    pub fn weights(&self) -> &[ValueRef] {
        &self.w
    }

    /// Bias node.
    #[must_use]
    pub fn bias(&self) -> &ValueRef {
        &self.b
    }

    /// Activation applied after the weighted sum.
    #[must_use]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Forward pass. Numbers in `inputs` are promoted to leaves of this neuron's graph.
    ///
    /// # Errors
    ///
    /// - [`Error::DimensionMismatch`] if `inputs.len() != self.nin()`.
    /// - [`Error::UnsupportedOperand`] if an input node belongs to another graph.
    pub fn forward<I>(&self, inputs: &[I]) -> Result<ValueRef>
    where
        I: Into<Operand> + Clone,
    {
        if inputs.len() != self.w.len() {
            return Err(Error::DimensionMismatch {
                expected: self.w.len(),
                got: inputs.len(),
            });
        }
        let graph = self.b.graph();
        let operands: Vec<Operand> = inputs.iter().cloned().map(Into::into).collect();
        for operand in &operands {
            graph.check_owned(operand)?;
        }
        let xs = operands
            .into_iter()
            .map(|xi| graph.to_node(xi))
            .collect::<Result<Vec<_>>>()?;
        let mut act = self.b.clone();
        for (wi, xi) in self.w.iter().zip(&xs) {
            act = &act + &(wi * xi);
        }
        Ok(self.activation.apply(&act))
    }
}

impl Module for Neuron {
    fn parameters(&self) -> Vec<ValueRef> {
        let mut params = self.w.clone();
        params.push(self.b.clone());
        params
    }
}

impl fmt::Display for Neuron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Neuron({})", self.activation.name(), self.nin())
    }
}
