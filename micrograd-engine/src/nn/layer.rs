//! A layer of independent neurons sharing the same inputs.

use std::fmt;

use rand::Rng;

use super::{Activation, Module, Neuron, WeightInit};
use crate::autograd::{Graph, Operand, ValueRef};
use crate::error::{Error, Result};

/// `nout` neurons, each reading the same `nin` inputs.
#[derive(Clone, Debug)]
pub struct Layer {
    nin: usize,
    neurons: Vec<Neuron>,
}

impl Layer {
    /// Tanh layer with default (uniform `[-1, 1]`) initialisation.
    pub fn new<R: Rng + ?Sized>(graph: &Graph, nin: usize, nout: usize, rng: &mut R) -> Self {
        let neurons = (0..nout).map(|_| Neuron::new(graph, nin, rng)).collect();
        Layer { nin, neurons }
    }

    /// Layer with an explicit activation and weight distribution.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInit`] if `init` cannot be sampled.
    pub fn with_init<R: Rng + ?Sized>(
        graph: &Graph,
        nin: usize,
        nout: usize,
        activation: Activation,
        init: &WeightInit,
        rng: &mut R,
    ) -> Result<Self> {
        let neurons = (0..nout)
            .map(|_| Neuron::with_init(graph, nin, activation, init, rng))
            .collect::<Result<Vec<_>>>()?;
        Ok(Layer { nin, neurons })
    }

    /// Number of inputs.
    #[must_use]
    pub fn nin(&self) -> usize {
        self.nin
    }

    /// Number of outputs (neurons).
    #[must_use]
    pub fn nout(&self) -> usize {
        self.neurons.len()
    }

    /// The layer's neurons, in output order.
    #[must_use]
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    /// Forward pass: one output node per neuron.
    ///
    /// Always returns a `Vec`, also for a single neuron; take `[0]` to get the scalar.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if `inputs.len() != self.nin()`, or any error from
    /// [`Neuron::forward`].
    pub fn forward<I>(&self, inputs: &[I]) -> Result<Vec<ValueRef>>
    where
        I: Into<Operand> + Clone,
    {
        if inputs.len() != self.nin {
            return Err(Error::DimensionMismatch {
                expected: self.nin,
                got: inputs.len(),
            });
        }
        self.neurons.iter().map(|n| n.forward(inputs)).collect()
    }
}

impl Module for Layer {
    fn parameters(&self) -> Vec<ValueRef> {
        self.neurons.iter().flat_map(Module::parameters).collect()
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let neurons: Vec<String> = self.neurons.iter().map(ToString::to_string).collect();
        write!(f, "Layer of [{}]", neurons.join(", "))
    }
}
