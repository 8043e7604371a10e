//! Multi-layer perceptron: layers applied in sequence.

use std::fmt;

use rand::Rng;

use super::{Activation, Layer, Module, WeightInit};
use crate::autograd::{Graph, Operand, ValueRef};
use crate::error::{Error, Result};

/// Stack of [`Layer`]s with sizes `[nin, sizes[0], sizes[1], ...]`.
#[derive(Clone, Debug)]
pub struct Mlp {
    layers: Vec<Layer>,
}

impl Mlp {
    /// Tanh network with default (uniform `[-1, 1]`) initialisation.
    ///
    /// `sizes` lists every layer's width after the input, the last one being the
    /// output width.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArchitecture`] if `sizes` is empty or contains a zero.
    pub fn new<R: Rng + ?Sized>(
        graph: &Graph,
        nin: usize,
        sizes: &[usize],
        rng: &mut R,
    ) -> Result<Self> {
        Self::with_init(graph, nin, sizes, &WeightInit::default(), rng)
    }

    /// Tanh network with an explicit weight distribution.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArchitecture`] for empty or zero-width `sizes`,
    /// [`Error::InvalidInit`] if `init` cannot be sampled.
    pub fn with_init<R: Rng + ?Sized>(
        graph: &Graph,
        nin: usize,
        sizes: &[usize],
        init: &WeightInit,
        rng: &mut R,
    ) -> Result<Self> {
        if sizes.is_empty() {
            return Err(Error::InvalidArchitecture(
                "network needs at least one layer".to_string(),
            ));
        }
        if let Some(pos) = sizes.iter().position(|&s| s == 0) {
            return Err(Error::InvalidArchitecture(format!(
                "layer {pos} has zero width"
            )));
        }
        let widths: Vec<usize> = std::iter::once(nin).chain(sizes.iter().copied()).collect();
        let layers = widths
            .windows(2)
            .map(|w| Layer::with_init(graph, w[0], w[1], Activation::Tanh, init, rng))
            .collect::<Result<Vec<_>>>()?;
        Ok(Mlp { layers })
    }

    /// The network's layers, input side first.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of inputs.
    #[must_use]
    pub fn nin(&self) -> usize {
        self.layers.first().map_or(0, Layer::nin)
    }

    /// Number of outputs.
    #[must_use]
    pub fn nout(&self) -> usize {
        self.layers.last().map_or(0, Layer::nout)
    }

    /// Forward pass through every layer; returns the last layer's outputs.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if `inputs.len() != self.nin()`, or
    /// [`Error::UnsupportedOperand`] for an input node from another graph.
    pub fn forward<I>(&self, inputs: &[I]) -> Result<Vec<ValueRef>>
    where
        I: Into<Operand> + Clone,
    {
        let Some((first, rest)) = self.layers.split_first() else {
            return Err(Error::InvalidArchitecture(
                "network has no layers".to_string(),
            ));
        };
        let mut x = first.forward(inputs)?;
        for layer in rest {
            x = layer.forward(&x)?;
        }
        Ok(x)
    }
}

impl Module for Mlp {
    fn parameters(&self) -> Vec<ValueRef> {
        self.layers.iter().flat_map(Module::parameters).collect()
    }
}

impl fmt::Display for Mlp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layers: Vec<String> = self.layers.iter().map(ToString::to_string).collect();
        write!(f, "MLP of [{}]", layers.join(", "))
    }
}
