//! Weight initialisation for neurons.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::error::{Error, Result};

/// Distribution new weights and biases are drawn from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WeightInit {
    /// Uniform on `[low, high]`.
    Uniform {
        /// Lower bound (inclusive).
        low: f64,
        /// Upper bound (inclusive).
        high: f64,
    },
    /// Gaussian with the given mean and standard deviation.
    Normal {
        /// Mean.
        mean: f64,
        /// Standard deviation.
        std: f64,
    },
}

impl Default for WeightInit {
    /// Uniform on `[-1, 1]`.
    fn default() -> Self {
        WeightInit::Uniform {
            low: -1.0,
            high: 1.0,
        }
    }
}

impl WeightInit {
    /// Checks that sampling cannot fail.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInit`] for non-finite parameters, `low > high`, or `std < 0`.
    pub fn validate(&self) -> Result<()> {
        match *self {
            WeightInit::Uniform { low, high } => {
                if !low.is_finite() || !high.is_finite() {
                    return Err(Error::InvalidInit(format!(
                        "uniform bounds must be finite, got [{low}, {high}]"
                    )));
                }
                if low > high {
                    return Err(Error::InvalidInit(format!(
                        "uniform low ({low}) must not exceed high ({high})"
                    )));
                }
            }
            WeightInit::Normal { mean, std } => {
                if !mean.is_finite() || !std.is_finite() || std < 0.0 {
                    return Err(Error::InvalidInit(format!(
                        "normal needs finite mean and std >= 0, got mean {mean}, std {std}"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Distribution<f64> for WeightInit {
    /// Draws one value. Assumes [`WeightInit::validate`] passed.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            WeightInit::Uniform { low, high } => rng.random_range(low..=high),
            WeightInit::Normal { mean, std } => {
                let z: f64 = StandardNormal.sample(rng);
                mean + std * z
            }
        }
    }
}
