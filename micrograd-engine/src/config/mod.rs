//! Configuration for the training demo: network shape, optimizer and logging cadence.
//!
//! Load from environment via [`from_env`] and validate with [`Config::validate`].
//! Default values and env key names are centralized in the `constants` submodule.

mod builder;
mod constants;
mod error;

use std::fmt;
use std::str::FromStr;

use constants::{
    DEFAULT_HIDDEN_SIZES, DEFAULT_INIT_HIGH, DEFAULT_INIT_LOW, DEFAULT_LEARNING_RATE,
    DEFAULT_LOSS_LOG_EVERY, DEFAULT_NUM_STEPS, DEFAULT_SEED,
};

use crate::nn::WeightInit;

pub use builder::{env_key, env_parsed, env_string, from_env};
pub use error::ConfigError;

/// Hidden layer widths, parsed from a comma-separated list such as `"4,4"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerSizes(pub Vec<usize>);

impl FromStr for LayerSizes {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(LayerSizes(Vec::new()));
        }
        s.split(',')
            .map(|part| part.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map(LayerSizes)
    }
}

impl fmt::Display for LayerSizes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Settings for [`train::run`](crate::train::run).
///
/// Use [`from_env`] to build from environment variables and [`Config::validate`] before use.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Seed for RNG (reproducibility).
    pub seed: u64,
    /// Hidden layer widths; the output layer (width 1) is appended by the demo.
    pub hidden_sizes: LayerSizes,
    /// SGD learning rate.
    pub learning_rate: f64,
    /// Number of training steps.
    pub num_steps: usize,
    /// Log loss every this many steps.
    pub loss_log_every: usize,
    /// Lower bound of the uniform weight init.
    pub init_low: f64,
    /// Upper bound of the uniform weight init.
    pub init_high: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            hidden_sizes: LayerSizes(DEFAULT_HIDDEN_SIZES.to_vec()),
            learning_rate: DEFAULT_LEARNING_RATE,
            num_steps: DEFAULT_NUM_STEPS,
            loss_log_every: DEFAULT_LOSS_LOG_EVERY,
            init_low: DEFAULT_INIT_LOW,
            init_high: DEFAULT_INIT_HIGH,
        }
    }
}

impl Config {
    /// Validates configuration. Returns `Ok(())` if valid, or a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hidden_sizes.0.is_empty() {
            return Err(ConfigError::Validation(
                "hidden_sizes must list at least one layer".to_string(),
            ));
        }
        if self.hidden_sizes.0.contains(&0) {
            return Err(ConfigError::Validation(format!(
                "hidden_sizes ({}) must not contain zero",
                self.hidden_sizes
            )));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "learning_rate ({}) must be finite and greater than 0",
                self.learning_rate
            )));
        }
        if self.num_steps == 0 {
            return Err(ConfigError::Validation(
                "num_steps must be greater than 0".to_string(),
            ));
        }
        if self.loss_log_every == 0 {
            return Err(ConfigError::Validation(
                "loss_log_every must be greater than 0".to_string(),
            ));
        }
        if !self.init_low.is_finite() || !self.init_high.is_finite() {
            return Err(ConfigError::Validation(
                "init bounds must be finite".to_string(),
            ));
        }
        if self.init_low > self.init_high {
            return Err(ConfigError::Validation(format!(
                "init_low ({}) must not exceed init_high ({})",
                self.init_low, self.init_high
            )));
        }
        Ok(())
    }

    /// Uniform weight initialiser on `[init_low, init_high]`.
    #[must_use]
    pub fn weight_init(&self) -> WeightInit {
        WeightInit::Uniform {
            low: self.init_low,
            high: self.init_high,
        }
    }
}
