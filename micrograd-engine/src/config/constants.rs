//! Central place for all configuration constants.
//!
//! Default values and environment variable key names used by the config builder.

/// Environment variable prefix (e.g. `MICROGRAD_LEARNING_RATE`).
pub(crate) const ENV_PREFIX: &str = "MICROGRAD_";

// --- Env key suffixes (full key = ENV_PREFIX + suffix) ---

pub(crate) const ENV_SEED: &str = "SEED";
pub(crate) const ENV_HIDDEN_SIZES: &str = "HIDDEN_SIZES";
pub(crate) const ENV_LEARNING_RATE: &str = "LEARNING_RATE";
pub(crate) const ENV_NUM_STEPS: &str = "NUM_STEPS";
pub(crate) const ENV_LOSS_LOG_EVERY: &str = "LOSS_LOG_EVERY";
pub(crate) const ENV_INIT_LOW: &str = "INIT_LOW";
pub(crate) const ENV_INIT_HIGH: &str = "INIT_HIGH";

// --- Default values ---

pub(crate) const DEFAULT_SEED: u64 = 42;
pub(crate) const DEFAULT_HIDDEN_SIZES: [usize; 2] = [4, 4];
pub(crate) const DEFAULT_LEARNING_RATE: f64 = 0.05;
pub(crate) const DEFAULT_NUM_STEPS: usize = 50;
pub(crate) const DEFAULT_LOSS_LOG_EVERY: usize = 10;
pub(crate) const DEFAULT_INIT_LOW: f64 = -1.0;
pub(crate) const DEFAULT_INIT_HIGH: f64 = 1.0;
