//! Build [`Config`] from environment variables.
//!
//! Uses [`env_string`] and [`env_parsed`] to read env vars with a single place for key names
//! (see the `constants` submodule) and typed errors ([`ConfigError`]).

use super::constants::{
    ENV_HIDDEN_SIZES, ENV_INIT_HIGH, ENV_INIT_LOW, ENV_LEARNING_RATE, ENV_LOSS_LOG_EVERY,
    ENV_NUM_STEPS, ENV_PREFIX, ENV_SEED,
};
use super::{Config, ConfigError, LayerSizes};

/// Returns the full environment variable key for a given suffix (e.g. `SEED` → `MICROGRAD_SEED`).
#[must_use]
pub fn env_key(suffix: &str) -> String {
    format!("{ENV_PREFIX}{suffix}")
}

/// Reads an environment variable as a string.
///
/// Returns `Some(value)` if the variable is set and valid UTF-8, `None` if unset.
/// Returns `Err(ConfigError::EnvVar)` if the variable is set but invalid (e.g. not Unicode).
pub fn env_string(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(s) => Ok(Some(s)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::EnvVar {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}

/// Reads an environment variable and parses it into type `T`.
///
/// Returns `Ok(Some(value))` if set and parse succeeds, `Ok(None)` if unset, and
/// `Err(ConfigError::Parse)` if set but parsing fails (e.g. `SEED=abc` for `u64`).
pub fn env_parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(s) = env_string(key)? else {
        return Ok(None);
    };
    match s.trim().parse() {
        Ok(t) => Ok(Some(t)),
        Err(e) => Err(ConfigError::Parse {
            key: key.to_string(),
            value: s,
            message: e.to_string(),
        }),
    }
}

/// Builds [`Config`] from environment variables, falling back to [`Config::default`] for unset values.
///
/// Returns [`ConfigError`] if any *set* variable fails to parse (e.g. `MICROGRAD_SEED=abc`).
/// The result is not validated; call [`Config::validate`] before use.
pub fn from_env() -> Result<Config, ConfigError> {
    let default = Config::default();

    let seed = env_parsed::<u64>(&env_key(ENV_SEED))?.unwrap_or(default.seed);
    let hidden_sizes = env_parsed::<LayerSizes>(&env_key(ENV_HIDDEN_SIZES))?
        .unwrap_or_else(|| default.hidden_sizes.clone());
    let learning_rate =
        env_parsed::<f64>(&env_key(ENV_LEARNING_RATE))?.unwrap_or(default.learning_rate);
    let num_steps = env_parsed::<usize>(&env_key(ENV_NUM_STEPS))?.unwrap_or(default.num_steps);
    let loss_log_every =
        env_parsed::<usize>(&env_key(ENV_LOSS_LOG_EVERY))?.unwrap_or(default.loss_log_every);
    let init_low = env_parsed::<f64>(&env_key(ENV_INIT_LOW))?.unwrap_or(default.init_low);
    let init_high = env_parsed::<f64>(&env_key(ENV_INIT_HIGH))?.unwrap_or(default.init_high);

    Ok(Config {
        seed,
        hidden_sizes,
        learning_rate,
        num_steps,
        loss_log_every,
        init_low,
        init_high,
    })
}
