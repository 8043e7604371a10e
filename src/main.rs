//! # micrograd
//!
//! Trains a tiny tanh MLP on a four-sample toy set with the scalar autograd engine,
//! then prints its predictions. Settings come from `MICROGRAD_*` environment variables
//! (see `micrograd_engine::config`).

use micrograd_engine::config::from_env;
use micrograd_engine::train::run;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = from_env()?;
    run(&config)?;
    Ok(())
}
