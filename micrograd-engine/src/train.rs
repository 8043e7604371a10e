//! Training helpers around the engine: a squared-error loss, plain SGD, and the
//! fitting loop behind the `micrograd` demo binary.
//!
//! None of this is needed to use the engine; it shows the intended cycle of
//! forward → loss → `zero_grad` → backward → parameter update.

use rand::{rngs::StdRng, SeedableRng};

use crate::autograd::{Graph, Pow, ScalarNode, ValueRef};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::nn::{Mlp, Module};

/// Inputs of the four-sample toy classification set used by [`run`].
pub const DEMO_INPUTS: [[f64; 3]; 4] = [
    [2.0, 3.0, -1.0],
    [3.0, -1.0, 0.5],
    [0.5, 1.0, 1.0],
    [1.0, 1.0, -1.0],
];

/// Desired outputs for [`DEMO_INPUTS`].
pub const DEMO_TARGETS: [f64; 4] = [1.0, -1.0, -1.0, 1.0];

/// Sum of squared errors: `Σ (p_i - y_i)^2`.
///
/// # Errors
///
/// [`Error::DimensionMismatch`] if the lengths differ or there are no predictions.
pub fn mse_loss(predictions: &[ValueRef], targets: &[f64]) -> Result<ValueRef> {
    if predictions.len() != targets.len() {
        return Err(Error::DimensionMismatch {
            expected: predictions.len(),
            got: targets.len(),
        });
    }
    let mut terms = predictions
        .iter()
        .zip(targets)
        .map(|(p, &y)| (&(p - y)).pow(2.0));
    let Some(mut loss) = terms.next() else {
        return Err(Error::DimensionMismatch {
            expected: 1,
            got: 0,
        });
    };
    for term in terms {
        loss = &loss + &term;
    }
    Ok(loss)
}

/// Vanilla gradient descent: `p.data -= learning_rate * p.grad`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sgd {
    /// Step size.
    pub learning_rate: f64,
}

impl Sgd {
    /// Creates an optimizer with the given step size.
    #[must_use]
    pub fn new(learning_rate: f64) -> Self {
        Sgd { learning_rate }
    }

    /// Moves every parameter against its gradient. Gradients are left as they are.
    pub fn step(&self, params: &[ValueRef]) {
        for p in params {
            p.set_data(p.data() - self.learning_rate * p.grad());
        }
    }
}

/// Trains `model` on `(inputs, targets)` with full-batch SGD; returns the loss of every step.
///
/// Each step uses the first output of the network as the prediction for a sample.
/// Prints the loss at step 1 and every `config.loss_log_every` steps.
///
/// # Errors
///
/// - [`Error::Config`] if `config` does not validate.
/// - [`Error::DimensionMismatch`] if a sample's width differs from the network input,
///   or `inputs` and `targets` differ in length.
pub fn fit<X>(model: &Mlp, inputs: &[X], targets: &[f64], config: &Config) -> Result<Vec<f64>>
where
    X: AsRef<[f64]>,
{
    config.validate()?;
    let sgd = Sgd::new(config.learning_rate);
    let params = model.parameters();
    let mut history = Vec::with_capacity(config.num_steps);

    for step in 0..config.num_steps {
        let predictions = inputs
            .iter()
            .map(|x| first_output(model.forward(x.as_ref())?))
            .collect::<Result<Vec<_>>>()?;
        let loss = mse_loss(&predictions, targets)?;

        model.zero_grad();
        loss.backward();
        sgd.step(&params);

        let loss_val = loss.data();
        if (step + 1) % config.loss_log_every == 0 || step == 0 {
            println!(
                "step {:4} / {:4} | loss {:.4}",
                step + 1,
                config.num_steps,
                loss_val
            );
        }
        history.push(loss_val);
    }
    Ok(history)
}

fn first_output(outputs: Vec<ValueRef>) -> Result<ValueRef> {
    let got = outputs.len();
    outputs
        .into_iter()
        .next()
        .ok_or(Error::DimensionMismatch { expected: 1, got })
}

/// Runs the demo: builds an MLP `[3, hidden..., 1]`, fits it to the toy set, prints predictions.
///
/// Returns the per-step loss history.
///
/// # Errors
///
/// [`Error::Config`] for an invalid `config`, or any error from building or fitting the model.
pub fn run(config: &Config) -> Result<Vec<f64>> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let graph = Graph::new();

    let mut sizes = config.hidden_sizes.0.clone();
    sizes.push(1);
    let model = Mlp::with_init(&graph, 3, &sizes, &config.weight_init(), &mut rng)?;
    println!("model: {model}");
    println!("num params: {}", model.parameters().len());

    let history = fit(&model, &DEMO_INPUTS, &DEMO_TARGETS, config)?;

    println!("\n--- predictions ---");
    for (x, y) in DEMO_INPUTS.iter().zip(DEMO_TARGETS) {
        let pred = first_output(model.forward(x)?)?;
        println!("input {x:?} | target {y:+.1} | prediction {:+.4}", pred.data());
    }
    println!("graph nodes: {}", graph.len());
    Ok(history)
}
