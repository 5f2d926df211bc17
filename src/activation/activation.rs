use serde::{Serialize, Deserialize};
use std::f64::consts::E;

/// Logistic sigmoid, the default activation of every neuron.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + E.powf(-x))
}

/// Scalar activation applied by a neuron to `sum + bias`.
///
/// The backward pass assumes sigmoid units (its derivative is taken from the
/// value carried on each link as `last * (1 - last)`); the other variants are
/// for forward-only graphs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ActivationFunction {
    #[default]
    Sigmoid,
    Tanh,
    ReLU,
    LeakyReLU { alpha: f64 },
    Identity,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => sigmoid(x),
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::LeakyReLU { alpha } => if x > 0.0 { x } else { alpha * x },
            ActivationFunction::Identity => x,
        }
    }
}
