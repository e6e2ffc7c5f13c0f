//! Activation functions applied to layer outputs

use std::fmt;

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

/// Output activation of a graph attention layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    /// Exponential linear unit with alpha = 1 (interior layers)
    #[default]
    Elu,
    /// Row-wise softmax over the feature axis (final layer)
    Softmax,
    /// No activation
    Identity,
    /// Rectified linear unit
    Relu,
    /// Hyperbolic tangent
    Tanh,
}

impl Activation {
    /// Apply the activation to an `[N, F]` matrix.
    pub fn apply(&self, x: Array2<f64>) -> Array2<f64> {
        match self {
            Activation::Elu => x.mapv_into(|v| elu(v, 1.0)),
            Activation::Softmax => softmax_rows(x),
            Activation::Identity => x,
            Activation::Relu => x.mapv_into(|v| v.max(0.0)),
            Activation::Tanh => x.mapv_into(f64::tanh),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Activation::Elu => "elu",
            Activation::Softmax => "softmax",
            Activation::Identity => "identity",
            Activation::Relu => "relu",
            Activation::Tanh => "tanh",
        };
        write!(f, "{}", name)
    }
}

/// LeakyReLU activation
pub fn leaky_relu(x: f64, negative_slope: f64) -> f64 {
    if x >= 0.0 {
        x
    } else {
        negative_slope * x
    }
}

/// ELU activation
pub fn elu(x: f64, alpha: f64) -> f64 {
    if x >= 0.0 {
        x
    } else {
        alpha * (x.exp() - 1.0)
    }
}

/// Softmax of every row, shifted by the row maximum for stability
fn softmax_rows(mut x: Array2<f64>) -> Array2<f64> {
    for mut row in x.axis_iter_mut(Axis(0)) {
        let max = row.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        if sum > 0.0 {
            row /= sum;
        }
    }
    x
}
