//! Parameter initialisation

use ndarray::{Array, Dimension, ShapeBuilder};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// How trainable weights are initialised at construction.
///
/// Glorot / Xavier-uniform is the default. Nothing in the forward pass
/// depends on the choice.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum InitStrategy {
    /// Uniform in `[-b, b]` with `b = sqrt(6 / (fan_in + fan_out))`
    #[default]
    XavierUniform,
    /// Uniform in `[low, high)`
    Uniform { low: f64, high: f64 },
    /// All zeros
    Zeros,
}

impl InitStrategy {
    /// Sample an array of the given shape.
    ///
    /// `fan_in` / `fan_out` are only used by Xavier initialisation.
    pub fn sample<Sh, D>(&self, shape: Sh, fan_in: usize, fan_out: usize, rng: &mut StdRng) -> Array<f64, D>
    where
        Sh: ShapeBuilder<Dim = D>,
        D: Dimension,
    {
        match *self {
            InitStrategy::XavierUniform => {
                let bound = xavier_bound(fan_in, fan_out);
                if bound > 0.0 {
                    Array::random_using(shape, Uniform::new_inclusive(-bound, bound), rng)
                } else {
                    Array::zeros(shape)
                }
            }
            InitStrategy::Uniform { low, high } if high > low => {
                Array::random_using(shape, Uniform::new(low, high), rng)
            }
            InitStrategy::Uniform { low, .. } => Array::from_elem(shape, low),
            InitStrategy::Zeros => Array::zeros(shape),
        }
    }
}

/// Glorot bound for the given fans
pub fn xavier_bound(fan_in: usize, fan_out: usize) -> f64 {
    let fans = (fan_in + fan_out) as f64;
    if fans == 0.0 {
        0.0
    } else {
        (6.0 / fans).sqrt()
    }
}

/// Seeded RNG when a seed is given, entropy-seeded otherwise
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
