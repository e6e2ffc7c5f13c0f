//! Dropout and the per-call forward context

use ndarray::{Array, Dimension};
use rand::rngs::StdRng;
use rand::Rng;

use super::init::make_rng;

/// Whether a forward pass is part of training
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Dropout active
    Training,
    /// Dropout is the identity
    Inference,
}

/// State threaded through one forward call.
///
/// Holds the mode and the RNG that every dropout site draws from, so two
/// training passes with the same seed drop the same entries.
#[derive(Debug, Clone)]
pub struct ForwardContext {
    mode: Mode,
    rng: StdRng,
}

impl ForwardContext {
    /// Inference context: no dropout
    pub fn inference() -> Self {
        Self {
            mode: Mode::Inference,
            rng: make_rng(Some(0)),
        }
    }

    /// Training context with a fixed dropout seed
    pub fn training(seed: u64) -> Self {
        Self {
            mode: Mode::Training,
            rng: make_rng(Some(seed)),
        }
    }

    /// Training context seeded from entropy
    pub fn training_from_entropy() -> Self {
        Self {
            mode: Mode::Training,
            rng: make_rng(None),
        }
    }

    /// Current mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether dropout is active
    pub fn is_training(&self) -> bool {
        self.mode == Mode::Training
    }
}

/// Inverted dropout.
///
/// During training each entry is zeroed with probability `p` and survivors
/// are scaled by `1 / (1 - p)`. In inference mode the input is returned
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dropout {
    p: f64,
}

impl Dropout {
    /// Create a dropout with drop probability `p`, clamped into `[0, 1]`
    pub fn new(p: f64) -> Self {
        Self { p: p.clamp(0.0, 1.0) }
    }

    /// Drop probability
    pub fn probability(&self) -> f64 {
        self.p
    }

    /// Apply dropout to an array of any dimension
    pub fn apply<D: Dimension>(&self, mut x: Array<f64, D>, ctx: &mut ForwardContext) -> Array<f64, D> {
        if !ctx.is_training() || self.p <= 0.0 {
            return x;
        }
        if self.p >= 1.0 {
            x.fill(0.0);
            return x;
        }

        let scale = 1.0 / (1.0 - self.p);
        let rng = &mut ctx.rng;
        x.mapv_inplace(|v| {
            if rng.gen::<f64>() < self.p {
                0.0
            } else {
                v * scale
            }
        });
        x
    }
}
