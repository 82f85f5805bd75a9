//! Injectable noise sources for the race engine.
//!
//! The batch driver borrows one source for its whole run: the stream is
//! acquired at batch entry, advances monotonically across trials, and is
//! never reseeded mid-batch. Reseeding between trials would correlate
//! their noise and break statistical independence.

use lca_core::Real;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Source of independent standard-normal draws.
pub trait NoiseSource {
    /// Next independent N(0, 1) draw.
    fn next_standard_normal(&mut self) -> Real;
}

/// Seeded Gaussian source backed by `StdRng`.
#[derive(Clone, Debug)]
pub struct GaussianNoise {
    rng: StdRng,
}

impl GaussianNoise {
    /// Create a reproducible source from a seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl NoiseSource for GaussianNoise {
    fn next_standard_normal(&mut self) -> Real {
        self.rng.sample(StandardNormal)
    }
}

/// Scripted source replaying a fixed sequence (cycling); for tests.
#[derive(Clone, Debug)]
pub struct ScriptedNoise {
    values: Vec<Real>,
    next: usize,
}

impl ScriptedNoise {
    pub fn new(values: Vec<Real>) -> Self {
        Self { values, next: 0 }
    }

    /// Number of draws consumed so far.
    pub fn draws(&self) -> usize {
        self.next
    }
}

impl NoiseSource for ScriptedNoise {
    fn next_standard_normal(&mut self) -> Real {
        if self.values.is_empty() {
            self.next += 1;
            return 0.0;
        }
        let v = self.values[self.next % self.values.len()];
        self.next += 1;
        v
    }
}
