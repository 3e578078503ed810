//! Uniform random-number providers.
//!
//! Simulation and connectivity modelling both draw from an injected
//! [`RandomSource`] rather than a global generator, so a fixed seed (or a
//! scripted sequence) reproduces a run exactly.

use std::fmt::Debug;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A stream of uniform draws in `[0, 1)`.
pub trait RandomSource: Send + Debug {
    /// Next uniform draw in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform integer in `lo..=hi`.
    fn int_in(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        let span = f64::from(hi - lo + 1);
        let offset = (self.next_f64() * span).floor() as i32;
        (lo + offset).min(hi)
    }

    /// Uniform float in `[lo, hi)`.
    fn float_in(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform index into a collection of `len` items (`len` > 0).
    fn index(&mut self, len: usize) -> usize {
        ((self.next_f64() * len as f64) as usize).min(len.saturating_sub(1))
    }
}

/// `StdRng`-backed source; seed it for reproducible runs.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// Useful to force a particular branch, e.g. `ScriptedRandom::repeat(0.0)`
/// makes every probability check succeed.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    draws: Vec<f64>,
    next: usize,
}

impl ScriptedRandom {
    /// Draws are clamped into `[0, 1)`. An empty script behaves like `repeat(0.5)`.
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        let mut draws: Vec<f64> = draws
            .into_iter()
            .map(|d| d.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        if draws.is_empty() {
            draws.push(0.5);
        }
        Self { draws, next: 0 }
    }

    pub fn repeat(draw: f64) -> Self {
        Self::new([draw])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        let draw = self.draws[self.next % self.draws.len()];
        self.next += 1;
        draw
    }
}
