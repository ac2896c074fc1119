//! Randomness source injected into selection and refill
//!
//! The engine never reaches for a global generator. Every draw goes through a
//! `RandomSource` owned by the caller, so a fixed seed replays a session exactly.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Capability to draw the two kinds of values the engine needs
pub trait RandomSource {
    /// Uniform value in `[0, 1)`
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `0..len`; `len` is never zero
    fn next_index(&mut self, len: usize) -> usize;
}

impl<R: RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

/// Reproducible generator for a session
pub fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Replays a fixed script of draws; wraps around when exhausted
///
/// Useful wherever a test needs to pin refills or selection points.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    units: Vec<f64>,
    indices: Vec<usize>,
    unit_pos: usize,
    index_pos: usize,
}

impl ScriptedSource {
    pub fn new(units: Vec<f64>, indices: Vec<usize>) -> Self {
        Self {
            units,
            indices,
            unit_pos: 0,
            index_pos: 0,
        }
    }

    /// Source whose index draws always return `index` (clamped to range)
    pub fn constant_index(index: usize) -> Self {
        Self::new(vec![0.0], vec![index])
    }

    /// Source whose unit draws replay `units` in order
    pub fn units(units: Vec<f64>) -> Self {
        Self::new(units, vec![0])
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        if self.units.is_empty() {
            return 0.0;
        }
        let value = self.units[self.unit_pos % self.units.len()];
        self.unit_pos += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }

    fn next_index(&mut self, len: usize) -> usize {
        if self.indices.is_empty() || len == 0 {
            return 0;
        }
        let value = self.indices[self.index_pos % self.indices.len()];
        self.index_pos += 1;
        value.min(len - 1)
    }
}
