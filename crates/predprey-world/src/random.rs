//! Seedable random source for life-cycle decisions.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The only source of randomness the engine reads from
pub trait RandomSource {
    /// Uniform float in `[0, 1)`
    fn uniform01(&mut self) -> f64;

    /// Uniform integer in `[0, bound)`; `0` when `bound` is zero
    fn uniform_int(&mut self, bound: u32) -> u32;

    /// Bernoulli draw succeeding with `probability`
    fn chance(&mut self, probability: f64) -> bool {
        self.uniform01() <= probability
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn uniform01(&mut self) -> f64 {
        (**self).uniform01()
    }

    fn uniform_int(&mut self, bound: u32) -> u32 {
        (**self).uniform_int(bound)
    }
}

/// ChaCha-backed random source; identical seeds give identical streams
#[derive(Debug, Clone)]
pub struct SimRng(ChaCha8Rng);

impl SimRng {
    pub fn seed_from(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl RandomSource for SimRng {
    fn uniform01(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    fn uniform_int(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            0
        } else {
            self.0.gen_range(0..bound)
        }
    }
}
