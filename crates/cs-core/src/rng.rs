//! Deterministic per-run RNG wrapper.
//!
//! # Determinism strategy
//!
//! A run owns exactly one `SimRng`, created from the run's seed and threaded
//! by `&mut` through every component that draws randomness.  Because only one
//! process executes at a time (see `cs-sim`), draws happen in a single fixed
//! order and identical `(config, seed)` pairs replay bit-for-bit.
//!
//! Independent runs (e.g. a staffing sweep) derive their seeds with
//! [`SimRng::derive_seed`]:
//!
//!   seed = base_seed XOR (index * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive indices uniformly across the seed space.  Runs
//! never share RNG state, so they can execute on any thread in any order.

use rand::distributions::Distribution;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// The single pseudorandom stream of one simulation run.
///
/// The type is `!Sync` to prevent accidental sharing across threads; a
/// parallel sweep gives every run its own `SimRng`.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed for the `index`-th independent run derived from `base`.
    #[inline]
    pub fn derive_seed(base: u64, index: u64) -> u64 {
        base ^ index.wrapping_mul(MIXING_CONSTANT)
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Draw one value from a pre-built distribution (e.g. `rand_distr::Exp`).
    #[inline]
    pub fn sample<T, D: Distribution<T>>(&mut self, dist: &D) -> T {
        self.0.sample(dist)
    }
}
