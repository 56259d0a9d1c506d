//! Deterministic RNG wrapper for the courier planner's randomized local
//! search.
//!
//! A single `SmallRng` seeded either explicitly (tests, reproducible runs)
//! or from OS entropy (production). There is exactly one `PlannerRng` per
//! planning request, so no per-agent seed-mixing scheme is needed here.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Seedable RNG driving `streetmap-courier`'s randomized 2-opt-style local
/// search.
pub struct PlannerRng(SmallRng);

impl PlannerRng {
    /// Seed deterministically — use in tests and anywhere reproducible
    /// planning output is required.
    pub fn new(seed: u64) -> Self {
        PlannerRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed from OS entropy. The default for production callers that don't
    /// need reproducibility.
    pub fn from_entropy() -> Self {
        PlannerRng(SmallRng::from_entropy())
    }

    /// Uniform index into `[0, len)`. Panics if `len == 0`.
    #[inline]
    pub fn gen_index(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }

    /// Sample a uniformly distributed value in `range`.
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
}
