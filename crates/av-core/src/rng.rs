//! Seeded randomness for scenario generation.
//!
//! The controllers never draw random numbers.  Randomness only enters when a
//! scenario is laid out (spawn gaps, per-driver top speeds), and all of it
//! flows from `SimConfig::seed` through one [`SimRng`], so a seed fully
//! determines a run.
//!
//! [`SimRng::fork`] hands a sub-generator its own stream: the parent draws a
//! `u64` and mixes in the label, so adding draws to one sub-generator does not
//! shift the values another one sees.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Fractional part of the golden ratio; spreads consecutive labels apart.
const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// Scenario RNG.  Single-threaded by construction; fork one per worker if
/// ever needed in parallel code.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// An independent generator labelled `label` (e.g. one per spawn lane).
    pub fn fork(&mut self, label: u64) -> SimRng {
        let seed = self.0.r#gen::<u64>() ^ label.wrapping_mul(GOLDEN_GAMMA);
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform in `[lo, hi)`; returns `lo` for an empty or inverted range
    /// instead of panicking.
    pub fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        if hi > lo { self.0.gen_range(lo..hi) } else { lo }
    }

    /// `base` scaled by a uniform factor in `[1 - spread, 1 + spread)`.
    pub fn jitter(&mut self, base: f32, spread: f32) -> f32 {
        let spread = spread.abs();
        base * self.uniform(1.0 - spread, 1.0 + spread)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    pub fn chance(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
