//! Deterministic per-agent RNG.
//!
//! # Determinism strategy
//!
//! Each agent gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive agent IDs uniformly across the seed space.
//! This means:
//!
//! - Fan-out units never share RNG state (no contention, no ordering
//!   dependency), so a run is bit-identical whatever the thread count.
//! - There is no ambient global generator; each unit is handed the one
//!   `&mut AgentRng` it owns for the tick.

use std::f32::consts::TAU;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{AgentId, Vec2};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Keeps sin/cos rounding from placing a disk sample just past the rim.
const DISK_RIM_MARGIN: f32 = 1.0 - 1e-6;

/// Per-agent deterministic RNG.
///
/// Stored in a parallel `Vec<AgentRng>` alongside the generation so that the
/// fan-out phase can hand each unit exclusive access to its own stream.
#[derive(Clone, Debug)]
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
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

    /// Point drawn uniformly from the disk of `radius` around the origin.
    ///
    /// Uses inverse-CDF sampling (`r = R·√u`), so every call consumes exactly
    /// two draws and never needs a rejection loop.  A non-positive radius
    /// returns `ZERO`.
    pub fn in_disk(&mut self, radius: f32) -> Vec2 {
        if radius <= 0.0 {
            return Vec2::ZERO;
        }
        let u: f32 = self.0.gen_range(0.0..1.0);
        let theta: f32 = self.0.gen_range(0.0..TAU);
        let r = radius * DISK_RIM_MARGIN * u.sqrt();
        Vec2::new(r * theta.cos(), r * theta.sin())
    }
}
