//! Per-agent RNG streams, kept beside (not inside) the generation.
//!
//! # Split borrow
//!
//! The fan-out phase needs `&Generation` (shared read of the frozen previous
//! tick) and `&mut AgentRng` (exclusive per unit) at the same time.  Holding
//! the RNGs in their own `Vec` lets Rayon zip the two:
//!
//! ```ignore
//! prev.agents()
//!     .par_iter()
//!     .zip(rngs.inner.par_iter_mut())
//!     .map(|(agent, rng)| advance(agent, &ctx, rng))
//!     .collect::<Vec<_>>()
//! ```

use ps_core::{AgentId, AgentRng};

/// One `AgentRng` per agent, indexed by `AgentId`.
///
/// `Send` but never shared: each fan-out unit borrows exactly one element
/// mutably through `par_iter_mut()`.
#[derive(Clone, Debug)]
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
}

impl AgentRngs {
    /// Allocate and seed `count` per-agent RNGs from `global_seed`.
    pub fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { inner }
    }

    /// Mutable reference to one agent's RNG.
    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        &mut self.inner[agent.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
