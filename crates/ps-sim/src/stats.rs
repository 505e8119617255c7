//! Per-tick counters derived from a completed generation.

use ps_agent::{Generation, RespawnStatus, RespawnTrigger};
use ps_core::Tick;

/// Summary of one tick, computed after the barrier from the new generation.
///
/// Trigger counts include every respawn attempted this tick, whatever its
/// outcome; `fallbacks` and `deferred` break out the exhausted ones.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub tick: Tick,
    pub agents: usize,
    /// Agents that left the world disk on the previous tick.
    pub escaped: usize,
    pub caught: usize,
    pub crowded: usize,
    /// Deferred respawns retried this tick.
    pub retried: usize,
    /// Relocations that found a clear position.
    pub relocated: usize,
    /// Exhausted relocations placed at an overlapping sample.
    pub fallbacks: usize,
    /// Exhausted relocations postponed to the next tick.
    pub deferred: usize,
    /// Agents currently outside `world_radius`.
    pub out_of_bounds: usize,
}

impl TickStats {
    pub fn from_generation(generation: &Generation, world_radius: f32) -> Self {
        let mut stats = TickStats {
            tick: generation.tick(),
            agents: generation.len(),
            ..TickStats::default()
        };

        for agent in generation.agents() {
            if !agent.in_bounds(world_radius) {
                stats.out_of_bounds += 1;
            }
            match agent.respawn {
                RespawnStatus::Idle => continue,
                RespawnStatus::Relocated { .. } => stats.relocated += 1,
                RespawnStatus::Fallback { .. } => stats.fallbacks += 1,
                RespawnStatus::Deferred { .. } => stats.deferred += 1,
            }
            match agent.respawn.trigger() {
                Some(RespawnTrigger::OutOfBounds) => stats.escaped += 1,
                Some(RespawnTrigger::Caught) => stats.caught += 1,
                Some(RespawnTrigger::Crowded) => stats.crowded += 1,
                Some(RespawnTrigger::Retry) => stats.retried += 1,
                None => {}
            }
        }
        stats
    }

    /// Agents that took the respawn path this tick.
    #[inline]
    pub fn respawns(&self) -> usize {
        self.relocated + self.fallbacks + self.deferred
    }
}
