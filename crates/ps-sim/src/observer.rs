//! Simulation observer trait for progress reporting and data collection.

use ps_agent::Generation;
use ps_core::Tick;
use tracing::info;

use crate::TickStats;

/// Callbacks invoked by [`Sim::run_ticks`][crate::Sim::run_ticks] and the
/// background engine at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: catch counter
///
/// ```rust
/// use ps_core::Tick;
/// use ps_sim::{SimObserver, TickStats};
///
/// #[derive(Default)]
/// struct CatchCounter { total: usize }
///
/// impl SimObserver for CatchCounter {
///     fn on_tick_end(&mut self, _tick: Tick, stats: &TickStats) {
///         self.total += stats.caught;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before the fan-out of `tick` starts.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after the barrier, once the generation for `tick` is complete.
    fn on_tick_end(&mut self, _tick: Tick, _stats: &TickStats) {}

    /// Read-only access to the full internal state of the completed
    /// generation, including respawn status and neighbour caches that the
    /// renderer-facing snapshot leaves out.
    fn on_generation(&mut self, _generation: &Generation) {}

    /// Called once when the engine stops.  `final_tick` is the last completed
    /// tick.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Logs a tick summary at `info` level every `interval` ticks.
pub struct TracingObserver {
    interval: u64,
}

impl TracingObserver {
    /// `interval` of 0 is treated as 1.
    pub fn new(interval: u64) -> Self {
        Self { interval: interval.max(1) }
    }
}

impl SimObserver for TracingObserver {
    fn on_tick_end(&mut self, tick: Tick, stats: &TickStats) {
        if tick.0 % self.interval != 0 {
            return;
        }
        info!(
            tick          = tick.0,
            agents        = stats.agents,
            respawns      = stats.respawns(),
            caught        = stats.caught,
            crowded       = stats.crowded,
            escaped       = stats.escaped,
            fallbacks     = stats.fallbacks,
            deferred      = stats.deferred,
            out_of_bounds = stats.out_of_bounds,
            "tick summary"
        );
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        info!(final_tick = final_tick.0, "simulation finished");
    }
}
