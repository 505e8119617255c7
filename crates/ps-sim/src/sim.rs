//! The `Sim` struct and its tick loop.

use ps_agent::{Agent, AgentRngs, Generation, Snapshot};
use ps_behavior::{TickContext, advance};
use ps_core::{Category, PsError, SimConfig, Tick};
use rayon::ThreadPool;
use rayon::prelude::*;
use tracing::debug;

use crate::{SimObserver, SimResult, TickStats};

/// The tick scheduler.
///
/// Each call to [`step`](Sim::step) runs one tick:
///
/// 1. **Snapshot-read**: the current generation becomes `G_prev`, wrapped in a
///    [`TickContext`] shared immutably by every unit.
/// 2. **Fan-out**: [`advance`] runs once per agent on the sim's thread pool.
///    Each unit reads `G_prev`, owns one `&mut AgentRng`, and returns its
///    agent's next value.
/// 3. **Barrier**: the parallel `collect` returns only when every unit has
///    finished, producing the next generation in `AgentId` order.
/// 4. **Swap**: the new generation replaces `G_prev`.
///
/// Publishing is left to the caller (see [`crate::engine`]), so a `Sim` can
/// also be stepped directly in tests and batch runs.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Always valid; replaced only through [`Sim::set_config`].
    config: SimConfig,

    generation: Generation,

    /// Per-agent deterministic RNGs, separated for the split-borrow pattern.
    rngs: AgentRngs,

    /// Reused fan-out pool; sized by `config.num_threads`.
    pool: ThreadPool,
}

impl Sim {
    pub(crate) fn new(config: SimConfig, generation: Generation, rngs: AgentRngs, pool: ThreadPool) -> Self {
        Self { config, generation, rngs, pool }
    }

    // ── Public API ────────────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Replace the run configuration between ticks.
    ///
    /// `config` must pass [`SimConfig::validate`].  Settings baked into the
    /// population or the pool at build time (seed, thread count, and each
    /// category's count, radius and colour) must be unchanged.  On error the
    /// current configuration stays in place.
    pub fn set_config(&mut self, config: SimConfig) -> SimResult<()> {
        config.validate()?;
        if let Some(field) = fixed_field_changed(&self.config, &config) {
            return Err(PsError::Config(format!(
                "{field} cannot change after the simulation is built"
            ))
            .into());
        }
        self.config = config;
        Ok(())
    }

    /// The most recently completed generation.
    #[inline]
    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    /// Tick of the most recently completed generation.
    #[inline]
    pub fn tick(&self) -> Tick {
        self.generation.tick()
    }

    /// Renderer-facing copy of the current generation.
    pub fn snapshot(&self) -> Snapshot {
        self.generation.snapshot()
    }

    /// Fan-out pool size.
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run exactly `n` ticks, calling observer hooks at every tick boundary.
    pub fn run_ticks<O: SimObserver + ?Sized>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step_observed(observer);
        }
    }

    /// Run one tick with observer hooks.
    pub fn step_observed<O: SimObserver + ?Sized>(&mut self, observer: &mut O) -> TickStats {
        observer.on_tick_start(self.tick().next());
        let stats = self.step();
        observer.on_tick_end(stats.tick, &stats);
        observer.on_generation(&self.generation);
        stats
    }

    /// Compute the next generation from the current one.
    pub fn step(&mut self) -> TickStats {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let Sim { config, generation, rngs, pool } = self;

        let ctx = TickContext::new(config, generation);
        let tick = ctx.tick;

        let agents: Vec<Agent> = pool.install(|| {
            generation
                .agents()
                .par_iter()
                .zip(rngs.inner.par_iter_mut())
                .map(|(agent, rng)| advance(agent, &ctx, rng))
                .collect()
        });

        *generation = Generation::new(tick, agents);

        let stats = TickStats::from_generation(generation, config.world_radius);
        debug!(
            tick      = tick.0,
            respawns  = stats.respawns(),
            fallbacks = stats.fallbacks,
            deferred  = stats.deferred,
            "tick complete"
        );
        stats
    }
}

/// First build-time setting that differs between `old` and `new`.
fn fixed_field_changed(old: &SimConfig, new: &SimConfig) -> Option<String> {
    if old.seed != new.seed {
        return Some("seed".into());
    }
    if old.num_threads != new.num_threads {
        return Some("num_threads".into());
    }
    for category in Category::ALL {
        let (a, b) = (old.category(category), new.category(category));
        if a.count != b.count {
            return Some(format!("{category}.count"));
        }
        if a.radius != b.radius {
            return Some(format!("{category}.radius"));
        }
        if a.color != b.color {
            return Some(format!("{category}.color"));
        }
    }
    None
}
