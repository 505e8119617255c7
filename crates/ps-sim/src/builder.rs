//! Fluent builder for constructing a [`Sim`].

use ps_agent::{Generation, PopulationBuilder};
use ps_core::{PsError, SimConfig, Vec2};
use rayon::ThreadPoolBuilder;
use tracing::debug;

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                                      |
/// |--------------------------|----------------------------------------------|
/// | `.initial_positions(v)`  | Uniform in the world disk, per-agent RNG     |
///
/// # Example
///
/// ```rust
/// use ps_core::Preset;
/// use ps_sim::{NoopObserver, SimBuilder};
///
/// let mut sim = SimBuilder::new(Preset::Trails.config()).build()?;
/// sim.run_ticks(10, &mut NoopObserver);
/// assert_eq!(sim.tick().0, 10);
/// # Ok::<(), ps_sim::SimError>(())
/// ```
pub struct SimBuilder {
    config:    SimConfig,
    positions: Option<Vec<Vec2>>,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self { config, positions: None }
    }

    /// Override the initial position of every agent, indexed by `AgentId`.
    ///
    /// Must be length `config.agent_count()`.  Positions are not checked
    /// against the world bound or for overlap; the first tick handles both.
    pub fn initial_positions(mut self, positions: Vec<Vec2>) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Validate the configuration, place the population, and build the
    /// fan-out pool.
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;

        let (mut generation, rngs) = PopulationBuilder::new(&self.config).build();

        if let Some(positions) = self.positions {
            if positions.len() != generation.len() {
                return Err(SimError::AgentCountMismatch {
                    expected: generation.len(),
                    got:      positions.len(),
                    what:     "initial positions",
                });
            }
            if let Some(bad) = positions.iter().find(|p| !p.is_finite()) {
                return Err(PsError::Config(format!("initial position {bad} is not finite")).into());
            }
            let mut agents = generation.agents().to_vec();
            for (agent, position) in agents.iter_mut().zip(positions) {
                agent.position = position;
                agent.previous_position = position;
            }
            generation = Generation::new(generation.tick(), agents);
        }

        let mut pool = ThreadPoolBuilder::new().thread_name(|i| format!("ps-fanout-{i}"));
        if let Some(n) = self.config.num_threads {
            pool = pool.num_threads(n);
        }
        let pool = pool.build()?;

        debug!(
            agents  = generation.len(),
            threads = pool.current_num_threads(),
            seed    = self.config.seed,
            "simulation built"
        );

        Ok(Sim::new(self.config, generation, rngs, pool))
    }
}
