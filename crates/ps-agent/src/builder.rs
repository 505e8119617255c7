//! The initial placement batch: `Generation` at tick 0 plus its `AgentRngs`.
//!
//! # Usage
//!
//! ```rust
//! use ps_agent::PopulationBuilder;
//! use ps_core::SimConfig;
//!
//! let config = SimConfig::default();
//! let (generation, rngs) = PopulationBuilder::new(&config).build();
//!
//! assert_eq!(generation.len(), config.agent_count());
//! assert_eq!(rngs.len(), generation.len());
//! ```

use ps_core::{AgentId, Category, SimConfig, Tick};

use crate::{Agent, AgentRngs, Generation};

/// Creates every agent in one batch.
///
/// Agents are numbered category by category in [`Category::ALL`] order, and
/// each is placed uniformly within `world_radius` using its own RNG stream.
/// Initial positions are not checked for overlap; the first tick's trigger
/// check resolves any collisions.
pub struct PopulationBuilder<'a> {
    config: &'a SimConfig,
}

impl<'a> PopulationBuilder<'a> {
    pub fn new(config: &'a SimConfig) -> Self {
        Self { config }
    }

    /// Construct the tick-0 `Generation` and the matching `AgentRngs`.
    pub fn build(self) -> (Generation, AgentRngs) {
        let config = self.config;
        let mut rngs = AgentRngs::new(config.agent_count(), config.seed);
        let mut agents = Vec::with_capacity(config.agent_count());

        for category in Category::ALL {
            let settings = config.category(category);
            for _ in 0..settings.count {
                let id = AgentId(agents.len() as u32);
                let position = rngs.get_mut(id).in_disk(config.world_radius);
                agents.push(Agent::new(id, category, position, settings.radius, settings.color));
            }
        }

        (Generation::new(Tick::ZERO, agents), rngs)
    }
}
