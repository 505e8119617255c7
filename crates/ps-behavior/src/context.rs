//! Read-only tick state passed to every fan-out unit.

use ps_agent::{Agent, Generation};
use ps_core::{Category, SimConfig, Tick};

/// A frozen view of the previous generation plus the run configuration.
///
/// `TickContext` is built once per tick by ps-sim and shared immutably by
/// all units of the fan-out.  The per-category roster is computed here so
/// that each unit's candidate scan touches only the category it queries.
///
/// # Lifetimes
///
/// Borrows live for one tick's fan-out.  The scheduler only swaps in the new
/// generation after every unit has returned.
pub struct TickContext<'a> {
    /// Tick being computed (one past `generation.tick()`).
    pub tick: Tick,

    pub config: &'a SimConfig,

    /// `G_prev`: every ranking and overlap check reads this, never the
    /// generation under construction.
    pub generation: &'a Generation,

    /// Agent indices grouped by `Category::index()`.
    roster: [Vec<usize>; Category::COUNT],
}

impl<'a> TickContext<'a> {
    pub fn new(config: &'a SimConfig, generation: &'a Generation) -> Self {
        let mut roster: [Vec<usize>; Category::COUNT] = Default::default();
        for (i, agent) in generation.agents().iter().enumerate() {
            roster[agent.category.index()].push(i);
        }
        Self {
            tick: generation.tick().next(),
            config,
            generation,
            roster,
        }
    }

    /// Agents of `category` in the previous generation, in `AgentId` order.
    pub fn candidates(&self, category: Category) -> impl Iterator<Item = &'a Agent> + '_ {
        let agents = self.generation.agents();
        self.roster[category.index()].iter().map(move |&i| &agents[i])
    }

    /// Every agent in the previous generation.
    #[inline]
    pub fn everyone(&self) -> &'a [Agent] {
        self.generation.agents()
    }
}
