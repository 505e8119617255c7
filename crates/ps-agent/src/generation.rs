//! Immutable per-tick simulation state and its renderer-facing projection.

use std::sync::Arc;

use ps_core::{AgentId, Category, Color, Tick, Vec2};

use crate::Agent;

// ── Generation ────────────────────────────────────────────────────────────────

/// The complete agent state produced by one tick.
///
/// Indexed by `AgentId`: `agents()[id.index()].id == id` for every agent.
/// Once constructed a generation is never mutated; the next tick builds a
/// new one from it.
#[derive(Clone, Debug, PartialEq)]
pub struct Generation {
    tick:   Tick,
    agents: Vec<Agent>,
}

impl Generation {
    /// Wrap a fully computed agent set.
    ///
    /// # Panics
    /// Panics in debug mode if `agents` is not in `AgentId` order.
    pub fn new(tick: Tick, agents: Vec<Agent>) -> Self {
        debug_assert!(
            agents.iter().enumerate().all(|(i, a)| a.id.index() == i),
            "generation agents must be stored in AgentId order"
        );
        Self { tick, agents }
    }

    #[inline]
    pub fn tick(&self) -> Tick {
        self.tick
    }

    #[inline]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    #[inline]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.index())
    }

    /// Agents of one category, in `AgentId` order.
    pub fn of_category(&self, category: Category) -> impl Iterator<Item = &Agent> + '_ {
        self.agents.iter().filter(move |a| a.category == category)
    }

    /// Project into the read-only form handed to renderers.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick:   self.tick,
            agents: self.agents.iter().map(AgentView::from).collect(),
        }
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// What a renderer sees of one agent.  Respawn state and the neighbour cache
/// stay internal to the engine.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentView {
    pub position:          Vec2,
    pub previous_position: Vec2,
    pub radius:            f32,
    pub category:          Category,
    pub color:             Color,
}

impl From<&Agent> for AgentView {
    fn from(agent: &Agent) -> Self {
        Self {
            position:          agent.position,
            previous_position: agent.previous_position,
            radius:            agent.radius,
            category:          agent.category,
            color:             agent.color,
        }
    }
}

/// A published generation: immutable, cheap to clone, safe to hold across
/// frames.  Every view in it belongs to the same tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub tick:   Tick,
    pub agents: Arc<[AgentView]>,
}

impl Snapshot {
    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentView> + '_ {
        self.agents.iter()
    }
}
