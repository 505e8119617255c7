//! Neighbor Ranking Engine.
//!
//! Brute force: distance to every candidate, stable sort, take the
//! head.  O(|S| log |S|) per query and O(n² log n) per tick, which is fine
//! for the tens-to-hundreds of agents this engine targets.
//!
//! Ties keep candidate order (ascending `AgentId`) because the sort is
//! stable, but callers should not depend on how ties resolve.

use ps_agent::{Agent, Neighbor};
use ps_core::{AgentId, Vec2};

use crate::TickContext;

/// Result of ranking one agent against the previous generation.
#[derive(Clone, Debug, PartialEq)]
pub struct Ranking {
    /// Up to `k` nearest same-category agents, nearest first, never
    /// including the agent itself.
    pub allies: Vec<Neighbor>,
    /// Nearest same-category agent, tracked even when `k == 0`.
    pub nearest_ally: Option<Neighbor>,
    /// Nearest agent of the category this one pursues or evades.
    pub nearest_opponent: Option<Neighbor>,
}

#[inline]
fn neighbor(origin: Vec2, agent: &Agent) -> Neighbor {
    Neighbor {
        id:       agent.id,
        position: agent.position,
        radius:   agent.radius,
        distance: origin.distance(agent.position),
    }
}

/// Every candidate except `exclude`, sorted by ascending distance from
/// `origin`.
pub fn ranked<'g>(
    origin:     Vec2,
    exclude:    AgentId,
    candidates: impl IntoIterator<Item = &'g Agent>,
) -> Vec<Neighbor> {
    let mut table: Vec<Neighbor> = candidates
        .into_iter()
        .filter(|a| a.id != exclude)
        .map(|a| neighbor(origin, a))
        .collect();
    table.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    table
}

/// The `k` nearest candidates to `origin`, excluding `exclude`.
pub fn k_nearest<'g>(
    origin:     Vec2,
    exclude:    AgentId,
    candidates: impl IntoIterator<Item = &'g Agent>,
    k:          usize,
) -> Vec<Neighbor> {
    let mut table = ranked(origin, exclude, candidates);
    table.truncate(k);
    table
}

/// The single nearest candidate, excluding `exclude`.  O(|S|), no sort.
pub fn nearest<'g>(
    origin:     Vec2,
    exclude:    AgentId,
    candidates: impl IntoIterator<Item = &'g Agent>,
) -> Option<Neighbor> {
    candidates
        .into_iter()
        .filter(|a| a.id != exclude)
        .map(|a| neighbor(origin, a))
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// The candidate a circle of `radius` at `position` overlaps most deeply,
/// or `None` if it is clear of all of them.
///
/// Overlap means `distance < radius + other.radius`; touching exactly is
/// clear.  Depth is measured as combined radius minus distance, so a small
/// agent sitting inside a large one outranks a near miss.
pub fn deepest_overlap<'g>(
    position:   Vec2,
    radius:     f32,
    exclude:    AgentId,
    candidates: impl IntoIterator<Item = &'g Agent>,
) -> Option<Neighbor> {
    candidates
        .into_iter()
        .filter(|a| a.id != exclude)
        .map(|a| neighbor(position, a))
        .filter(|n| n.distance < radius + n.radius)
        .max_by(|a, b| {
            let depth_a = radius + a.radius - a.distance;
            let depth_b = radius + b.radius - b.distance;
            depth_a.total_cmp(&depth_b)
        })
}

/// Rank `agent` against the context's previous generation: its `k` nearest
/// allies and its nearest opponent.
pub fn rank(agent: &Agent, ctx: &TickContext<'_>) -> Ranking {
    let mut allies = ranked(agent.position, agent.id, ctx.candidates(agent.category));
    let nearest_ally = allies.first().copied();
    allies.truncate(ctx.config.neighbor_count);

    let nearest_opponent = nearest(
        agent.position,
        agent.id,
        ctx.candidates(agent.category.opponent()),
    );

    Ranking { allies, nearest_ally, nearest_opponent }
}
