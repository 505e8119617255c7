//! Motion update: pursuit or evasion along the line to the nearest opponent,
//! plus a bounded random jitter.

use ps_agent::{Agent, Neighbor};
use ps_core::{AgentRng, SimConfig, Vec2};

use crate::Ranking;

/// Displacement of length `speed` along the line from `target` to `agent`,
/// signed by the agent's [`Heading`](ps_core::Heading): away for
/// Runners, toward for Hunters.
///
/// No target, or a target at exactly the same position, contributes `ZERO`.
pub fn pursuit_force(agent: &Agent, target: Option<&Neighbor>, speed: f32) -> Vec2 {
    let Some(target) = target else {
        return Vec2::ZERO;
    };
    let away = (agent.position - target.position).normalized_or_zero();
    away * (speed * agent.category.rule().heading.sign())
}

/// Random displacement drawn uniformly from the disk of radius `magnitude`.
#[inline]
pub fn jitter(rng: &mut AgentRng, magnitude: f32) -> Vec2 {
    rng.in_disk(magnitude)
}

/// New position for an agent that is not respawning this tick.
pub fn step(agent: &Agent, ranking: &Ranking, config: &SimConfig, rng: &mut AgentRng) -> Vec2 {
    let speed = config.category(agent.category).speed;
    agent.position
        + pursuit_force(agent, ranking.nearest_opponent.as_ref(), speed)
        + jitter(rng, config.jitter)
}
