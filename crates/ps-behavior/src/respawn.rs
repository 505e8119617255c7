//! Respawn / teleport resolver.
//!
//! Triggers are evaluated against the tick's ranking (built from the
//! previous generation).  A triggered agent skips its motion update; the
//! resolver draws up to `respawn_attempts` points uniformly from the respawn
//! disk and takes the first one clear of every other agent in the previous
//! generation.  If none is clear, [`ExhaustionPolicy`] decides.

use ps_agent::{Agent, RespawnStatus, RespawnTrigger};
use ps_core::{AgentRng, ExhaustionPolicy, SimConfig, Vec2};
use tracing::{trace, warn};

use crate::{Ranking, TickContext, ranking};

/// Result of the rejection-sampling loop.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Placement {
    /// `position` overlaps nobody; found on sample number `attempts`.
    Clear { position: Vec2, attempts: u32 },
    /// Every sample overlapped someone.  `last_sample` is the final draw.
    Exhausted { last_sample: Vec2 },
}

/// Which trigger, if any, sends `agent` to the resolver this tick.
///
/// Checked in priority order: a pending retry, the world bound, contact with
/// the nearest opponent, then crowding by the nearest ally.  Crowding is
/// one-sided: it fires only when the nearest ally has a lower `AgentId`.
pub fn check(agent: &Agent, ranking: &Ranking, config: &SimConfig) -> Option<RespawnTrigger> {
    if matches!(agent.respawn, RespawnStatus::Deferred { .. }) {
        return Some(RespawnTrigger::Retry);
    }

    if !agent.in_bounds(config.world_radius) {
        return Some(RespawnTrigger::OutOfBounds);
    }

    let settings = config.category(agent.category);

    if settings.respawn_on_contact {
        if let Some(opponent) = &ranking.nearest_opponent {
            if opponent.distance < agent.contact_distance(opponent.radius) {
                return Some(RespawnTrigger::Caught);
            }
        }
    }

    // Of a crowded pair only the higher id jumps; the other holds its place.
    if let Some(ally) = &ranking.nearest_ally {
        let threshold = settings.separation.threshold(agent.radius, ally.radius);
        if ally.id < agent.id && threshold.is_some_and(|t| ally.distance < t) {
            return Some(RespawnTrigger::Crowded);
        }
    }

    None
}

/// Draw candidate positions until one is clear of every other agent in the
/// previous generation, or the budget runs out.
pub fn find_position(agent: &Agent, ctx: &TickContext<'_>, rng: &mut AgentRng) -> Placement {
    let disk = ctx.config.respawn_radius();
    let mut last_sample = agent.position;

    for attempt in 1..=ctx.config.respawn_attempts {
        let candidate = rng.in_disk(disk);
        if ranking::deepest_overlap(candidate, agent.radius, agent.id, ctx.everyone()).is_none() {
            return Placement::Clear { position: candidate, attempts: attempt };
        }
        last_sample = candidate;
    }

    Placement::Exhausted { last_sample }
}

/// Relocate `agent` for `trigger` and apply the exhaustion policy.
///
/// Returns the agent's position after this tick and the status to record.
pub fn resolve(
    agent:   &Agent,
    trigger: RespawnTrigger,
    ctx:     &TickContext<'_>,
    rng:     &mut AgentRng,
) -> (Vec2, RespawnStatus) {
    match find_position(agent, ctx, rng) {
        Placement::Clear { position, attempts } => {
            trace!(agent = %agent.id, ?trigger, attempts, %position, "respawned");
            (position, RespawnStatus::Relocated { trigger, attempts })
        }
        Placement::Exhausted { last_sample } => match ctx.config.exhaustion_policy {
            ExhaustionPolicy::AcceptLastSample => {
                warn!(
                    agent    = %agent.id,
                    tick     = ctx.tick.0,
                    ?trigger,
                    budget   = ctx.config.respawn_attempts,
                    "respawn budget exhausted; accepting overlapping sample"
                );
                (last_sample, RespawnStatus::Fallback { trigger })
            }
            ExhaustionPolicy::RetryNextTick => {
                warn!(
                    agent    = %agent.id,
                    tick     = ctx.tick.0,
                    ?trigger,
                    budget   = ctx.config.respawn_attempts,
                    "respawn budget exhausted; retrying next tick"
                );
                (agent.position, RespawnStatus::Deferred { trigger })
            }
        },
    }
}
