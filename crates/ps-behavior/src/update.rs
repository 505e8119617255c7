//! One fan-out unit: the full per-agent pipeline for a tick.

use ps_agent::{Agent, RespawnStatus};
use ps_core::AgentRng;

use crate::{TickContext, motion, ranking, respawn};

/// Compute `agent`'s value in the next generation.
///
/// Ranking → respawn check → either relocation or motion.  Reads only the
/// context's previous generation and writes only the returned value and
/// `rng`, so any number of calls may run concurrently on distinct agents.
pub fn advance(agent: &Agent, ctx: &TickContext<'_>, rng: &mut AgentRng) -> Agent {
    let ranking = ranking::rank(agent, ctx);

    let mut next = Agent {
        id:                agent.id,
        category:          agent.category,
        position:          agent.position,
        previous_position: agent.position,
        radius:            agent.radius,
        color:             agent.color,
        respawn:           RespawnStatus::Idle,
        neighbors:         Vec::new(),
    };

    match respawn::check(agent, &ranking, ctx.config) {
        Some(trigger) => {
            // Neighbour cache stays empty: it would be stale after the move.
            let (position, status) = respawn::resolve(agent, trigger, ctx, rng);
            next.position = position;
            next.respawn = status;
        }
        None => {
            next.position = motion::step(agent, &ranking, ctx.config, rng);
            next.neighbors = ranking.allies;
        }
    }

    next
}
