//! Per-agent state.

use ps_core::{AgentId, Category, Color, Vec2};

/// A ranked reference to another agent, copied by value from the generation
/// it was ranked against.  Never a live pointer: it describes where the other
/// agent was at the start of the tick.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Neighbor {
    pub id:       AgentId,
    pub position: Vec2,
    pub radius:   f32,
    /// Distance from the querying point to `position`.
    pub distance: f32,
}

/// Why an agent was sent to the respawn resolver.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RespawnTrigger {
    /// Farther from the origin than `world_radius`.
    OutOfBounds,
    /// Overlapped by its nearest opponent.
    Caught,
    /// Nearest ally closer than the category's separation threshold.
    Crowded,
    /// Resolver ran out of attempts last tick under `RetryNextTick`.
    Retry,
}

/// Outcome of this tick's respawn check.
///
/// Everything except `Idle` means the respawn path ran instead of the
/// motion update.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RespawnStatus {
    /// No trigger fired; the agent moved normally.
    #[default]
    Idle,
    /// Placed at a non-overlapping position after `attempts` samples.
    Relocated { trigger: RespawnTrigger, attempts: u32 },
    /// Budget exhausted; placed at the last (overlapping) sample.
    Fallback { trigger: RespawnTrigger },
    /// Budget exhausted; left in place and retried next tick.
    Deferred { trigger: RespawnTrigger },
}

impl RespawnStatus {
    /// The pending-respawn flag: set whenever the respawn path replaced the
    /// motion update this tick.
    #[inline]
    pub fn is_pending(self) -> bool {
        !matches!(self, RespawnStatus::Idle)
    }

    /// The trigger that sent the agent to the resolver, if any.
    pub fn trigger(self) -> Option<RespawnTrigger> {
        match self {
            RespawnStatus::Idle                      => None,
            RespawnStatus::Relocated { trigger, .. } => Some(trigger),
            RespawnStatus::Fallback { trigger }      => Some(trigger),
            RespawnStatus::Deferred { trigger }      => Some(trigger),
        }
    }
}

/// One simulated entity.
///
/// Agents are created once, in the initial batch, and persist for the whole
/// run.  Each tick produces a fresh `Agent` value in the next generation;
/// "death" is a relocation, never a removal.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    pub id:       AgentId,
    pub category: Category,
    pub position: Vec2,
    /// Position at the start of the tick that produced this value.  Only
    /// renderers read it (motion trails).
    pub previous_position: Vec2,
    pub radius:   f32,
    pub color:    Color,
    pub respawn:  RespawnStatus,
    /// The `k` nearest same-category allies from the tick's ranking, nearest
    /// first.  Recomputed every tick; empty after a relocation.
    pub neighbors: Vec<Neighbor>,
}

impl Agent {
    /// A freshly placed agent with no ranking history.
    pub fn new(id: AgentId, category: Category, position: Vec2, radius: f32, color: Color) -> Self {
        Self {
            id,
            category,
            position,
            previous_position: position,
            radius,
            color,
            respawn:   RespawnStatus::Idle,
            neighbors: Vec::new(),
        }
    }

    #[inline]
    pub fn pending_respawn(&self) -> bool {
        self.respawn.is_pending()
    }

    /// `true` if the agent lies within `world_radius` of the origin.
    #[inline]
    pub fn in_bounds(&self, world_radius: f32) -> bool {
        self.position.distance_to_origin() <= world_radius
    }

    /// Sum of both radii: closer centres than this overlap.
    #[inline]
    pub fn contact_distance(&self, other_radius: f32) -> f32 {
        self.radius + other_radius
    }
}
