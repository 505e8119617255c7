//! Simulation configuration bundle and named presets.
//!
//! Typically built from a [`Preset`] and tweaked in code, or loaded from
//! JSON by the application crate (with the `serde` feature; missing fields
//! take their defaults).

use std::fmt;
use std::str::FromStr;

use crate::{Category, Color, PsError, PsResult};

// ── Per-category settings ─────────────────────────────────────────────────────

/// Crowding rule: when is the nearest same-category ally too close?
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Separation {
    /// Allies never trigger a respawn.
    Off,
    /// Allies closer than the sum of both radii trigger a respawn.
    #[default]
    Touching,
    /// Allies closer than this fixed distance trigger a respawn.
    Fixed(f32),
}

impl Separation {
    /// Distance below which an ally of `ally_radius` counts as crowding an
    /// agent of `own_radius`, or `None` when crowding is disabled.
    #[inline]
    pub fn threshold(self, own_radius: f32, ally_radius: f32) -> Option<f32> {
        match self {
            Separation::Off      => None,
            Separation::Touching => Some(own_radius + ally_radius),
            Separation::Fixed(d) => Some(d),
        }
    }
}

/// Settings shared by every agent of one [`Category`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryConfig {
    /// Agents created in the initial batch.
    pub count: usize,
    /// Collision radius.
    pub radius: f32,
    /// Length of the per-tick pursuit displacement.
    pub speed: f32,
    pub color: Color,
    /// Respawn when the nearest opponent overlaps this agent ("caught").
    pub respawn_on_contact: bool,
    pub separation: Separation,
}

// ── Exhaustion policy ─────────────────────────────────────────────────────────

/// What the respawn resolver does when every attempt overlaps another agent.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExhaustionPolicy {
    /// Place the agent at the final sample even though it overlaps.  The
    /// overlap is transient: the next tick's trigger check sees it.
    #[default]
    AcceptLastSample,
    /// Leave the agent where it was and retry with a fresh budget next tick.
    /// An out-of-bounds agent stays out of bounds until a retry succeeds.
    RetryNextTick,
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Agents must stay within this distance of the origin.
    pub world_radius: f32,

    /// Radius of the disk respawn positions are drawn from.  `None` uses
    /// `world_radius`; must not exceed it.
    pub respawn_radius: Option<f32>,

    /// `k`: number of nearest same-category allies cached per agent.
    pub neighbor_count: usize,

    /// Radius of the random jitter disk added to every motion step.
    pub jitter: f32,

    /// Rejection-sampling budget of the respawn resolver.
    pub respawn_attempts: u32,

    pub exhaustion_policy: ExhaustionPolicy,

    /// Generations the snapshot channel holds before the producer blocks.
    pub channel_depth: usize,

    /// Fan-out pool size.  `None` uses all logical cores.
    pub num_threads: Option<usize>,

    pub runners: CategoryConfig,
    pub hunters: CategoryConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Preset::Trails.config()
    }
}

impl SimConfig {
    /// Settings for `category`.
    #[inline]
    pub fn category(&self, category: Category) -> &CategoryConfig {
        match category {
            Category::Runner => &self.runners,
            Category::Hunter => &self.hunters,
        }
    }

    #[inline]
    pub fn category_mut(&mut self, category: Category) -> &mut CategoryConfig {
        match category {
            Category::Runner => &mut self.runners,
            Category::Hunter => &mut self.hunters,
        }
    }

    /// Effective respawn disk radius.
    #[inline]
    pub fn respawn_radius(&self) -> f32 {
        self.respawn_radius.unwrap_or(self.world_radius)
    }

    /// Total agents across all categories.
    pub fn agent_count(&self) -> usize {
        Category::ALL.iter().map(|&c| self.category(c).count).sum()
    }

    /// Largest displacement one motion step can produce.  An agent that
    /// steps out of bounds is at most this far past `world_radius`.
    pub fn max_step(&self) -> f32 {
        let speed = Category::ALL
            .iter()
            .map(|&c| self.category(c).speed)
            .fold(0.0_f32, f32::max);
        speed + self.jitter
    }

    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> PsResult<()> {
        fn positive(name: &str, v: f32) -> PsResult<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(PsError::Config(format!("{name} must be positive and finite, got {v}")))
            }
        }
        fn non_negative(name: &str, v: f32) -> PsResult<()> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(PsError::Config(format!("{name} must be non-negative and finite, got {v}")))
            }
        }

        positive("world_radius", self.world_radius)?;
        if let Some(r) = self.respawn_radius {
            positive("respawn_radius", r)?;
            if r > self.world_radius {
                return Err(PsError::Config(format!(
                    "respawn_radius {r} exceeds world_radius {}",
                    self.world_radius
                )));
            }
        }
        non_negative("jitter", self.jitter)?;
        if self.respawn_attempts == 0 {
            return Err(PsError::Config("respawn_attempts must be at least 1".into()));
        }
        if self.channel_depth == 0 {
            return Err(PsError::Config("channel_depth must be at least 1".into()));
        }
        if self.num_threads == Some(0) {
            return Err(PsError::Config("num_threads must be at least 1 when set".into()));
        }
        if u32::try_from(self.agent_count()).is_err() {
            return Err(PsError::Config(format!("too many agents: {}", self.agent_count())));
        }

        for category in Category::ALL {
            let c = self.category(category);
            positive(&format!("{category}.radius"), c.radius)?;
            non_negative(&format!("{category}.speed"), c.speed)?;
            if let Separation::Fixed(d) = c.separation {
                non_negative(&format!("{category}.separation"), d)?;
            }
        }
        Ok(())
    }
}

// ── Presets ───────────────────────────────────────────────────────────────────

/// Named parameter sets reproducing the classic pursuit sketches.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Preset {
    /// Few, small agents; crowding by touching; long neighbour trails.
    #[default]
    Trails,
    /// Large, equal-sized agents in a tighter world; Hunters ignore contact.
    Dense,
    /// Hundreds of tiny agents; Runners never crowd.
    Swarm,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Trails, Preset::Dense, Preset::Swarm];

    pub fn as_str(self) -> &'static str {
        match self {
            Preset::Trails => "trails",
            Preset::Dense  => "dense",
            Preset::Swarm  => "swarm",
        }
    }

    /// Build the full configuration for this preset.
    pub fn config(self) -> SimConfig {
        let base = SimConfig {
            seed:              42,
            world_radius:      560.0,
            respawn_radius:    None,
            neighbor_count:    4,
            jitter:            0.2,
            respawn_attempts:  10,
            exhaustion_policy: ExhaustionPolicy::AcceptLastSample,
            channel_depth:     20,
            num_threads:       None,
            runners: CategoryConfig {
                count:              45,
                radius:             3.0,
                speed:              0.5,
                color:              Color::rgb(0xae, 0xa0, 0x00),
                respawn_on_contact: true,
                separation:         Separation::Touching,
            },
            hunters: CategoryConfig {
                count:              15,
                radius:             5.0,
                speed:              0.4,
                color:              Color::rgb(0x00, 0x0e, 0xae),
                respawn_on_contact: false,
                separation:         Separation::Touching,
            },
        };

        match self {
            Preset::Trails => base,
            Preset::Dense => SimConfig {
                world_radius:   500.0,
                respawn_radius: Some(400.0),
                jitter:         0.4,
                runners: CategoryConfig {
                    count:      100,
                    radius:     15.0,
                    speed:      1.2,
                    color:      Color::rgb(0xff, 0x00, 0x00),
                    separation: Separation::Fixed(4.0),
                    ..base.runners.clone()
                },
                hunters: CategoryConfig {
                    count:      30,
                    radius:     15.0,
                    speed:      0.9,
                    color:      Color::rgb(0x00, 0x00, 0xff),
                    separation: Separation::Fixed(4.0),
                    ..base.hunters.clone()
                },
                ..base
            },
            Preset::Swarm => SimConfig {
                world_radius:   1500.0,
                respawn_radius: Some(400.0),
                neighbor_count: 5,
                runners: CategoryConfig {
                    count:      300,
                    radius:     1.5,
                    color:      Color::rgb(0x91, 0x00, 0x00),
                    separation: Separation::Off,
                    ..base.runners.clone()
                },
                hunters: CategoryConfig {
                    count:      100,
                    radius:     1.5,
                    color:      Color::rgb(0x00, 0x00, 0x00),
                    separation: Separation::Fixed(2.0),
                    ..base.hunters.clone()
                },
                ..base
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = PsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| PsError::Parse(format!("unknown preset {s:?}")))
    }
}
