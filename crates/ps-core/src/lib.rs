//! `ps-core`: foundational types for the pursuit simulation engine.
//!
//! This crate is a dependency of every other `ps-*` crate.  It intentionally
//! has no `ps-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`geo`]         | `Vec2`, distance and normalisation                    |
//! | [`ids`]         | `AgentId`                                             |
//! | [`time`]        | `Tick`                                                |
//! | [`category`]    | `Category`, `Heading`, `PursuitRule` dispatch table   |
//! | [`color`]       | `Color` (presentation only)                           |
//! | [`rng`]         | `AgentRng` (per-agent)                                |
//! | [`config`]      | `SimConfig`, `CategoryConfig`, `Preset`, policies     |
//! | [`error`]       | `PsError`, `PsResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required to load `SimConfig` from JSON.                    |

pub mod category;
pub mod color;
pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use category::{Category, Heading, PursuitRule};
pub use color::Color;
pub use config::{CategoryConfig, ExhaustionPolicy, Preset, Separation, SimConfig};
pub use error::{PsError, PsResult};
pub use geo::Vec2;
pub use ids::AgentId;
pub use rng::AgentRng;
pub use time::Tick;
