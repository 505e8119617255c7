//! `ps-behavior`: the per-agent update pipeline.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`context`] | `TickContext<'a>`: frozen previous generation shared by all units |
//! | [`ranking`] | Neighbor Ranking Engine: k nearest allies, nearest opponent, overlap |
//! | [`respawn`] | Trigger check and rejection-sampling relocation                 |
//! | [`motion`]  | Pursuit/evasion force plus jitter                               |
//! | [`update`]  | `advance`: ranking → respawn check → motion for one agent      |
//!
//! # Design notes
//!
//! Every function here is a pure transformation of one agent against the
//! previous generation, plus that agent's own RNG stream.  Nothing reads the
//! generation being written, so the tick scheduler in ps-sim can run
//! `advance` for all agents concurrently without locks.

pub mod context;
pub mod motion;
pub mod ranking;
pub mod respawn;
pub mod update;


pub use context::TickContext;
pub use ranking::Ranking;
pub use respawn::Placement;
pub use update::advance;
