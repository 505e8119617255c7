//! `ps-agent`: agent state and generations for the pursuit simulation engine.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`agent`]       | `Agent`, `Neighbor`, `RespawnStatus`, `RespawnTrigger`    |
//! | [`generation`]  | `Generation` (internal tick state), `Snapshot` + `AgentView` (renderer-facing) |
//! | [`rngs`]        | `AgentRngs`: per-agent RNG streams, parallel to a generation |
//! | [`builder`]     | `PopulationBuilder`: the initial placement batch         |
//!
//! # Ownership model
//!
//! A [`Generation`] is built once from the previous one and never mutated
//! afterwards.  The fan-out phase reads the previous generation through
//! `&Generation` while each unit holds `&mut AgentRng` for its own agent;
//! keeping the RNGs in [`AgentRngs`] rather than inside `Agent` is what lets
//! both borrows coexist.

pub mod agent;
pub mod builder;
pub mod generation;
pub mod rngs;


pub use agent::{Agent, Neighbor, RespawnStatus, RespawnTrigger};
pub use builder::PopulationBuilder;
pub use generation::{AgentView, Generation, Snapshot};
pub use rngs::AgentRngs;
