//! `ps-sim`: tick scheduler and runner for the pursuit simulation engine.
//!
//! # Per-tick phases
//!
//! ```text
//! loop until stopped:
//!   ① Snapshot-read: freeze G_prev behind a TickContext.
//!   ② Fan-out      : ps_behavior::advance for every agent on the rayon
//!                     pool: ranking → respawn check → motion.
//!   ③ Barrier      : the parallel collect returns the complete G_next.
//!   ④ Publish      : G_next's Snapshot goes to the bounded channel,
//!                     blocking while `channel_depth` snapshots are waiting.
//! ```
//!
//! Results are bit-identical across thread counts: every unit reads only
//! `G_prev` and its own RNG stream, and the collect keeps `AgentId` order.
//!
//! # Quick-start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use ps_core::Preset;
//!
//! let handle = ps_sim::start(Preset::Swarm.config())?;
//! for _frame in 0..600 {
//!     if let Some((snapshot, _skipped)) = handle.try_latest()? {
//!         // draw snapshot.iter() ...
//!         let _ = snapshot.tick;
//!     }
//!     std::thread::sleep(Duration::from_millis(16));
//! }
//! handle.stop()?;
//! # Ok::<(), ps_sim::SimError>(())
//! ```

pub mod builder;
pub mod channel;
pub mod engine;
pub mod error;
pub mod observer;
pub mod sim;
pub mod stats;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use channel::{SnapshotPublisher, SnapshotReceiver, snapshot_channel};
pub use engine::{SimHandle, spawn, start, start_with_observer};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, TracingObserver};
pub use sim::Sim;
pub use stats::TickStats;
