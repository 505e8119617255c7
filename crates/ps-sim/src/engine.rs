//! Background runner: the perpetual tick loop on its own thread, and the
//! handle a renderer polls.
//!
//! ```text
//!  ┌──────────── ps-sim thread ────────────┐        ┌──── renderer ────┐
//!  │ loop until stop flag:                 │        │ every frame:     │
//!  │   Sim::step  (fan-out on rayon pool)  │ ─────▶ │   try_consume()  │
//!  │   publish(snapshot)  ← blocks if full │ depth  │   or try_latest()│
//!  └───────────────────────────────────────┘        └──────────────────┘
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use ps_agent::Snapshot;
use ps_core::{SimConfig, Tick};
use tracing::{info, warn};

use crate::channel::{SnapshotPublisher, SnapshotReceiver, snapshot_channel};
use crate::{NoopObserver, Sim, SimBuilder, SimError, SimObserver, SimResult};

/// Build a [`Sim`] from `config` and start its tick loop in the background.
pub fn start(config: SimConfig) -> SimResult<SimHandle> {
    start_with_observer(config, NoopObserver)
}

/// [`start`] with observer hooks, called on the simulation thread.
pub fn start_with_observer<O>(config: SimConfig, observer: O) -> SimResult<SimHandle>
where
    O: SimObserver + Send + 'static,
{
    spawn(SimBuilder::new(config).build()?, observer)
}

/// Start the tick loop for an already-built `sim`.  The channel depth is
/// taken from `sim.config().channel_depth`.
pub fn spawn<O>(sim: Sim, observer: O) -> SimResult<SimHandle>
where
    O: SimObserver + Send + 'static,
{
    let (publisher, receiver) = snapshot_channel(sim.config().channel_depth);
    let stop = Arc::new(AtomicBool::new(false));
    let published = Arc::new(AtomicU64::new(0));

    let worker = {
        let stop = Arc::clone(&stop);
        let published = Arc::clone(&published);
        thread::Builder::new()
            .name("ps-sim".into())
            .spawn(move || run_loop(sim, observer, publisher, &stop, &published))?
    };

    Ok(SimHandle {
        receiver: Some(receiver),
        stop,
        published,
        worker: Some(worker),
    })
}

fn run_loop<O: SimObserver>(
    mut sim:      Sim,
    mut observer: O,
    publisher:    SnapshotPublisher,
    stop:         &AtomicBool,
    published:    &AtomicU64,
) -> Tick {
    info!(
        agents  = sim.generation().len(),
        threads = sim.num_threads(),
        depth   = sim.config().channel_depth,
        "simulation started"
    );

    while !stop.load(Ordering::Acquire) {
        sim.step_observed(&mut observer);
        if publisher.publish(sim.snapshot()).is_err() {
            break;
        }
        published.fetch_add(1, Ordering::AcqRel);
    }

    let final_tick = sim.tick();
    observer.on_sim_end(final_tick);
    info!(final_tick = final_tick.0, published = published.load(Ordering::Acquire), "simulation stopped");
    final_tick
}

/// A running simulation.
///
/// Dropping the handle stops the simulation and joins its thread, like
/// [`stop`](SimHandle::stop) but discarding the result.
pub struct SimHandle {
    receiver:  Option<SnapshotReceiver>,
    stop:      Arc<AtomicBool>,
    published: Arc<AtomicU64>,
    worker:    Option<JoinHandle<Tick>>,
}

impl SimHandle {
    fn receiver(&self) -> SimResult<&SnapshotReceiver> {
        self.receiver.as_ref().ok_or(SimError::Disconnected)
    }

    /// The oldest unconsumed snapshot, or `None` if the simulation has not
    /// published anything new.  Never blocks.
    pub fn try_consume(&self) -> SimResult<Option<Snapshot>> {
        self.receiver()?.try_consume()
    }

    /// The newest waiting snapshot and how many older ones were skipped.
    pub fn try_latest(&self) -> SimResult<Option<(Snapshot, usize)>> {
        self.receiver()?.try_latest()
    }

    /// Wait up to `timeout` for the next snapshot.
    pub fn recv_timeout(&self, timeout: Duration) -> SimResult<Option<Snapshot>> {
        self.receiver()?.recv_timeout(timeout)
    }

    /// Snapshots accepted by the channel so far.  Equals the tick of the
    /// newest published generation.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Acquire)
    }

    /// True once the simulation thread has exited.
    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop the simulation and wait for its thread.
    ///
    /// The tick in flight, if any, runs to completion.  Unconsumed snapshots
    /// are discarded.  Returns the last completed tick.
    pub fn stop(mut self) -> SimResult<Tick> {
        self.shutdown().unwrap_or(Err(SimError::WorkerPanicked))
    }

    fn shutdown(&mut self) -> Option<SimResult<Tick>> {
        let worker = self.worker.take()?;
        self.stop.store(true, Ordering::Release);
        // Dropping the receiver wakes a producer blocked on a full channel.
        self.receiver = None;
        Some(worker.join().map_err(|_| SimError::WorkerPanicked))
    }
}

impl Drop for SimHandle {
    fn drop(&mut self) {
        if let Some(Err(e)) = self.shutdown() {
            warn!(error = %e, "simulation thread did not stop cleanly");
        }
    }
}
