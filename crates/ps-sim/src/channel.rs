//! Snapshot Channel: a bounded FIFO of published generations.
//!
//! One producer (the tick loop) and one consumer (the renderer).  `publish`
//! blocks while `depth` snapshots are waiting, which throttles the
//! simulation to the consumer instead of dropping data.  The consumer side
//! never blocks unless it asks to.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TryRecvError};
use std::time::Duration;

use ps_agent::Snapshot;

use crate::{SimError, SimResult};

/// Create a connected publisher/receiver pair holding at most `depth`
/// unconsumed snapshots.  A `depth` of 0 is raised to 1.
pub fn snapshot_channel(depth: usize) -> (SnapshotPublisher, SnapshotReceiver) {
    let (tx, rx) = mpsc::sync_channel(depth.max(1));
    (SnapshotPublisher { tx }, SnapshotReceiver { rx })
}

/// Producer half, owned by the tick loop.
pub struct SnapshotPublisher {
    tx: SyncSender<Snapshot>,
}

impl SnapshotPublisher {
    /// Enqueue `snapshot`, blocking while the channel is full.
    ///
    /// Returns [`SimError::Disconnected`] once the receiver has been dropped,
    /// including when it is dropped while this call is blocked.
    pub fn publish(&self, snapshot: Snapshot) -> SimResult<()> {
        self.tx.send(snapshot).map_err(|_| SimError::Disconnected)
    }
}

/// Consumer half, owned by the renderer (usually through a
/// [`SimHandle`][crate::SimHandle]).
pub struct SnapshotReceiver {
    rx: Receiver<Snapshot>,
}

impl SnapshotReceiver {
    /// The oldest unconsumed snapshot, or `None` if nothing is waiting.
    ///
    /// Never blocks.  `Err(Disconnected)` means the producer is gone and the
    /// queue is drained.
    pub fn try_consume(&self) -> SimResult<Option<Snapshot>> {
        match self.rx.try_recv() {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(SimError::Disconnected),
        }
    }

    /// Drain the queue and return the newest snapshot together with the
    /// number of older ones discarded, or `None` if nothing is waiting.
    ///
    /// For renderers that only ever draw the most recent tick.  Every
    /// snapshot drained frees a slot, so a producer blocked on a full
    /// channel resumes.
    pub fn try_latest(&self) -> SimResult<Option<(Snapshot, usize)>> {
        let Some(mut latest) = self.try_consume()? else {
            return Ok(None);
        };
        let mut skipped = 0;
        while let Ok(newer) = self.rx.try_recv() {
            latest = newer;
            skipped += 1;
        }
        Ok(Some((latest, skipped)))
    }

    /// Wait up to `timeout` for the next snapshot.  `Ok(None)` on timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> SimResult<Option<Snapshot>> {
        match self.rx.recv_timeout(timeout) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(SimError::Disconnected),
        }
    }
}
