use ps_core::PsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] PsError),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("failed to build fan-out thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to spawn simulation thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("simulation thread panicked")]
    WorkerPanicked,

    /// The other end of the snapshot channel is gone.
    #[error("snapshot channel disconnected")]
    Disconnected,
}

pub type SimResult<T> = Result<T, SimError>;
