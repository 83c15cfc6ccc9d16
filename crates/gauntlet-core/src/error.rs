use gauntlet_util::mem::AllocError;
use thiserror::Error;

/// Core error type for gauntlet workloads.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Allocation #{index} failed: {source}")]
    Alloc {
        index: u64,
        #[source]
        source: AllocError,
    },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Failed to spawn {name} thread: {source}")]
    Spawn {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Stack probe thread panicked")]
    ProbePanicked,

    #[error("Counter mismatch: expected {expected}, observed {observed}")]
    CounterMismatch { expected: u64, observed: u64 },

    #[error("{0}")]
    Other(String),
}

impl Error {
    #[must_use]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
