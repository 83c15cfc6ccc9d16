//! Benchmark parameters and runtime configuration.
//!
//! Every worker count, size and bound used by a workload is a named constant
//! here. Defaults are fixed so that runs stay comparable across machines and
//! across implementations of the same workloads.

use serde::{Deserialize, Serialize};

/// Default number of allocations for `alloc-stress`.
pub const DEFAULT_ALLOC_TARGET: u64 = 1000;

/// Block size for `alloc-stress` (1 MiB).
pub const STRESS_BLOCK_SIZE: usize = 1024 * 1024;

/// Stride between forced page writes.
pub const TOUCH_STRIDE: usize = gauntlet_util::mem::PAGE_STRIDE;

/// Number of concurrent workers for `concurrent-stress`.
pub const CONCURRENT_WORKERS: u32 = 1000;

/// Allocations performed by each concurrent worker.
pub const ALLOCS_PER_WORKER: u32 = 1000;

/// Block size for `concurrent-stress` (64 KiB).
pub const CONCURRENT_ALLOC_SIZE: usize = 64 * 1024;

/// Stack reserved for the depth probe thread (1 GiB).
pub const PROBE_STACK_BYTES: usize = 1024 * 1024 * 1024;

/// Frames between two stack probe progress lines.
pub const PROGRESS_INTERVAL: u64 = 100_000;

/// Threads hammering the shared counter.
pub const COUNTER_THREADS: u32 = 8;

/// Increments per counter thread.
pub const COUNTER_INCREMENTS: u64 = 10_000_000;

/// Classic Tak arguments.
pub const TAK_ARGS: (i32, i32, i32) = (30, 20, 10);

// mixed suite
pub const MIXED_PRIME_LIMIT: u64 = 100_000;
pub const MIXED_CHURN_ALLOCS: u64 = 10_000;
pub const MIXED_CHURN_SIZE: usize = 1024;
pub const MIXED_FIB_N: u32 = 40;
pub const MIXED_PARALLEL_WORKERS: u32 = 4;
pub const MIXED_PARALLEL_LIMIT: u64 = 10_000;

// heavy suite
pub const HEAVY_FIB_N: u32 = 40;
pub const HEAVY_ALLOC_BLOCKS: u64 = 1_000_000;
pub const HEAVY_BLOCK_SIZE: usize = 1024;
pub const HEAVY_REQUESTS: u64 = 100_000;
pub const HEAVY_REQUEST_ITERATIONS: u64 = 10_000;
pub const HEAVY_SIEVE_LIMIT: usize = 10_000_000;
pub const HEAVY_VECTOR_LEN: usize = 10_000_000;

// extreme suite
pub const EXTREME_FIB_N: u32 = 42;
pub const EXTREME_BOXES: u64 = 10_000_000;
pub const EXTREME_REQUESTS: u64 = 1_000_000;
pub const EXTREME_REQUEST_ITERATIONS: u64 = 1000;
pub const EXTREME_SIEVE_LIMIT: usize = 50_000_000;

/// Parse the optional positional allocation target.
///
/// Missing or unparseable input falls back to `default`. The second value
/// reports whether the fallback was taken.
#[must_use]
pub fn parse_target(arg: Option<&str>, default: u64) -> (u64, bool) {
    match arg {
        None => (default, false),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(target) => (target, false),
            Err(_) => (default, true),
        },
    }
}

/// Number of hardware threads available to this process.
#[must_use]
pub fn available_threads() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}

/// Runtime configuration for the gauntlet CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Whether to emit JSON (reports on stdout, logs on stderr).
    pub json: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,

    /// Worker pool size override; `None` uses available parallelism.
    pub threads: Option<usize>,
}

impl Config {
    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON output.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Set the worker pool size. Zero means "use available parallelism".
    #[must_use]
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads.filter(|&n| n > 0);
        self
    }

    /// Effective worker pool size.
    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.threads.unwrap_or_else(available_threads)
    }
}
