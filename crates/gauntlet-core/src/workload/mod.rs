//! Benchmark workloads.
//!
//! Each workload is self-contained: it owns its buffers and counters for the
//! duration of one call and shares nothing with the others.

pub mod alloc;
pub mod concurrent;
pub mod counter;
pub mod numeric;
pub mod stack;
pub mod vector;

pub use alloc::{run_alloc_stress, AllocStressParams, AllocStressReport};
pub use concurrent::{
    run_concurrent_stress, ConcurrentStressParams, ConcurrentStressReport, InjectedFault,
};
pub use counter::{run_counter, CounterParams, CounterReport};
pub use stack::{run_stack_probe, StackProbeParams, StackProbeReport};
