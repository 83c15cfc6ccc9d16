//! Concurrency stress: many workers, many allocations each.
//!
//! Workers run on a dedicated rayon pool. Each worker returns a
//! [`WorkerOutcome`] to the coordinator; the only state shared between
//! workers is the success counter handed to them at launch.

use crate::bench::{codes, BenchWarning, Status};
use crate::config::{ALLOCS_PER_WORKER, CONCURRENT_ALLOC_SIZE, CONCURRENT_WORKERS};
use crate::error::Error;
use gauntlet_util::mem::try_zeroed_block;
use gauntlet_util::time::{duration_to_millis, timed};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::hint::black_box;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

/// Parameters for the concurrency stress workload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConcurrentStressParams {
    pub workers: u32,
    pub allocs_per_worker: u32,
    pub alloc_size: usize,
    /// Pool size; `None` uses available parallelism.
    pub threads: Option<usize>,
    /// Number of workers (lowest ids first) that fault halfway through.
    pub inject_faults: u32,
    /// How an injected fault manifests.
    #[serde(default)]
    pub fault_kind: InjectedFault,
}

/// Behaviour of a worker told to fault.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectedFault {
    /// Return a fault outcome.
    #[default]
    Fail,
    /// Panic inside the worker body.
    Panic,
}

impl Default for ConcurrentStressParams {
    fn default() -> Self {
        Self {
            workers: CONCURRENT_WORKERS,
            allocs_per_worker: ALLOCS_PER_WORKER,
            alloc_size: CONCURRENT_ALLOC_SIZE,
            threads: None,
            inject_faults: 0,
            fault_kind: InjectedFault::Fail,
        }
    }
}

impl ConcurrentStressParams {
    /// Theoretical maximum number of successful allocations.
    #[must_use]
    pub fn max_allocations(&self) -> u64 {
        u64::from(self.workers) * u64::from(self.allocs_per_worker)
    }
}

/// Why a worker stopped early.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fault {
    OutOfMemory { message: String },
    Injected,
    Panicked { message: String },
}

/// What a worker hands back to the join point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerOutcome {
    Completed { id: u32, allocations: u32 },
    Faulted { id: u32, allocations: u32, fault: Fault },
}

impl WorkerOutcome {
    #[must_use]
    pub fn is_faulted(&self) -> bool {
        matches!(self, Self::Faulted { .. })
    }
}

/// Counters shared by every worker of one run.
#[derive(Debug, Default)]
pub struct StressCounters {
    pub success: AtomicU64,
    pub failed_workers: AtomicU64,
}

/// A faulted worker as it appears in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerFault {
    pub worker: u32,
    pub allocations: u32,
    pub fault: Fault,
}

/// Result of the concurrency stress workload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcurrentStressReport {
    pub params: ConcurrentStressParams,
    /// Worker pool size actually used.
    pub pool_threads: usize,
    pub total_success: u64,
    pub max_success: u64,
    pub failed_workers: u64,
    pub elapsed_ms: u64,
    pub status: Status,
    pub faults: Vec<WorkerFault>,
    pub warnings: Vec<BenchWarning>,
}

/// Run the fan-out, wait for every worker, aggregate the outcomes.
///
/// # Errors
/// Returns [`Error::ThreadPool`] if the worker pool cannot be created.
pub fn run_concurrent_stress(params: ConcurrentStressParams) -> Result<ConcurrentStressReport, Error> {
    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("gauntlet-worker-{i}"));
    if let Some(threads) = params.threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;
    let pool_threads = pool.current_num_threads();

    tracing::debug!(
        workers = params.workers,
        allocs = params.allocs_per_worker,
        size = params.alloc_size,
        pool_threads,
        "starting concurrent stress"
    );

    let counters = StressCounters::default();
    let (outcomes, elapsed) = timed(|| {
        pool.install(|| {
            (0..params.workers)
                .into_par_iter()
                .map(|id| supervise_worker(id, &params, &counters))
                .collect::<Vec<_>>()
        })
    });

    let faults: Vec<WorkerFault> = outcomes
        .into_iter()
        .filter_map(|outcome| match outcome {
            WorkerOutcome::Faulted {
                id,
                allocations,
                fault,
            } => Some(WorkerFault {
                worker: id,
                allocations,
                fault,
            }),
            WorkerOutcome::Completed { .. } => None,
        })
        .collect();

    let failed_workers = counters.failed_workers.load(Ordering::Relaxed);
    debug_assert_eq!(failed_workers, faults.len() as u64);

    let mut warnings = Vec::new();
    if params.inject_faults > 0 {
        warnings.push(BenchWarning::warn(
            codes::INJECTED_FAULTS,
            format!("{} workers were told to fault", params.inject_faults),
        ));
    }

    Ok(ConcurrentStressReport {
        params,
        pool_threads,
        total_success: counters.success.load(Ordering::Relaxed),
        max_success: params.max_allocations(),
        failed_workers,
        elapsed_ms: duration_to_millis(elapsed),
        status: if failed_workers == 0 {
            Status::Passed
        } else {
            Status::Failed
        },
        faults,
        warnings,
    })
}

/// Worker boundary: a panic inside the body becomes a fault, never a crash.
fn supervise_worker(id: u32, params: &ConcurrentStressParams, counters: &StressCounters) -> WorkerOutcome {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| run_worker(id, params, counters)))
        .unwrap_or_else(|payload| WorkerOutcome::Faulted {
            id,
            allocations: 0,
            fault: Fault::Panicked {
                message: panic_message(payload.as_ref()),
            },
        });

    if let WorkerOutcome::Faulted { fault, .. } = &outcome {
        counters.failed_workers.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(worker = id, ?fault, "worker faulted");
    }
    outcome
}

fn run_worker(id: u32, params: &ConcurrentStressParams, counters: &StressCounters) -> WorkerOutcome {
    let fault_at = (id < params.inject_faults).then_some(params.allocs_per_worker / 2);

    for done in 0..params.allocs_per_worker {
        if fault_at == Some(done) {
            return inject_fault(id, done, params.fault_kind);
        }

        let mut block = match try_zeroed_block(params.alloc_size) {
            Ok(block) => block,
            Err(e) => {
                return WorkerOutcome::Faulted {
                    id,
                    allocations: done,
                    fault: Fault::OutOfMemory {
                        message: e.to_string(),
                    },
                }
            }
        };
        if let Some(first) = block.first_mut() {
            *first = id as u8;
        }
        black_box(&block);
        counters.success.fetch_add(1, Ordering::Relaxed);
    }

    // Reached with a pending fault only when there are no allocations to make.
    if let Some(done) = fault_at {
        return inject_fault(id, done, params.fault_kind);
    }

    WorkerOutcome::Completed {
        id,
        allocations: params.allocs_per_worker,
    }
}

fn inject_fault(id: u32, done: u32, kind: InjectedFault) -> WorkerOutcome {
    match kind {
        InjectedFault::Fail => WorkerOutcome::Faulted {
            id,
            allocations: done,
            fault: Fault::Injected,
        },
        InjectedFault::Panic => panic!("injected panic in worker {id} after {done} allocations"),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
