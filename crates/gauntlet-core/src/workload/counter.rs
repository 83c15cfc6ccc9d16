//! Lock-free counter: several threads hammering one atomic.

use crate::config::{COUNTER_INCREMENTS, COUNTER_THREADS};
use crate::error::Error;
use gauntlet_util::time::{duration_to_millis, timed};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CounterParams {
    pub threads: u32,
    pub increments: u64,
}

impl Default for CounterParams {
    fn default() -> Self {
        Self {
            threads: COUNTER_THREADS,
            increments: COUNTER_INCREMENTS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterReport {
    pub params: CounterParams,
    pub value: u64,
    pub elapsed_ms: u64,
    pub elapsed_ns: u64,
    /// Millions of increments per second across all threads.
    pub mops_per_sec: f64,
}

/// Run `threads` threads, each doing `increments` relaxed `fetch_add(1)` calls.
///
/// # Errors
/// Returns [`Error::Spawn`] if a thread cannot be started, or
/// [`Error::CounterMismatch`] if the final value is not `threads * increments`.
#[allow(clippy::cast_precision_loss)]
pub fn run_counter(params: CounterParams) -> Result<CounterReport, Error> {
    let counter = AtomicU64::new(0);

    let (spawned, elapsed) = timed(|| {
        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(params.threads as usize);
            for i in 0..params.threads {
                let counter = &counter;
                let handle = thread::Builder::new()
                    .name(format!("gauntlet-counter-{i}"))
                    .spawn_scoped(scope, move || {
                        for _ in 0..params.increments {
                            counter.fetch_add(1, Ordering::Relaxed);
                        }
                    })
                    .map_err(|source| Error::Spawn {
                        name: "counter",
                        source,
                    })?;
                handles.push(handle);
            }
            for handle in handles {
                handle
                    .join()
                    .map_err(|_| Error::other("counter thread panicked"))?;
            }
            Ok::<(), Error>(())
        })
    });
    spawned?;

    let expected = u64::from(params.threads) * params.increments;
    let value = counter.load(Ordering::SeqCst);
    if value != expected {
        return Err(Error::CounterMismatch {
            expected,
            observed: value,
        });
    }

    let elapsed_ns = elapsed.as_nanos() as u64;
    let secs = elapsed.as_secs_f64();
    let mops_per_sec = if secs > 0.0 {
        value as f64 / secs / 1_000_000.0
    } else {
        0.0
    };

    Ok(CounterReport {
        params,
        value,
        elapsed_ms: duration_to_millis(elapsed),
        elapsed_ns,
        mops_per_sec,
    })
}
