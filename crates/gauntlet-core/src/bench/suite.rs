//! Fixed benchmark suites.
//!
//! - `mixed`: trial-division primes, small-buffer churn, iterative Fibonacci
//!   and a few parallel prime counts, timed as a whole
//! - `heavy`: five individually timed workloads
//! - `extreme`: four long-running workloads folded into one checksum
//! - `tak`: a single Takeuchi call

use super::rusage;
use super::{BenchReport, BenchResult, ResourceUsage};
use crate::config;
use crate::error::Error;
use crate::workload::alloc::{box_churn, churn_small, retain_blocks};
use crate::workload::numeric::{
    count_primes, fib_iter, fib_rec, run_requests, sieve_count, tak, RequestShape,
};
use crate::workload::vector::vector_add;
use gauntlet_util::time::{duration_to_millis, timed};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::hint::black_box;

/// Parameters for the mixed suite.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MixedParams {
    pub prime_limit: u64,
    pub churn_allocs: u64,
    pub churn_size: usize,
    pub fib_n: u32,
    pub parallel_workers: u32,
    pub parallel_limit: u64,
}

impl Default for MixedParams {
    fn default() -> Self {
        Self {
            prime_limit: config::MIXED_PRIME_LIMIT,
            churn_allocs: config::MIXED_CHURN_ALLOCS,
            churn_size: config::MIXED_CHURN_SIZE,
            fib_n: config::MIXED_FIB_N,
            parallel_workers: config::MIXED_PARALLEL_WORKERS,
            parallel_limit: config::MIXED_PARALLEL_LIMIT,
        }
    }
}

/// Parameters for the heavy suite.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HeavyParams {
    pub fib_n: u32,
    pub alloc_blocks: u64,
    pub block_size: usize,
    pub requests: u64,
    pub request_iterations: u64,
    pub sieve_limit: usize,
    pub vector_len: usize,
}

impl Default for HeavyParams {
    fn default() -> Self {
        Self {
            fib_n: config::HEAVY_FIB_N,
            alloc_blocks: config::HEAVY_ALLOC_BLOCKS,
            block_size: config::HEAVY_BLOCK_SIZE,
            requests: config::HEAVY_REQUESTS,
            request_iterations: config::HEAVY_REQUEST_ITERATIONS,
            sieve_limit: config::HEAVY_SIEVE_LIMIT,
            vector_len: config::HEAVY_VECTOR_LEN,
        }
    }
}

/// Parameters for the extreme suite.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExtremeParams {
    pub fib_n: u32,
    pub boxes: u64,
    pub requests: u64,
    pub request_iterations: u64,
    pub sieve_limit: usize,
}

impl Default for ExtremeParams {
    fn default() -> Self {
        Self {
            fib_n: config::EXTREME_FIB_N,
            boxes: config::EXTREME_BOXES,
            requests: config::EXTREME_REQUESTS,
            request_iterations: config::EXTREME_REQUEST_ITERATIONS,
            sieve_limit: config::EXTREME_SIEVE_LIMIT,
        }
    }
}

/// Arguments for the Tak suite.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TakParams {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Default for TakParams {
    fn default() -> Self {
        let (x, y, z) = config::TAK_ARGS;
        Self { x, y, z }
    }
}

/// Time one workload and turn it into a result line.
fn measure_one<T: Into<i64>>(
    name: &str,
    label: impl Into<String>,
    f: impl FnOnce() -> T,
) -> BenchResult {
    let (value, elapsed) = timed(f);
    BenchResult::new(name, label, value.into()).timed(duration_to_millis(elapsed))
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Wrap a suite body with wall-clock and rusage measurement.
fn finish(
    suite: &str,
    body: impl FnOnce() -> Result<Vec<BenchResult>, Error>,
) -> Result<BenchReport, Error> {
    let ((results, elapsed), usage) = rusage::measure(|| timed(body));
    let mut report = BenchReport::new(suite, results?, duration_to_millis(elapsed));
    report.resources = usage.map(|u| ResourceUsage {
        cpu_us: u.cpu_us(),
        peak_rss_bytes: u.peak_rss,
    });
    tracing::debug!(suite, total_ms = report.total_ms, "suite finished");
    Ok(report)
}

/// Run the mixed suite.
///
/// # Errors
/// Returns an error if an allocation fails or the parallel pool cannot be built.
pub fn run_mixed(params: MixedParams) -> Result<BenchReport, Error> {
    finish("mixed", || {
        let primes = count_primes(black_box(params.prime_limit));
        let mem = churn_small(params.churn_allocs, params.churn_size)?;
        let fib = fib_iter(black_box(params.fib_n));

        let parallel: Vec<u64> = if params.parallel_workers == 0 {
            Vec::new()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(params.parallel_workers as usize)
                .build()?;
            pool.install(|| {
                (0..params.parallel_workers)
                    .into_par_iter()
                    .map(|_| count_primes(black_box(params.parallel_limit)))
                    .collect()
            })
        };

        Ok(vec![
            BenchResult::new("primes", "Primes", clamp_i64(primes)),
            BenchResult::new("fib", format!("Fib({})", params.fib_n), clamp_i64(fib)),
            BenchResult::new("mem", "Mem", clamp_i64(mem)),
            BenchResult::new(
                "parallel_primes",
                "Parallel primes",
                clamp_i64(parallel.iter().sum()),
            ),
        ])
    })
}

/// Run the heavy suite.
///
/// # Errors
/// Returns an error if the block allocation loop fails.
pub fn run_heavy(params: HeavyParams) -> Result<BenchReport, Error> {
    finish("heavy", || {
        let fib = measure_one("fib", format!("Fibonacci({})", params.fib_n), || {
            clamp_i64(fib_rec(black_box(params.fib_n)))
        });

        let (allocated, elapsed) = timed(|| retain_blocks(params.alloc_blocks, params.block_size));
        let alloc = BenchResult::new(
            "alloc",
            format!("Allocated {}B blocks", params.block_size),
            clamp_i64(allocated?),
        )
        .timed(duration_to_millis(elapsed));

        let shape = RequestShape::Flat {
            iterations: params.request_iterations,
        };
        let requests = measure_one("requests", "Processed requests", || {
            clamp_i64(run_requests(params.requests, shape))
        });

        let sieve = measure_one(
            "sieve",
            format!("Primes under {}", params.sieve_limit),
            || clamp_i64(sieve_count(black_box(params.sieve_limit))),
        );

        let vector = measure_one("vector", "Vector add elements", || {
            let c = vector_add(black_box(params.vector_len));
            black_box(&c);
            c.len() as i64
        });

        Ok(vec![fib, alloc, requests, sieve, vector])
    })
}

/// Run the extreme suite. The `checksum` result is the sum of the others.
pub fn run_extreme(params: ExtremeParams) -> Result<BenchReport, Error> {
    finish("extreme", || {
        let shape = RequestShape::Scaled {
            iterations: params.request_iterations,
        };

        let mut results = vec![
            measure_one("fib", format!("Fib({})", params.fib_n), || {
                clamp_i64(fib_rec(black_box(params.fib_n)))
            }),
            measure_one("alloc", "Boxed sum", || box_churn(black_box(params.boxes))),
            measure_one("requests", "Completed requests", || {
                clamp_i64(run_requests(params.requests, shape))
            }),
            measure_one("sieve", "Sieve primes", || {
                clamp_i64(sieve_count(black_box(params.sieve_limit)))
            }),
        ];

        let checksum = results
            .iter()
            .fold(0i64, |acc, r| acc.wrapping_add(r.value));
        results.push(BenchResult::new("checksum", "Checksum", checksum));
        Ok(results)
    })
}

/// Run one Takeuchi call.
pub fn run_tak(params: TakParams) -> Result<BenchReport, Error> {
    finish("tak", || {
        Ok(vec![measure_one("tak", "Result", || {
            tak(black_box(params.x), black_box(params.y), black_box(params.z))
        })])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_small() {
        let report = run_mixed(MixedParams {
            prime_limit: 100_000,
            churn_allocs: 10_000,
            churn_size: 1024,
            fib_n: 40,
            parallel_workers: 4,
            parallel_limit: 10_000,
        })
        .unwrap();

        assert_eq!(report.suite, "mixed");
        assert_eq!(report.result("primes").unwrap().value, 9592);
        assert_eq!(report.result("fib").unwrap().value, 102_334_155);
        assert_eq!(report.result("mem").unwrap().value, 49_995_000);
        assert_eq!(report.result("parallel_primes").unwrap().value, 4 * 1229);
        assert_eq!(report.result("fib").unwrap().line(), "Fib(40): 102334155");
    }

    #[test]
    fn test_heavy_small() {
        let report = run_heavy(HeavyParams {
            fib_n: 20,
            alloc_blocks: 1000,
            block_size: 1024,
            requests: 100,
            request_iterations: 100,
            sieve_limit: 100_000,
            vector_len: 1000,
        })
        .unwrap();

        let values: Vec<i64> = report.results.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![6765, 1000, 100, 9592, 1000]);
        assert!(report.results.iter().all(|r| r.elapsed_ms.is_some()));
        assert_eq!(
            report.result("sieve").unwrap().label,
            "Primes under 100000"
        );
    }

    #[test]
    fn test_extreme_checksum() {
        let report = run_extreme(ExtremeParams {
            fib_n: 20,
            boxes: 100,
            requests: 100,
            request_iterations: 10,
            sieve_limit: 1000,
        })
        .unwrap();

        // 6765 + 4950 + 99 + 168
        assert_eq!(report.result("checksum").unwrap().value, 11_982);
        assert!(report.result("checksum").unwrap().elapsed_ms.is_none());
    }

    #[test]
    fn test_tak_small() {
        let report = run_tak(TakParams { x: 18, y: 12, z: 6 }).unwrap();
        let result = report.result("tak").unwrap();
        assert_eq!(result.value, 7);
        assert!(result.line().starts_with("Result: 7 in "));
    }

    #[test]
    #[cfg(unix)]
    fn test_suite_records_resources() {
        let report = run_tak(TakParams { x: 12, y: 8, z: 4 }).unwrap();
        assert!(report.resources.is_some());
    }

    #[test]
    fn test_default_params_match_reference_programs() {
        let heavy = HeavyParams::default();
        assert_eq!(heavy.sieve_limit, 10_000_000);
        assert_eq!(heavy.alloc_blocks, 1_000_000);

        let extreme = ExtremeParams::default();
        assert_eq!(extreme.fib_n, 42);
        assert_eq!(extreme.sieve_limit, 50_000_000);

        let tak = TakParams::default();
        assert_eq!((tak.x, tak.y, tak.z), (30, 20, 10));
    }
}
