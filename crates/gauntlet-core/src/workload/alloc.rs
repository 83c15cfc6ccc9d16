//! Memory-allocation workloads.
//!
//! `run_alloc_stress` is the only workload with explicit failure handling:
//! allocator exhaustion ends the loop with a partial count instead of
//! aborting the process.

use crate::bench::rusage;
use crate::bench::{codes, BenchWarning, Status};
use crate::config::{DEFAULT_ALLOC_TARGET, STRESS_BLOCK_SIZE, TOUCH_STRIDE};
use crate::error::Error;
use gauntlet_util::mem::{touch_pages, try_zeroed_block, AllocError};
use gauntlet_util::time::{duration_to_millis, timed};
use serde::{Deserialize, Serialize};
use std::hint::black_box;

/// Parameters for the allocation stress workload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AllocStressParams {
    /// Number of blocks to allocate and retain.
    pub target: u64,
    /// Size of each block in bytes.
    pub block_size: usize,
    /// Distance between forced writes inside each block; 0 disables touching.
    pub touch_stride: usize,
}

impl Default for AllocStressParams {
    fn default() -> Self {
        Self {
            target: DEFAULT_ALLOC_TARGET,
            block_size: STRESS_BLOCK_SIZE,
            touch_stride: TOUCH_STRIDE,
        }
    }
}

/// Where and why an allocation loop stopped early.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocFailure {
    /// Zero-based index of the allocation that failed.
    pub index: u64,
    /// Allocator error message.
    pub message: String,
}

/// Result of the allocation stress workload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocStressReport {
    pub params: AllocStressParams,
    /// Allocations that completed before the target or a failure.
    pub succeeded: u64,
    /// Bytes held at the end of the loop.
    pub retained_bytes: u64,
    pub elapsed_ms: u64,
    pub status: Status,
    pub failure: Option<AllocFailure>,
    /// Peak resident set size of the process, when available.
    pub peak_rss_bytes: Option<u64>,
    pub warnings: Vec<BenchWarning>,
}

impl AllocStressReport {
    /// Megabytes retained (1 MB = 1 MiB).
    #[must_use]
    pub fn retained_mib(&self) -> u64 {
        self.retained_bytes / (1024 * 1024)
    }
}

/// Allocate `target` blocks and keep them all alive until the loop ends.
#[must_use]
pub fn run_alloc_stress(params: AllocStressParams) -> AllocStressReport {
    tracing::debug!(
        target = params.target,
        block_size = params.block_size,
        stride = params.touch_stride,
        "starting allocation stress"
    );

    let ((succeeded, failure), elapsed) = timed(|| fill_blocks(params));

    if let Some(failure) = &failure {
        tracing::warn!(index = failure.index, error = %failure.message, "allocation failed");
    }

    let mut warnings = Vec::new();
    let peak_rss_bytes = rusage::sample().map(|s| s.peak_rss);
    if peak_rss_bytes.is_none() {
        warnings.push(BenchWarning::info(
            codes::RSS_UNAVAILABLE,
            "Peak RSS is not available on this platform",
        ));
    }

    let status = if succeeded == params.target {
        Status::Passed
    } else {
        Status::Failed
    };

    AllocStressReport {
        params,
        succeeded,
        retained_bytes: succeeded.saturating_mul(params.block_size as u64),
        elapsed_ms: duration_to_millis(elapsed),
        status,
        failure,
        peak_rss_bytes,
        warnings,
    }
}

/// The retaining loop. Blocks are dropped when this returns.
fn fill_blocks(params: AllocStressParams) -> (u64, Option<AllocFailure>) {
    let mut blocks: Vec<Vec<u8>> = Vec::new();
    let capacity = usize::try_from(params.target).unwrap_or(usize::MAX);
    if let Err(e) = blocks.try_reserve_exact(capacity) {
        return (
            0,
            Some(AllocFailure {
                index: 0,
                message: e.to_string(),
            }),
        );
    }

    for i in 0..params.target {
        match try_zeroed_block(params.block_size) {
            Ok(mut block) => {
                touch_pages(&mut block, params.touch_stride, i as u8);
                blocks.push(block);
            }
            Err(e) => {
                return (
                    i,
                    Some(AllocFailure {
                        index: i,
                        message: e.to_string(),
                    }),
                );
            }
        }
    }

    black_box(&blocks);
    (blocks.len() as u64, None)
}

/// Allocate and immediately drop `count` blocks; returns the sum of indices.
///
/// # Errors
/// Returns [`Error::Alloc`] if any allocation fails.
pub fn churn_small(count: u64, size: usize) -> Result<u64, Error> {
    let mut total: u64 = 0;
    for i in 0..count {
        let block = try_zeroed_block(size).map_err(|source| Error::Alloc { index: i, source })?;
        black_box(&block);
        total += i;
    }
    Ok(total)
}

/// Allocate `count` blocks, tag byte 0 of each with `i % 256`, retain all of them.
///
/// Returns the number of blocks held when the loop finished.
///
/// # Errors
/// Returns [`Error::Alloc`] if any allocation fails.
pub fn retain_blocks(count: u64, size: usize) -> Result<u64, Error> {
    let mut blocks: Vec<Vec<u8>> = Vec::new();
    let capacity = usize::try_from(count).unwrap_or(usize::MAX);
    blocks
        .try_reserve_exact(capacity)
        .map_err(|_| Error::Alloc {
            index: 0,
            source: AllocError::OutOfMemory {
                size: capacity.saturating_mul(std::mem::size_of::<Vec<u8>>()),
            },
        })?;

    for i in 0..count {
        let mut block =
            try_zeroed_block(size).map_err(|source| Error::Alloc { index: i, source })?;
        if let Some(first) = block.first_mut() {
            *first = (i % 256) as u8;
        }
        blocks.push(block);
    }

    black_box(&blocks);
    Ok(blocks.len() as u64)
}

/// Box every index as an `i64` and sum through the box, wrapping on overflow.
///
/// Counts beyond `i64::MAX` are clamped.
#[must_use]
pub fn box_churn(count: u64) -> i64 {
    boxed_sum(0..i64::try_from(count).unwrap_or(i64::MAX))
}

fn boxed_sum(values: std::ops::Range<i64>) -> i64 {
    let mut sum: i64 = 0;
    for i in values {
        let boxed = black_box(Box::new(i));
        sum = sum.wrapping_add(*boxed);
    }
    sum
}
