//! Stack-depth probe.
//!
//! Recurses on a dedicated thread with an explicitly sized stack so the
//! reported depth is comparable across platforms whose default thread stacks
//! differ. Without a depth ceiling the probe only ends by overflowing that
//! stack, which aborts the process. That abort is the expected outcome: the
//! last progress line printed is the measurement.

use crate::config::{PROBE_STACK_BYTES, PROGRESS_INTERVAL};
use crate::error::Error;
use gauntlet_util::time::{duration_to_millis, timed};
use serde::{Deserialize, Serialize};
use std::hint::black_box;
use std::thread;

/// Parameters for the stack probe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StackProbeParams {
    /// Stack size of the probe thread in bytes.
    pub stack_bytes: usize,
    /// Frames between progress callbacks.
    pub progress_interval: u64,
    /// Stop cleanly at this depth instead of overflowing.
    pub max_depth: Option<u64>,
}

impl Default for StackProbeParams {
    fn default() -> Self {
        Self {
            stack_bytes: PROBE_STACK_BYTES,
            progress_interval: PROGRESS_INTERVAL,
            max_depth: None,
        }
    }
}

/// Result of a bounded probe run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackProbeReport {
    pub params: StackProbeParams,
    /// Deepest frame reached.
    pub depth: u64,
    /// Number of progress callbacks made.
    pub progress_events: u64,
    pub elapsed_ms: u64,
}

struct Probe<F> {
    depth: u64,
    interval: u64,
    limit: Option<u64>,
    progress_events: u64,
    on_progress: F,
}

impl<F: FnMut(u64)> Probe<F> {
    fn descend(&mut self) {
        self.depth += 1;
        if self.depth % self.interval == 0 {
            self.progress_events += 1;
            (self.on_progress)(self.depth);
        }
        if self.limit.is_some_and(|limit| self.depth >= limit) {
            return;
        }

        // Keep a live value across the call so the recursion is not turned into a loop.
        let frame = black_box(self.depth);
        self.descend();
        black_box(frame);
    }
}

/// Run the probe, calling `on_progress(depth)` every `progress_interval` frames.
///
/// Returns only when `max_depth` is set; otherwise the probe thread overflows
/// its stack and the process aborts.
///
/// # Errors
/// Returns an error if the interval is zero, the probe thread cannot be
/// spawned, or the progress callback panics.
pub fn run_stack_probe<F>(params: StackProbeParams, on_progress: F) -> Result<StackProbeReport, Error>
where
    F: FnMut(u64) + Send,
{
    if params.progress_interval == 0 {
        return Err(Error::other("progress interval must be non-zero"));
    }

    tracing::debug!(
        stack_bytes = params.stack_bytes,
        interval = params.progress_interval,
        max_depth = ?params.max_depth,
        "starting stack probe"
    );

    let (outcome, elapsed) = timed(|| {
        thread::scope(|scope| {
            let handle = thread::Builder::new()
                .name("gauntlet-stack-probe".to_string())
                .stack_size(params.stack_bytes)
                .spawn_scoped(scope, move || {
                    let mut probe = Probe {
                        depth: 0,
                        interval: params.progress_interval,
                        limit: params.max_depth,
                        progress_events: 0,
                        on_progress,
                    };
                    probe.descend();
                    (probe.depth, probe.progress_events)
                })
                .map_err(|source| Error::Spawn {
                    name: "stack probe",
                    source,
                })?;
            handle.join().map_err(|_| Error::ProbePanicked)
        })
    });
    let (depth, progress_events) = outcome?;

    Ok(StackProbeReport {
        params,
        depth,
        progress_events,
        elapsed_ms: duration_to_millis(elapsed),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded(max_depth: u64, interval: u64) -> StackProbeParams {
        StackProbeParams {
            stack_bytes: 256 * 1024 * 1024,
            progress_interval: interval,
            max_depth: Some(max_depth),
        }
    }

    #[test]
    fn test_progress_once_per_interval() {
        let mut seen = Vec::new();
        let report = run_stack_probe(bounded(95, 10), |depth| seen.push(depth)).unwrap();

        assert_eq!(report.depth, 95);
        assert_eq!(report.progress_events, 9);
        assert_eq!(seen, vec![10, 20, 30, 40, 50, 60, 70, 80, 90]);
    }

    #[test]
    fn test_default_interval_deep_probe() {
        let mut seen = Vec::new();
        let report =
            run_stack_probe(bounded(250_000, PROGRESS_INTERVAL), |depth| seen.push(depth)).unwrap();

        assert_eq!(report.depth, 250_000);
        assert_eq!(seen, vec![100_000, 200_000]);
    }

    #[test]
    fn test_limit_on_interval_boundary_reports_once() {
        let mut seen = Vec::new();
        let report = run_stack_probe(bounded(30, 10), |depth| seen.push(depth)).unwrap();

        assert_eq!(report.depth, 30);
        assert_eq!(seen, vec![10, 20, 30]);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = run_stack_probe(bounded(10, 0), |_| {}).unwrap_err();
        assert!(err.to_string().contains("non-zero"));
    }

    #[test]
    fn test_callback_panic_is_reported() {
        let err = run_stack_probe(bounded(50, 10), |depth| {
            assert!(depth < 20, "stop here");
        })
        .unwrap_err();
        assert!(matches!(err, Error::ProbePanicked));
    }

    #[test]
    fn test_default_params() {
        let p = StackProbeParams::default();
        assert_eq!(p.stack_bytes, 1024 * 1024 * 1024);
        assert_eq!(p.progress_interval, 100_000);
        assert!(p.max_depth.is_none());
    }
}
