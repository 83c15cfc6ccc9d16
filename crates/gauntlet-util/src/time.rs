use std::time::{Duration, Instant};

/// Run `f` and return its value together with the wall-clock time it took.
///
/// Uses a monotonic clock.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

/// Convert a Duration to whole milliseconds as u64.
///
/// Truncation is intentional: durations over ~585 million years would overflow.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn duration_to_millis(d: Duration) -> u64 {
    d.as_millis() as u64
}

/// Format a duration in nanoseconds to a human-readable string.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_duration(ns: u64) -> String {
    // Precision loss is acceptable for display purposes
    if ns >= 1_000_000_000 {
        format!("{:.2}s", ns as f64 / 1_000_000_000.0)
    } else if ns >= 1_000_000 {
        format!("{:.2}ms", ns as f64 / 1_000_000.0)
    } else if ns >= 1_000 {
        format!("{:.2}us", ns as f64 / 1_000.0)
    } else {
        format!("{ns}ns")
    }
}
