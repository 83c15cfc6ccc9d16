//! Process CPU time and peak RSS around a workload, via `getrusage(2)`.
//!
//! Peak RSS is a high-water mark for the whole process, so the value
//! reported after an allocation-heavy suite includes everything that ran
//! before it. Non-unix targets report nothing.

/// CPU time consumed and peak resident memory, read at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageSample {
    pub user_us: u64,
    pub system_us: u64,
    /// Peak resident set size in bytes.
    pub peak_rss: u64,
}

/// Resources a workload used between two samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadUsage {
    pub user_us: u64,
    pub system_us: u64,
    /// Peak RSS at the end of the workload.
    pub peak_rss: u64,
}

impl WorkloadUsage {
    /// Between two samples of the same process. Counters never go backwards,
    /// but a clamped zero is reported if they appear to.
    #[must_use]
    pub fn between(start: &UsageSample, end: &UsageSample) -> Self {
        Self {
            user_us: end.user_us.saturating_sub(start.user_us),
            system_us: end.system_us.saturating_sub(start.system_us),
            peak_rss: end.peak_rss,
        }
    }

    #[must_use]
    pub fn cpu_us(&self) -> u64 {
        self.user_us.saturating_add(self.system_us)
    }
}

#[cfg(unix)]
fn sample_impl() -> Option<UsageSample> {
    fn micros(tv: libc::timeval) -> u64 {
        let secs = u64::try_from(tv.tv_sec).unwrap_or(0);
        let usecs = u64::try_from(tv.tv_usec).unwrap_or(0);
        secs.saturating_mul(1_000_000).saturating_add(usecs)
    }

    // SAFETY: all-zero is a valid `rusage`; getrusage only writes into it.
    let mut raw: libc::rusage = unsafe { std::mem::zeroed() };
    if unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut raw) } != 0 {
        return None;
    }

    let max_rss = u64::try_from(raw.ru_maxrss).unwrap_or(0);
    // macOS reports bytes, Linux and the BSDs kilobytes.
    let peak_rss = if cfg!(target_os = "macos") {
        max_rss
    } else {
        max_rss.saturating_mul(1024)
    };

    Some(UsageSample {
        user_us: micros(raw.ru_utime),
        system_us: micros(raw.ru_stime),
        peak_rss,
    })
}

#[cfg(not(unix))]
fn sample_impl() -> Option<UsageSample> {
    None
}

/// Current usage of this process, or `None` where `getrusage` is unavailable.
#[must_use]
pub fn sample() -> Option<UsageSample> {
    sample_impl()
}

/// Run `workload`, returning its value and the resources it used.
pub fn measure<T>(workload: impl FnOnce() -> T) -> (T, Option<WorkloadUsage>) {
    let start = sample();
    let value = workload();
    let usage = start
        .zip(sample())
        .map(|(start, end)| WorkloadUsage::between(&start, &end));
    (value, usage)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(user_us: u64, system_us: u64, peak_rss: u64) -> UsageSample {
        UsageSample {
            user_us,
            system_us,
            peak_rss,
        }
    }

    #[test]
    fn test_usage_between_samples() {
        let usage = WorkloadUsage::between(&at(100, 50, 1024), &at(300, 150, 4096));
        assert_eq!(usage.user_us, 200);
        assert_eq!(usage.system_us, 100);
        assert_eq!(usage.cpu_us(), 300);
        assert_eq!(usage.peak_rss, 4096);
    }

    #[test]
    fn test_usage_clamps_backwards_counters() {
        let usage = WorkloadUsage::between(&at(500, 200, 2048), &at(100, 50, 2048));
        assert_eq!(usage.cpu_us(), 0);
    }

    #[test]
    #[cfg(unix)]
    fn test_sample_reports_resident_memory() {
        let sample = sample().unwrap();
        assert!(sample.peak_rss > 0);
    }

    #[test]
    #[cfg(unix)]
    fn test_measure_sees_allocation_in_peak_rss() {
        let (len, usage) = measure(|| {
            let block = vec![1u8; 8 * 1024 * 1024];
            std::hint::black_box(&block).len()
        });
        assert_eq!(len, 8 * 1024 * 1024);
        assert!(usage.unwrap().peak_rss >= 8 * 1024 * 1024);
    }
}
