//! Benchmark suites and the reports they produce.
//!
//! A suite is a fixed sequence of workloads, each timed with a monotonic
//! clock and reported as one result line. There is deliberately no sampling
//! or aggregation across runs: every invocation measures once.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod rusage;
pub mod suite;

pub use suite::{
    run_extreme, run_heavy, run_mixed, run_tak, ExtremeParams, HeavyParams, MixedParams,
    TakParams,
};

/// Bench report schema version. Bump when changing JSON structure.
pub const BENCH_SCHEMA_VERSION: u32 = 1;

/// Severity levels for bench warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
}

/// A benchmark warning with a stable code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchWarning {
    /// Stable warning code (e.g., `DEBUG_BUILD`).
    pub code: String,
    pub severity: Severity,
    pub message: String,
}

impl BenchWarning {
    #[must_use]
    pub fn info(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            severity: Severity::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warn(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            severity: Severity::Warn,
            message: message.into(),
        }
    }
}

/// Warning codes for bench.
pub mod codes {
    pub const DEBUG_BUILD: &str = "DEBUG_BUILD";
    pub const DEFAULT_TARGET: &str = "DEFAULT_TARGET";
    pub const RSS_UNAVAILABLE: &str = "RSS_UNAVAILABLE";
    pub const INJECTED_FAULTS: &str = "INJECTED_FAULTS";
}

/// Warnings that apply to every run of this binary.
#[must_use]
pub fn build_warnings() -> Vec<BenchWarning> {
    if cfg!(debug_assertions) {
        vec![BenchWarning::warn(
            codes::DEBUG_BUILD,
            "Built without optimizations; timings are not representative",
        )]
    } else {
        Vec::new()
    }
}

/// Pass/fail outcome of a stress workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Passed,
    Failed,
}

impl Status {
    #[must_use]
    pub fn is_passed(self) -> bool {
        self == Self::Passed
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => f.write_str("PASSED"),
            Self::Failed => f.write_str("FAILED"),
        }
    }
}

/// Runtime information for the benchmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchRuntimeInfo {
    pub gauntlet_version: String,
    pub os: String,
    pub arch: String,
    /// Available hardware parallelism.
    pub cores: u32,
    /// `debug` or `release`.
    pub profile: String,
}

impl BenchRuntimeInfo {
    /// Detect runtime info for the current process.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            gauntlet_version: crate::version::VERSION.to_string(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            cores: crate::config::available_threads() as u32,
            profile: crate::version::build_profile().to_string(),
        }
    }
}

/// One measured workload inside a suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchResult {
    /// Stable identifier (e.g., `sieve`).
    pub name: String,
    /// Label used on the human-readable line.
    pub label: String,
    pub value: i64,
    /// Wall-clock time, when the workload was timed on its own.
    pub elapsed_ms: Option<u64>,
}

impl BenchResult {
    #[must_use]
    pub fn new(name: impl Into<String>, label: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            value,
            elapsed_ms: None,
        }
    }

    #[must_use]
    pub fn timed(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = Some(elapsed_ms);
        self
    }

    /// `"<Label>: <value>"` or `"<Label>: <value> in <elapsed>ms"`.
    #[must_use]
    pub fn line(&self) -> String {
        match self.elapsed_ms {
            Some(ms) => format!("{}: {} in {ms}ms", self.label, self.value),
            None => format!("{}: {}", self.label, self.value),
        }
    }
}

/// CPU time and memory consumed while a suite ran.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ResourceUsage {
    pub cpu_us: u64,
    pub peak_rss_bytes: u64,
}

/// Complete suite report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    /// Schema version for this report format.
    pub bench_schema_version: u32,
    pub runtime: BenchRuntimeInfo,
    /// Suite identifier (e.g., `heavy`).
    pub suite: String,
    pub results: Vec<BenchResult>,
    /// Wall-clock time for the whole suite.
    pub total_ms: u64,
    pub resources: Option<ResourceUsage>,
    pub warnings: Vec<BenchWarning>,
}

impl BenchReport {
    #[must_use]
    pub fn new(suite: impl Into<String>, results: Vec<BenchResult>, total_ms: u64) -> Self {
        Self {
            bench_schema_version: BENCH_SCHEMA_VERSION,
            runtime: BenchRuntimeInfo::detect(),
            suite: suite.into(),
            results,
            total_ms,
            resources: None,
            warnings: build_warnings(),
        }
    }

    /// Look up a result by its stable name.
    #[must_use]
    pub fn result(&self, name: &str) -> Option<&BenchResult> {
        self.results.iter().find(|r| r.name == name)
    }
}
