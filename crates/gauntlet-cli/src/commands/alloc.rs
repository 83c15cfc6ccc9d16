use super::{format_size, print_json, print_warnings};
use gauntlet_core::bench::{codes, BenchWarning, Status};
use gauntlet_core::config::{parse_target, DEFAULT_ALLOC_TARGET};
use gauntlet_core::workload::{run_alloc_stress, AllocStressParams, AllocStressReport};
use miette::{IntoDiagnostic, Result};
use std::io::{self, Write};
use std::process::ExitCode;

/// Default block size in KiB (1 MiB).
pub const DEFAULT_BLOCK_KIB: u64 = 1024;

/// Default stride between forced page writes.
pub const DEFAULT_STRIDE: usize = gauntlet_core::config::TOUCH_STRIDE;

/// Run the allocation stress command.
///
/// `count` is taken verbatim from the command line; anything that is not a
/// non-negative integer falls back to the default target.
pub fn run(count: Option<&str>, block_kib: u64, stride: usize, json: bool) -> Result<ExitCode> {
    let (target, defaulted) = parse_target(count, DEFAULT_ALLOC_TARGET);
    let block_size = usize::try_from(block_kib.saturating_mul(1024)).unwrap_or(usize::MAX);

    let params = AllocStressParams {
        target,
        block_size,
        touch_stride: stride,
    };

    if !json {
        println!(
            "Stress Test: {} x {} allocations",
            params.target,
            format_size(params.block_size)
        );
    }

    let mut report = run_alloc_stress(params);
    if defaulted {
        report.warnings.push(BenchWarning::info(
            codes::DEFAULT_TARGET,
            format!("Unparseable count; using default target {DEFAULT_ALLOC_TARGET}"),
        ));
    }

    if json {
        print_json(&report)?;
    } else {
        print_human(&report)?;
    }

    Ok(exit_code(report.status))
}

fn print_human(report: &AllocStressReport) -> Result<()> {
    let mut out = io::stdout().lock();

    if let Some(failure) = &report.failure {
        writeln!(
            out,
            "  FAILED at allocation #{}: {}",
            failure.index, failure.message
        )
        .into_diagnostic()?;
    }
    writeln!(
        out,
        "Result: {}/{} allocations succeeded",
        report.succeeded, report.params.target
    )
    .into_diagnostic()?;
    writeln!(out, "Memory used: {} MB", report.retained_mib()).into_diagnostic()?;
    if let Some(rss) = report.peak_rss_bytes {
        writeln!(out, "Peak RSS: {} MB", rss / (1024 * 1024)).into_diagnostic()?;
    }
    writeln!(out, "Time: {}ms", report.elapsed_ms).into_diagnostic()?;

    match report.status {
        Status::Passed => writeln!(out, "STATUS: PASSED"),
        Status::Failed => writeln!(out, "STATUS: FAILED at {}", report.succeeded),
    }
    .into_diagnostic()?;
    out.flush().into_diagnostic()?;
    drop(out);

    // Silent fallback: only surface non-info warnings in human output.
    let loud: Vec<BenchWarning> = report
        .warnings
        .iter()
        .filter(|w| w.code != codes::DEFAULT_TARGET)
        .cloned()
        .collect();
    print_warnings(&loud)
}

pub fn exit_code(status: Status) -> ExitCode {
    if status.is_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
