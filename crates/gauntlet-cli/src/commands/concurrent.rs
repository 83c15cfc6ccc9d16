use super::alloc::exit_code;
use super::{format_size, print_json, print_warnings};
use gauntlet_core::bench::Status;
use gauntlet_core::workload::{run_concurrent_stress, ConcurrentStressParams, ConcurrentStressReport};
use miette::{IntoDiagnostic, Result};
use std::io::{self, Write};
use std::process::ExitCode;

/// Run the concurrent allocation stress command.
pub fn run(params: ConcurrentStressParams, json: bool) -> Result<ExitCode> {
    if !json {
        println!(
            "Concurrent Stress: {} workers x {} allocations x {}",
            params.workers,
            params.allocs_per_worker,
            format_size(params.alloc_size)
        );
    }

    let report = run_concurrent_stress(params).into_diagnostic()?;

    if json {
        print_json(&report)?;
    } else {
        print_human(&report)?;
    }

    Ok(exit_code(report.status))
}

fn print_human(report: &ConcurrentStressReport) -> Result<()> {
    let mut out = io::stdout().lock();

    writeln!(
        out,
        "Total allocations: {} / {}",
        report.total_success, report.max_success
    )
    .into_diagnostic()?;
    writeln!(
        out,
        "Failed workers: {} / {}",
        report.failed_workers, report.params.workers
    )
    .into_diagnostic()?;
    writeln!(out, "Time: {}ms", report.elapsed_ms).into_diagnostic()?;

    match report.status {
        Status::Passed => writeln!(out, "STATUS: PASSED"),
        Status::Failed => writeln!(
            out,
            "STATUS: FAILED ({} workers crashed)",
            report.failed_workers
        ),
    }
    .into_diagnostic()?;
    out.flush().into_diagnostic()?;
    drop(out);

    print_warnings(&report.warnings)
}
