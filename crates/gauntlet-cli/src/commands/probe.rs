use super::print_json;
use gauntlet_core::workload::{run_stack_probe, StackProbeParams};
use miette::{IntoDiagnostic, Result};
use std::io::{self, Write};

/// Run the stack-depth probe.
///
/// Progress lines go to stdout, or to stderr when `json` is set so stdout
/// carries only the final report. An unbounded probe never reaches the
/// report: it ends when the probe thread overflows its stack.
pub fn run(params: StackProbeParams, json: bool) -> Result<()> {
    if !json {
        println!(
            "Stack probe: {} MiB stack, progress every {} frames",
            params.stack_bytes / (1024 * 1024),
            params.progress_interval
        );
    }

    let report = run_stack_probe(params, |depth| {
        // The process may abort on the next frames; write and flush right away.
        if json {
            let mut err = io::stderr().lock();
            let _ = writeln!(err, "Depth: {depth}");
        } else {
            let mut out = io::stdout().lock();
            let _ = writeln!(out, "Depth: {depth}");
            let _ = out.flush();
        }
    })
    .into_diagnostic()?;

    if json {
        print_json(&report)
    } else {
        println!("Max depth: {} in {}ms", report.depth, report.elapsed_ms);
        Ok(())
    }
}
