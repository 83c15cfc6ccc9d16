use super::print_json;
use gauntlet_core::workload::{run_counter, CounterParams};
use gauntlet_util::time::format_duration;
use miette::{IntoDiagnostic, Result};

/// Run the atomic counter workload.
pub fn run(params: CounterParams, json: bool) -> Result<()> {
    let report = run_counter(params).into_diagnostic()?;

    if json {
        return print_json(&report);
    }

    println!("Counter: {}", report.value);
    println!("Time: {}", format_duration(report.elapsed_ns));
    println!("Ops/sec: {:.2} million", report.mops_per_sec);
    Ok(())
}
