use super::{print_json, print_warnings};
use gauntlet_core::bench::{
    run_extreme, run_heavy, run_mixed, run_tak, BenchReport, ExtremeParams, HeavyParams,
    MixedParams, TakParams,
};
use miette::{IntoDiagnostic, Result};
use std::io::{self, Write};

/// Which fixed suite to run.
#[derive(Debug, Clone, Copy)]
pub enum Suite {
    Mixed,
    Heavy,
    Extreme,
    Tak(TakParams),
}

impl Suite {
    fn title(self) -> &'static str {
        match self {
            Self::Mixed => "Mixed Results",
            Self::Heavy => "Heavy Results",
            Self::Extreme => "Extreme Results",
            Self::Tak(_) => "Tak Results",
        }
    }
}

/// Run a suite and print its report.
pub fn run(suite: Suite, json: bool) -> Result<()> {
    let span = tracing::info_span!("suite", title = suite.title());
    let _guard = span.enter();

    let report = match suite {
        Suite::Mixed => run_mixed(MixedParams::default()),
        Suite::Heavy => run_heavy(HeavyParams::default()),
        Suite::Extreme => run_extreme(ExtremeParams::default()),
        Suite::Tak(params) => run_tak(params),
    }
    .into_diagnostic()?;

    if json {
        print_json(&report)
    } else {
        print_human(suite, &report)
    }
}

fn print_human(suite: Suite, report: &BenchReport) -> Result<()> {
    let mut out = io::stdout().lock();

    writeln!(out, "{}:", suite.title()).into_diagnostic()?;
    for result in &report.results {
        writeln!(out, "  {}", result.line()).into_diagnostic()?;
    }
    if report.results.len() > 1 {
        writeln!(out, "  Time: {}ms", report.total_ms).into_diagnostic()?;
    }
    out.flush().into_diagnostic()?;
    drop(out);

    print_warnings(&report.warnings)
}
