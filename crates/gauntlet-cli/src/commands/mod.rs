pub mod alloc;
pub mod concurrent;
pub mod counter;
pub mod probe;
pub mod suite;
pub mod version;

use gauntlet_core::bench::{BenchWarning, Severity};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::io::{self, Write};

/// Print a report as a single pretty JSON object on stdout.
pub fn print_json<T: Serialize>(report: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(report).into_diagnostic()?;
    println!("{json}");
    Ok(())
}

/// Print warnings to stderr so stdout keeps only result lines.
pub fn print_warnings(warnings: &[BenchWarning]) -> Result<()> {
    if warnings.is_empty() {
        return Ok(());
    }

    let mut err = io::stderr().lock();
    writeln!(err).into_diagnostic()?;
    writeln!(err, "\x1b[1mWarnings\x1b[0m ({} total)", warnings.len()).into_diagnostic()?;
    for warning in warnings {
        let prefix = match warning.severity {
            Severity::Info => "\x1b[34minfo\x1b[0m",
            Severity::Warn => "\x1b[33mwarn\x1b[0m",
        };
        writeln!(err, "  [{prefix}] {}: {}", warning.code, warning.message).into_diagnostic()?;
    }
    Ok(())
}

/// Render a byte count using the largest whole binary unit (`1MB`, `64KB`, `100B`).
pub fn format_size(bytes: usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * 1024;

    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= KIB && bytes % KIB == 0 {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{bytes}B")
    }
}
