//! Integration tests for `gauntlet stack-probe`.

use std::process::Command;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-p", "gauntlet-cli", "--bin", "gauntlet", "--"]);
    cmd
}

#[test]
fn test_bounded_probe_reports_depth() {
    let output = cargo_bin()
        .args([
            "stack-probe",
            "--stack-mib",
            "64",
            "--max-depth",
            "3000",
            "--interval",
            "1000",
        ])
        .output()
        .expect("Failed to run stack-probe");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let depths: Vec<&str> = stdout.lines().filter(|l| l.starts_with("Depth: ")).collect();
    assert_eq!(depths, vec!["Depth: 1000", "Depth: 2000", "Depth: 3000"]);
    assert!(stdout.contains("Max depth: 3000"), "stdout: {stdout}");
}

#[test]
fn test_bounded_probe_json_keeps_progress_off_stdout() {
    let output = cargo_bin()
        .args([
            "--json",
            "stack-probe",
            "--stack-mib",
            "64",
            "--max-depth",
            "500",
            "--interval",
            "100",
        ])
        .output()
        .expect("Failed to run stack-probe");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(json["depth"].as_u64(), Some(500));
    assert_eq!(json["progress_events"].as_u64(), Some(5));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Depth: 500"), "stderr: {stderr}");
}

#[test]
#[cfg(unix)]
fn test_unbounded_probe_overflows() {
    let output = cargo_bin()
        .args(["stack-probe", "--stack-mib", "1", "--interval", "1000"])
        .output()
        .expect("Failed to run stack-probe");

    // Overflow terminates the process; the last progress line is the result.
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Depth: 1000"), "stdout: {stdout}");
    assert!(!stdout.contains("Max depth"), "stdout: {stdout}");
}

#[test]
fn test_zero_interval_is_an_error() {
    let output = cargo_bin()
        .args(["stack-probe", "--max-depth", "10", "--interval", "0"])
        .output()
        .expect("Failed to run stack-probe");

    assert!(!output.status.success());
}
