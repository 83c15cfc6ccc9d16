//! Integration tests for the stress commands and their exit status.

use std::process::Command;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-p", "gauntlet-cli", "--bin", "gauntlet", "--"]);
    cmd
}

#[test]
fn test_alloc_stress_passes() {
    let output = cargo_bin()
        .args(["alloc-stress", "16", "--block-kib", "64"])
        .output()
        .expect("Failed to run alloc-stress");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Stress Test: 16 x 64KB allocations"), "stdout: {stdout}");
    assert!(stdout.contains("Result: 16/16 allocations succeeded"), "stdout: {stdout}");
    assert!(stdout.contains("Memory used: 1 MB"), "stdout: {stdout}");
    assert!(stdout.contains("STATUS: PASSED"), "stdout: {stdout}");
}

#[test]
fn test_alloc_stress_bad_count_uses_default() {
    let output = cargo_bin()
        .args(["--json", "alloc-stress", "bogus", "--block-kib", "4"])
        .output()
        .expect("Failed to run alloc-stress");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");

    assert_eq!(json["params"]["target"].as_u64(), Some(1000));
    assert_eq!(json["succeeded"].as_u64(), Some(1000));
    assert_eq!(json["status"].as_str(), Some("PASSED"));

    let codes: Vec<&str> = json["warnings"]
        .as_array()
        .expect("warnings should be array")
        .iter()
        .filter_map(|w| w["code"].as_str())
        .collect();
    assert!(codes.contains(&"DEFAULT_TARGET"), "codes: {codes:?}");
}

#[test]
fn test_alloc_stress_failure_exits_nonzero() {
    // 2^50 KiB per block cannot be satisfied by any allocator.
    let output = cargo_bin()
        .args(["alloc-stress", "3", "--block-kib", "1125899906842624"])
        .output()
        .expect("Failed to run alloc-stress");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("FAILED at allocation #0"), "stdout: {stdout}");
    assert!(stdout.contains("Result: 0/3 allocations succeeded"), "stdout: {stdout}");
    assert!(stdout.contains("STATUS: FAILED at 0"), "stdout: {stdout}");
}

#[test]
fn test_concurrent_stress_passes() {
    let output = cargo_bin()
        .args([
            "--json",
            "concurrent-stress",
            "--workers",
            "20",
            "--allocs",
            "10",
            "--size-kib",
            "4",
            "--threads",
            "4",
        ])
        .output()
        .expect("Failed to run concurrent-stress");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");

    assert_eq!(json["total_success"].as_u64(), Some(200));
    assert_eq!(json["max_success"].as_u64(), Some(200));
    assert_eq!(json["failed_workers"].as_u64(), Some(0));
    assert_eq!(json["pool_threads"].as_u64(), Some(4));
    assert_eq!(json["status"].as_str(), Some("PASSED"));
}

#[test]
fn test_concurrent_stress_faults_are_isolated() {
    let output = cargo_bin()
        .args([
            "concurrent-stress",
            "--workers",
            "10",
            "--allocs",
            "10",
            "--size-kib",
            "4",
            "--inject-faults",
            "3",
        ])
        .output()
        .expect("Failed to run concurrent-stress");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    // 7 full workers plus 3 that stop after 5 allocations.
    assert!(stdout.contains("Total allocations: 85 / 100"), "stdout: {stdout}");
    assert!(stdout.contains("Failed workers: 3 / 10"), "stdout: {stdout}");
    assert!(
        stdout.contains("STATUS: FAILED (3 workers crashed)"),
        "stdout: {stdout}"
    );
}

#[test]
fn test_concurrent_stress_panicking_workers_fail_the_run() {
    let output = cargo_bin()
        .args([
            "--json",
            "concurrent-stress",
            "--workers",
            "8",
            "--allocs",
            "4",
            "--size-kib",
            "4",
            "--inject-faults",
            "2",
            "--panic-faults",
        ])
        .output()
        .expect("Failed to run concurrent-stress");

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(json["failed_workers"].as_u64(), Some(2));
    assert_eq!(json["total_success"].as_u64(), Some(6 * 4 + 2 * 2));
    assert_eq!(json["status"].as_str(), Some("FAILED"));
    let kinds: Vec<&str> = json["faults"]
        .as_array()
        .expect("faults should be array")
        .iter()
        .filter_map(|f| f["fault"]["kind"].as_str())
        .collect();
    assert_eq!(kinds, vec!["panicked", "panicked"]);
}

#[test]
fn test_concurrent_stress_faults_without_allocations() {
    let output = cargo_bin()
        .args([
            "concurrent-stress",
            "--workers",
            "3",
            "--allocs",
            "0",
            "--inject-faults",
            "3",
        ])
        .output()
        .expect("Failed to run concurrent-stress");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Failed workers: 3 / 3"), "stdout: {stdout}");
}

#[test]
fn test_counter_json() {
    let output = cargo_bin()
        .args(["--json", "counter", "--workers", "4", "--increments", "1000"])
        .output()
        .expect("Failed to run counter");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(json["value"].as_u64(), Some(4000));
}
