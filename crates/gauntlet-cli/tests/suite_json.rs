//! Integration tests for suite output (`gauntlet tak`, `gauntlet version`).

use std::process::Command;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-p", "gauntlet-cli", "--bin", "gauntlet", "--"]);
    cmd
}

#[test]
fn test_tak_json_is_valid_json() {
    let output = cargo_bin()
        .args(["--json", "tak", "--x", "12", "--y", "8", "--z", "4"])
        .output()
        .expect("Failed to run tak command");

    assert!(output.status.success(), "tak should exit 0");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.trim().starts_with('{'),
        "stdout should begin with '{{': {stdout}"
    );

    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("stdout should be valid JSON");

    assert_eq!(json["bench_schema_version"].as_u64(), Some(1));
    assert_eq!(json["suite"].as_str(), Some("tak"));

    let runtime = &json["runtime"];
    assert!(runtime.get("gauntlet_version").is_some());
    assert!(runtime.get("os").is_some());
    assert!(runtime.get("arch").is_some());

    let results = json["results"].as_array().expect("results should be array");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"].as_str(), Some("tak"));
    assert_eq!(results[0]["value"].as_i64(), Some(5));
    assert!(results[0]["elapsed_ms"].is_u64());

    assert!(json["warnings"].is_array());
}

#[test]
fn test_tak_human_output() {
    let output = cargo_bin()
        .args(["tak", "--x", "18", "--y", "12", "--z", "6"])
        .output()
        .expect("Failed to run tak command");

    // The Tak result is printed, never used as the exit status.
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Tak Results:"), "stdout: {stdout}");
    assert!(stdout.contains("Result: 7 in "), "stdout: {stdout}");
}

#[test]
fn test_tak_accepts_negative_arguments() {
    let output = cargo_bin()
        .args(["--json", "tak", "--x", "-1", "--y", "-2", "--z", "-3"])
        .output()
        .expect("Failed to run tak command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(json["results"][0]["value"].as_i64(), Some(-2));
}

#[test]
fn test_version_json() {
    let output = cargo_bin()
        .args(["--json", "version"])
        .output()
        .expect("Failed to run version command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert!(json["version"].is_string());
    assert!(matches!(
        json["profile"].as_str(),
        Some("debug" | "release")
    ));
}
