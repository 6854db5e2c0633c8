//! Integration tests for the command-line binary
//!
//! The binary runs without GEOCODE_API_KEY, so every lookup is served from the
//! fallback table and no network access is needed.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_mpm-geocache"))
        .args(args)
        .env_remove("GEOCODE_API_KEY")
        .env_remove("GEOCODE_BASE_URL")
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute mpm-geocache")
}

fn stdout_lines(output: &std::process::Output) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("Each stdout line should be JSON"))
        .collect()
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("mpm-geocache"), "Help should mention the binary");
    assert!(stdout.contains("--ttl-ms"), "Help should mention --ttl-ms");
}

#[test]
fn test_missing_zip_is_an_error() {
    let output = run_cli(&[]);
    assert!(!output.status.success());
}

#[test]
fn test_invalid_log_format_prints_error_and_exits() {
    let output = run_cli(&["--log-format", "xml", "90210"]);
    assert!(!output.status.success(), "Expected invalid log format to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid log format"),
        "Should print error message about log format: {}",
        stderr
    );
}

#[test]
fn test_offline_lookup_uses_fallback_table() {
    let output = run_cli(&["--with-source", "90210", "00000", "abcde"]);
    assert!(output.status.success(), "Misses should not fail the command");

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 3);

    assert_eq!(lines[0]["zip"], "90210");
    assert_eq!(lines[0]["coordinates"]["lat"], 34.0901);
    assert_eq!(lines[0]["coordinates"]["lng"], -118.4093);
    assert_eq!(lines[0]["source"], "fallback");

    assert_eq!(lines[1]["zip"], "00000");
    assert!(lines[1]["coordinates"].is_null());

    assert_eq!(lines[2]["zip"], "abcde");
    assert!(lines[2]["coordinates"].is_null());
}

#[test]
fn test_stats_flag_prints_summary() {
    let output = run_cli(&["--stats", "10001", "12345"]);
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    let stats = &lines.last().expect("Should print stats")["stats"];
    assert_eq!(stats["fallback_hits"], 1);
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["entries"], 1);
}
