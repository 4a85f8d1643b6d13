//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. Only
//! side-effect-free commands are exercised here; the stateful flows are
//! covered by the core crate's integration tests against in-memory
//! storage.

use std::process::Command;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(args: &[&str]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-p", "focusquest-cli", "--quiet", "--"])
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (code, stdout, stderr)
}

#[test]
fn help_lists_subcommands() {
    let (code, stdout, _) = run_cli(&["--help"]);
    assert_eq!(code, 0);
    for subcommand in ["account", "task", "session", "stats", "config"] {
        assert!(stdout.contains(subcommand), "missing {subcommand} in help");
    }
}

#[test]
fn preview_reports_points() {
    let (code, stdout, _) = run_cli(&[
        "session", "preview", "--kind", "work", "--minutes", "25",
    ]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "15");
}

#[test]
fn preview_applies_streak_multiplier() {
    let (code, stdout, _) = run_cli(&[
        "session", "preview", "--kind", "work", "--minutes", "25", "--streak", "3",
    ]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "20");
}

#[test]
fn preview_rejects_unknown_kind() {
    let (code, _, stderr) = run_cli(&[
        "session", "preview", "--kind", "nap", "--minutes", "25",
    ]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Unknown session kind"));
}
