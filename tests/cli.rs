/*!
 * Command-line behaviour that does not depend on a clipboard being present
 */

use std::process::Command;
use std::time::{Duration, Instant};

use tempfile::tempdir;

fn bulkpaste() -> Command {
    Command::new(env!("CARGO_BIN_EXE_bulkpaste"))
}

#[test]
fn test_no_arguments_prints_usage() {
    let output = bulkpaste().output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No files provided."));
    assert!(stdout.contains("Usage"));
}

#[test]
fn test_usage_honors_pause() {
    let started = Instant::now();
    let output = bulkpaste().args(["--pause-ms", "300"]).output().unwrap();

    assert!(output.status.success());
    assert!(started.elapsed() >= Duration::from_millis(300));
    assert!(String::from_utf8_lossy(&output.stdout).contains("No files provided."));
}

#[test]
fn test_nothing_to_copy_exit_code() {
    let temp_dir = tempdir().unwrap();
    let settings = temp_dir.path().join("settings.txt");
    std::fs::write(&settings, "ignore_patterns|*.txt\n").unwrap();
    std::fs::write(temp_dir.path().join("skip.txt"), "ignored").unwrap();

    let output = bulkpaste()
        .args([
            "--no-report",
            "--config",
            &settings.to_string_lossy(),
            &temp_dir.path().to_string_lossy(),
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_missing_explicit_config_fails() {
    let temp_dir = tempdir().unwrap();
    let output = bulkpaste()
        .args([
            "--config",
            &temp_dir.path().join("nope.txt").to_string_lossy(),
            ".",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
}
