//! CLI integration tests
//!
//! End-to-end tests for the binary surface using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the walletwatch binary for testing
fn walletwatch_cmd() -> Command {
    Command::cargo_bin("walletwatch").unwrap()
}

#[test]
fn test_version_output() {
    walletwatch_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("walletwatch"));
}

#[test]
fn test_help_shows_all_commands() {
    walletwatch_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("replay"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_watch_help() {
    walletwatch_cmd()
        .args(["watch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--network"))
        .stdout(predicate::str::contains("--direction"))
        .stdout(predicate::str::contains("--endpoint"));
}

#[test]
fn test_watch_rejects_unknown_network() {
    walletwatch_cmd()
        .args(["watch", "--network", "solana", "--no-preflight"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("network"));
}

#[test]
fn test_config_init_creates_file() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("walletwatch.toml");

    walletwatch_cmd()
        .args(["config", "init", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("created"));

    let content = std::fs::read_to_string(&output).unwrap();
    assert!(content.contains("[stream]"));
    assert!(content.contains("[reconnect]"));
}

#[test]
fn test_config_init_refuses_overwrite_without_force() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("walletwatch.toml");
    std::fs::write(&output, "existing").unwrap();

    walletwatch_cmd()
        .args(["config", "init", "--output"])
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_replay_classifies_frames() {
    let temp_dir = TempDir::new().unwrap();
    let frames = temp_dir.path().join("frames.jsonl");
    std::fs::write(
        &frames,
        concat!(
            r#"{"type":"progress","processed":3,"total":10,"percentage":30}"#,
            "\n",
            r#"{"type":"alert","alert":{"priority":"high","message":"Large buy detected"}}"#,
            "\n",
            "not json\n",
        ),
    )
    .unwrap();

    walletwatch_cmd()
        .arg("replay")
        .arg(&frames)
        .assert()
        .success()
        .stdout(predicate::str::contains("3/10 (30%)"))
        .stdout(predicate::str::contains("Large buy detected"))
        .stdout(predicate::str::contains("Unparseable"));
}

#[test]
fn test_replay_json_output_is_parseable() {
    let temp_dir = TempDir::new().unwrap();
    let frames = temp_dir.path().join("frames.jsonl");
    std::fs::write(&frames, "{\"type\":\"complete\"}\n").unwrap();

    let output = walletwatch_cmd()
        .arg("replay")
        .arg(&frames)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let line = String::from_utf8(output.stdout).unwrap();
    let record: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
    assert_eq!(record["severity"], "success");
    assert_eq!(record["message"], "Analysis complete");
}

#[test]
fn test_replay_missing_file_fails() {
    walletwatch_cmd()
        .args(["replay", "/nonexistent/frames.jsonl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn test_completions_bash() {
    walletwatch_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("walletwatch"));
}
