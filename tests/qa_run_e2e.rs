#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use range_probe::config::HarnessSettings;
use range_probe::harness::{self, HarnessError, HarnessMode, HarnessRequest, Outcome};

const ECHO: &str = "/bin/cat";

/// Write an executable shell script into `dir`
fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn compare(subject: &Path, input: &Path, expected: &Path) -> HarnessRequest {
    HarnessRequest {
        mode: HarnessMode::Compare,
        subject: subject.to_path_buf(),
        input: input.to_path_buf(),
        expected: Some(expected.to_path_buf()),
    }
}

fn bench(subject: &Path, input: &Path) -> HarnessRequest {
    HarnessRequest {
        mode: HarnessMode::Bench,
        subject: subject.to_path_buf(),
        input: input.to_path_buf(),
        expected: None,
    }
}

#[test]
fn qa_tc_echo_subject_matches_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "in.txt", "k 0\nk 1\nq 0 1\n");

    let report = harness::run(
        &compare(Path::new(ECHO), &input, &input),
        &HarnessSettings::default(),
    )
    .unwrap();
    assert_eq!(report.outcome, Outcome::Matched);
    assert_eq!(report.exit_code(), 0);
    assert!(report.is_success());
}

#[test]
fn qa_tc_one_line_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "in.txt", "k 0\nk 1\nq 0 1\n");
    let expected = write(dir.path(), "out.txt", "k 0\nk 2\nq 0 1\n");

    let report = harness::run(
        &compare(Path::new(ECHO), &input, &expected),
        &HarnessSettings::default(),
    )
    .unwrap();
    assert_eq!(report.exit_code(), 1);
    let Outcome::Mismatched(diff) = &report.outcome else {
        panic!("expected a mismatch, got {:?}", report.outcome);
    };
    assert_eq!(diff.removed_lines(), 1);
    assert_eq!(diff.added_lines(), 1);
    assert_eq!(
        diff.to_string(),
        "--- expected\n+++ actual\n@@ -2 +2 @@\n-k 2\n+k 1"
    );
}

#[test]
fn qa_tc_missing_expected_never_invokes_subject() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("invoked");
    let subject = script(
        dir.path(),
        "subject.sh",
        &format!("touch '{}'\ncat", marker.display()),
    );
    let input = write(dir.path(), "in.txt", "k 0\n");

    let err = harness::run(
        &compare(&subject, &input, &dir.path().join("missing.out")),
        &HarnessSettings::default(),
    )
    .unwrap_err();
    assert!(matches!(err, HarnessError::MissingFile { what: "expected", .. }));
    assert_eq!(err.exit_code(), 2);
    assert!(!marker.exists());
}

#[test]
fn qa_tc_missing_input_compare_never_invokes_subject() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("invoked");
    let subject = script(
        dir.path(),
        "subject.sh",
        &format!("touch '{}'\ncat", marker.display()),
    );
    let expected = write(dir.path(), "out.txt", "k 0\n");

    let err = harness::run(
        &compare(&subject, &dir.path().join("missing.in"), &expected),
        &HarnessSettings::default(),
    )
    .unwrap_err();
    assert!(matches!(err, HarnessError::MissingFile { what: "input", .. }));
    assert_eq!(err.exit_code(), 2);
    assert!(!marker.exists());
}

#[test]
fn qa_tc_large_mismatch_reports_every_line() {
    let dir = tempfile::tempdir().unwrap();
    let body: String = (0..50_000).map(|i| format!("q {} {}\n", i, i + 1)).collect();
    let wrong: String = (0..50_000).map(|i| format!("{}\n", i)).collect();
    let input = write(dir.path(), "in.txt", &body);
    let expected = write(dir.path(), "out.txt", &wrong);

    let report = harness::run(
        &compare(Path::new(ECHO), &input, &expected),
        &HarnessSettings::default(),
    )
    .unwrap();
    assert_eq!(report.exit_code(), 1);
    let Outcome::Mismatched(diff) = &report.outcome else {
        panic!("expected a mismatch, got {:?}", report.outcome);
    };
    assert_eq!(diff.removed_lines(), 50_000);
    assert_eq!(diff.added_lines(), 50_000);
}

#[test]
fn qa_tc_failing_subject_propagates_code_in_both_modes() {
    let dir = tempfile::tempdir().unwrap();
    let subject = script(dir.path(), "crash.sh", "echo 'bad key' >&2\nexit 5");
    let input = write(dir.path(), "in.txt", "k 0\n");

    for request in [compare(&subject, &input, &input), bench(&subject, &input)] {
        let report = harness::run(&request, &HarnessSettings::default()).unwrap();
        assert_eq!(
            report.outcome,
            Outcome::SubjectFailed {
                exit_code: Some(5),
                stderr: "bad key\n".to_string()
            }
        );
        assert_eq!(report.exit_code(), 5);
    }
}

#[test]
fn qa_tc_bench_ignores_output_content() {
    let dir = tempfile::tempdir().unwrap();
    let subject = script(dir.path(), "noisy.sh", "echo 'anything at all'");
    let input = write(dir.path(), "in.txt", "k 0\n");

    let report = harness::run(&bench(&subject, &input), &HarnessSettings::default()).unwrap();
    assert_eq!(report.outcome, Outcome::Benchmarked);
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn qa_tc_diff_context_setting() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "in.txt", "1\n2\n3\n");
    let expected = write(dir.path(), "out.txt", "1\nX\n3\n");

    let report = harness::run(
        &compare(Path::new(ECHO), &input, &expected),
        &HarnessSettings { diff_context: 1 },
    )
    .unwrap();
    let Outcome::Mismatched(diff) = &report.outcome else {
        panic!("expected a mismatch");
    };
    assert_eq!(
        diff.to_string(),
        "--- expected\n+++ actual\n@@ -1,3 +1,3 @@\n 1\n-X\n+2\n 3"
    );
}

// ============================================================
// CLI
// ============================================================

fn run_e2e() -> Command {
    Command::new(env!("CARGO_BIN_EXE_run_e2e"))
}

#[test]
fn qa_cli_compare_match() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "in.txt", "k 0\nq 0 0\n");

    let out = run_e2e()
        .args(["--mode", "compare", ECHO])
        .arg(&input)
        .arg(&input)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with("[OK] output matches. elapsed: "));
}

#[test]
fn qa_cli_compare_mismatch_prints_diff() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "in.txt", "a\nb\n");
    let expected = write(dir.path(), "out.txt", "a\nc\n");

    let out = run_e2e()
        .args(["--mode", "compare", ECHO])
        .arg(&input)
        .arg(&expected)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Output differs!"));
    assert!(stdout.contains("--- expected\n+++ actual\n@@ -2 +2 @@\n-c\n+b\n"));
}

#[test]
fn qa_cli_missing_input_exit_2() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_e2e()
        .args(["--mode", "bench", ECHO])
        .arg(dir.path().join("absent.txt"))
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("input file not found"));
}

#[test]
fn qa_cli_compare_missing_input_exit_2() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("invoked");
    let subject = script(
        dir.path(),
        "subject.sh",
        &format!("touch '{}'\ncat", marker.display()),
    );
    let expected = write(dir.path(), "out.txt", "k 0\n");

    let out = run_e2e()
        .args(["--mode", "compare"])
        .arg(&subject)
        .arg(dir.path().join("absent.txt"))
        .arg(&expected)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("input file not found"));
    assert!(!marker.exists());
}

#[test]
fn qa_cli_compare_without_expected_exit_2() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "in.txt", "k 0\n");
    let out = run_e2e()
        .args(["--mode", "compare", ECHO])
        .arg(&input)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn qa_cli_missing_mode_exit_2() {
    let out = run_e2e().args([ECHO, "in.txt"]).output().unwrap();
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn qa_cli_bench_propagates_subject_code() {
    let dir = tempfile::tempdir().unwrap();
    let subject = script(dir.path(), "crash.sh", "echo 'segfault-ish' >&2\nexit 42");
    let input = write(dir.path(), "in.txt", "k 0\n");

    let out = run_e2e()
        .args(["--mode", "bench"])
        .arg(&subject)
        .arg(&input)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(42));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("[ERROR] program exited with code 42"));
    assert!(stderr.contains("segfault-ish"));
}

#[test]
fn qa_cli_bench_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "in.txt", "k 0\n");
    let report = dir.path().join("report.json");

    let out = run_e2e()
        .args(["--mode", "bench", ECHO])
        .arg(&input)
        .arg("--report")
        .arg(&report)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("[BENCH] elapsed: "));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["mode"], "bench");
    assert_eq!(json["outcome"], "bench");
    assert_eq!(json["exit_code"], 0);
}
