// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Integration tests for the `slate` binary. Each test runs a fixture (or
//! inline code) and checks the console effect and exit status.

use std::path::{Path, PathBuf};
use std::process::Command;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn slate(args: &[&str]) -> (String, String, i32) {
    let out = Command::new(env!("CARGO_BIN_EXE_slate"))
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run slate");
    (
        String::from_utf8_lossy(&out.stdout).to_string(),
        String::from_utf8_lossy(&out.stderr).to_string(),
        out.status.code().unwrap_or(-1),
    )
}

#[test]
fn run_hello_fixture() {
    let path = fixture("hello.slate");
    let (stdout, _, code) = slate(&["run", path.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "Hello, world!\n1\n2\n3\n");
}

#[test]
fn bare_filename_runs_too() {
    let path = fixture("hello.slate");
    let (stdout, _, code) = slate(&[path.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Hello, world!\n"));
}

#[test]
fn type_error_reports_position_and_kind() {
    let path = fixture("bad_type.slate");
    let (_, stderr, code) = slate(&["run", path.to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("At line 2, column 1, index 23:"), "stderr: {}", stderr);
    assert!(
        stderr.contains("TypeCheckError: Expected type INTEGER; received STRING instead"),
        "stderr: {}",
        stderr
    );
}

#[test]
fn eval_runs_raw_source() {
    let (stdout, _, code) = slate(&["eval", "OUTPUT 2 + 3"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "5\n");
}

#[test]
fn eval_accepts_strict_flag() {
    let (stdout, _, code) = slate(&["eval", "--strict", "OUTPUT 1"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "1\n");
}

#[test]
fn lexical_failure_reports_invalid_syntax() {
    let (_, stderr, code) = slate(&["eval", "OUTPUT $"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("SyntaxError: Invalid syntax"), "stderr: {}", stderr);
}

#[test]
fn missing_file_is_a_user_error() {
    let (_, stderr, code) = slate(&["run", "no_such_program.slate"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("file of that name does not exist"), "stderr: {}", stderr);
}

#[test]
fn unknown_command_fails_with_usage() {
    let (_, stderr, code) = slate(&["frobnicate"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown command"), "stderr: {}", stderr);
}
