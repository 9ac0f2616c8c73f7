//! Integration tests for the `check` command.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn verdict() -> Command {
    Command::new(env!("CARGO_BIN_EXE_verdict"))
}

fn temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".vd")
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn check_valid_expression() {
    let file = temp_file("$speed > 90 and $zone in ('school', 'residential')\n");

    verdict()
        .args(["check", file.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));
}

#[test]
fn check_multiple_valid_files() {
    let file1 = temp_file("1 + 2 > 2");
    let file2 = temp_file("true and false");
    let file3 = temp_file("contains($s, 'x')");

    verdict()
        .args([
            "check",
            file1.path().to_str().unwrap(),
            file2.path().to_str().unwrap(),
            file3.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK").count(3));
}

#[test]
fn check_validation_error_names_the_file() {
    let file = temp_file("'a' > 1");
    let path = file.path().to_str().unwrap();

    verdict()
        .args(["--no-color", "check", path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[E002] Error"))
        .stderr(predicate::str::contains(path));
}

#[test]
fn check_does_not_evaluate() {
    // Unbound variables and division by zero are evaluation-time problems.
    let file = temp_file("$x / 0 > 1");

    verdict()
        .args(["check", file.path().to_str().unwrap()])
        .assert()
        .success();
}

#[test]
fn check_mixed_results() {
    let good = temp_file("$a or $b");
    let bad = temp_file("$a or");

    verdict()
        .args([
            "--no-color",
            "check",
            good.path().to_str().unwrap(),
            bad.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("OK").count(1))
        .stderr(predicate::str::contains("[E001] Error"));
}

#[test]
fn check_missing_file() {
    verdict()
        .args(["check", "/nonexistent/rule.vd"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: /nonexistent/rule.vd"));
}

#[test]
fn check_stdin() {
    verdict()
        .args(["check", "-"])
        .write_stdin("$a = true")
        .assert()
        .success()
        .stdout("<stdin>: OK\n");
}

#[test]
fn check_quiet() {
    let file = temp_file("$a >");

    verdict()
        .args(["check", "--quiet", file.path().to_str().unwrap()])
        .assert()
        .failure()
        .stdout("")
        .stderr("");
}
