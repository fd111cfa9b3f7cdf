//! End-to-end CLI tests: invoke the `calci` binary itself against a
//! file in a scratch directory and inspect what it writes, rather than
//! driving `Parser`/`Emitter` directly (see `tests/golden.rs` for
//! that). Grounded on the CLI e2e test style used elsewhere in the
//! retrieval pack's compiler projects (temp-directory fixtures via
//! `tempfile`, `assert_cmd::Command` + `predicates` assertions on
//! status and output).

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn calci() -> Command {
    Command::cargo_bin("calci").expect("calci binary should be built")
}

#[test]
fn dash_s_writes_c_file_without_invoking_a_compiler() {
    let dir = TempDir::new().expect("failed to create temp directory");
    let src_path = dir.path().join("hello.calci");
    fs::write(&src_path, "print \"Hello, world\"\n").expect("failed to write source fixture");

    calci().arg(&src_path).arg("-S").assert().success();

    let c_path = dir.path().join("hello.c");
    let generated = fs::read_to_string(&c_path).expect("calci -S should write the .c file");
    assert_eq!(
        generated,
        "#include <stdio.h>\nint main(void){\nprintf(\"Hello, world\");\nreturn 0;\n}\n"
    );
}

#[test]
fn missing_source_file_is_an_io_error() {
    let dir = TempDir::new().expect("failed to create temp directory");
    let missing = dir.path().join("does_not_exist.calci");

    calci()
        .arg(&missing)
        .arg("-S")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Calci - IO Error:"));
}

#[test]
fn undeclared_variable_reports_a_parse_error_and_writes_no_file() {
    let dir = TempDir::new().expect("failed to create temp directory");
    let src_path = dir.path().join("bad.calci");
    fs::write(&src_path, "var x := 1\n").expect("failed to write source fixture");

    calci()
        .arg(&src_path)
        .arg("-S")
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("Calci - Parse Error:")
                .and(predicate::str::contains("ParseError")),
        );

    assert!(!dir.path().join("bad.c").exists());
}

#[test]
fn lang_java_parses_but_writes_no_c_file() {
    let dir = TempDir::new().expect("failed to create temp directory");
    let src_path = dir.path().join("prog.calci");
    fs::write(&src_path, "print \"hi\"\n").expect("failed to write source fixture");

    calci()
        .arg(&src_path)
        .arg("--lang")
        .arg("java")
        .assert()
        .success();

    assert!(!dir.path().join("prog.c").exists());
}

#[test]
fn version_flag_accepts_the_short_form() {
    calci()
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::contains("calci"));
}
