//! Behavioral specs for argument handling and exit codes.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

#[test]
fn help_exits_zero() {
    finder_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_exits_zero() {
    finder_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_filter_exits_one() {
    finder_cmd().arg("frobnicate").assert().code(1);
}

#[test]
fn missing_filter_arguments_exit_one() {
    finder_cmd().arg("api").assert().code(1);
}

#[test]
fn malformed_threshold_exits_one() {
    finder_cmd()
        .args(["user-count", "not-a-number"])
        .assert()
        .code(1);
}

#[test]
fn empty_input_exits_zero() {
    let corpus = Corpus::new();
    run_filter(&corpus, &["api", "tabs.create"], "")
        .success()
        .stdout(predicate::str::is_empty());
}
