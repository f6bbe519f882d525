//! CLI argument surface.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_build_subcommand() {
    Command::cargo_bin("macpkg")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"));
}

#[test]
fn build_help_documents_pair_flags() {
    Command::cargo_bin("macpkg")
        .unwrap()
        .args(["build", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--install"))
        .stdout(predicate::str::contains("--no-uninstall"))
        .stdout(predicate::str::contains("--sign"));
}

#[test]
fn version_flag_reports_version() {
    Command::cargo_bin("macpkg")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_subcommand_fails() {
    Command::cargo_bin("macpkg").unwrap().assert().failure();
}

#[test]
fn install_flag_requires_two_values() {
    Command::cargo_bin("macpkg")
        .unwrap()
        .args(["build", "--install", "only-one"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--install"));
}

#[test]
fn unknown_flag_fails() {
    Command::cargo_bin("macpkg")
        .unwrap()
        .args(["build", "--bogus"])
        .assert()
        .failure();
}
