use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_postscout_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("postscout")
}

#[test]
fn test_login_command_help() {
    let mut cmd = Command::new(get_postscout_bin());
    cmd.arg("login").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Log in interactively"))
        .stdout(predicate::str::contains("--profile"))
        .stdout(predicate::str::contains("--login-url"))
        .stdout(predicate::str::contains("--chrome-path"));
}

#[test]
fn test_top_level_help_lists_subcommands() {
    let mut cmd = Command::new(get_postscout_bin());
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("find"))
        .stdout(predicate::str::contains("completion"));
}

#[test]
fn test_completion_command_generates_script() {
    let mut cmd = Command::new(get_postscout_bin());
    cmd.arg("completion").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("postscout"));
}
