use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_postscout_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("postscout")
}

#[test]
fn test_find_command_help() {
    let mut cmd = Command::new(get_postscout_bin());
    cmd.arg("find").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Search a profile feed for a post",
        ))
        .stdout(predicate::str::contains("--exact"))
        .stdout(predicate::str::contains("--threshold"))
        .stdout(predicate::str::contains("--early-stop"))
        .stdout(predicate::str::contains("--max-scrolls"))
        .stdout(predicate::str::contains("--profile"));
}

#[test]
fn test_find_command_requires_url_and_text() {
    let mut cmd = Command::new(get_postscout_bin());
    cmd.arg("find");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_find_command_rejects_out_of_range_threshold() {
    let mut cmd = Command::new(get_postscout_bin());
    cmd.arg("find")
        .arg("https://x.com/SomeUser")
        .arg("a long enough target text to be a post body")
        .arg("--threshold")
        .arg("1.5");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("outside [0, 1]"));
}

#[test]
fn test_find_command_rejects_invalid_url() {
    let mut cmd = Command::new(get_postscout_bin());
    cmd.arg("find")
        .arg("not a url")
        .arg("a long enough target text to be a post body");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not a valid profile URL"));
}

#[test]
fn test_find_command_rejects_short_target_without_a_browser() {
    // Target validation runs before Chrome discovery, so this fails fast
    // and identically on machines with no Chrome installed.
    let mut cmd = Command::new(get_postscout_bin());
    cmd.arg("find").arg("https://x.com/SomeUser").arg("hi");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid search target"));
}
