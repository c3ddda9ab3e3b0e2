//! Integration tests for the CLI surface, run against the real binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn oceanup() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("oceanup"));
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn no_args_shows_help_and_exits_nonzero() {
    // clap with arg_required_else_help prints help on stderr and exits 2
    oceanup().assert().code(2).stderr(predicate::str::contains(
        "Provision a DigitalOcean droplet",
    ));
}

#[test]
fn help_lists_all_commands() {
    oceanup()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("setup"))
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("available"));
}

#[test]
fn version_flag_prints_the_package_version() {
    oceanup()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("oceanup"));
}

#[test]
fn setup_requires_an_app_name() {
    oceanup()
        .arg("setup")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--app-name"));
}

#[test]
fn setup_help_documents_the_shared_flags() {
    oceanup()
        .args(["setup", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--branch"))
        .stdout(predicate::str::contains("--environment"))
        .stdout(predicate::str::contains("--skip-envs"))
        .stdout(predicate::str::contains("--skip-ssl"));
}

#[test]
fn setup_rejects_an_app_name_with_shell_metacharacters() {
    oceanup()
        .args(["setup", "-a", "demo; rm -rf /"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("app name"));
}

#[test]
fn deploy_rejects_a_hostile_tag() {
    oceanup()
        .args(["deploy", "-a", "demo", "-t", "v1.0$(reboot)"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("tag"));
}
