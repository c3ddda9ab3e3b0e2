//! Validation gate outcomes against canned machine and runner doubles.

use oceanup::checks::{Check, CheckOutcome, listing_shows_project};
use oceanup::config::{ProjectConfig, ServerIdentity};

use crate::mocks::{FailRunner, OkRunner, ScriptedMachine, ps_listing};

fn server() -> ServerIdentity {
    let cfg = ProjectConfig::new(
        "demo".to_owned(),
        "master".to_owned(),
        "production".to_owned(),
        None,
        None,
        false,
        false,
    )
    .expect("valid config");
    ServerIdentity::derive(&cfg)
}

#[tokio::test]
async fn tool_installed_passes_when_version_succeeds() {
    let machine = ScriptedMachine::fresh();
    let outcome = Check::ToolInstalled
        .evaluate(&machine, &OkRunner, &server())
        .await
        .expect("check should run");
    assert!(outcome.passed());
}

#[tokio::test]
async fn tool_installed_fails_when_version_fails() {
    let machine = ScriptedMachine { tool_ok: false, ..ScriptedMachine::fresh() };
    let outcome = Check::ToolInstalled
        .evaluate(&machine, &OkRunner, &server())
        .await
        .expect("check should run");
    match outcome {
        CheckOutcome::Failed(reason) => assert!(reason.contains("not installed")),
        CheckOutcome::Passed => panic!("expected failure"),
    }
}

#[tokio::test]
async fn repo_valid_reflects_git_exit_status() {
    let machine = ScriptedMachine::fresh();
    let ok = Check::RepoValid
        .evaluate(&machine, &OkRunner, &server())
        .await
        .expect("check should run");
    assert!(ok.passed());

    let failed = Check::RepoValid
        .evaluate(&machine, &FailRunner, &server())
        .await
        .expect("check should run");
    assert!(!failed.passed());
}

#[tokio::test]
async fn name_unique_fails_when_identity_is_listed() {
    let machine = ScriptedMachine {
        ls_output: "NAME              ACTIVE   DRIVER\ndemo-production   -        digitalocean\n"
            .to_owned(),
        ..ScriptedMachine::fresh()
    };
    let outcome = Check::NameUnique
        .evaluate(&machine, &OkRunner, &server())
        .await
        .expect("check should run");
    match outcome {
        CheckOutcome::Failed(reason) => assert!(reason.contains("demo-production")),
        CheckOutcome::Passed => panic!("expected failure"),
    }
}

#[tokio::test]
async fn name_unique_passes_on_an_empty_listing() {
    let machine = ScriptedMachine::fresh();
    let outcome = Check::NameUnique
        .evaluate(&machine, &OkRunner, &server())
        .await
        .expect("check should run");
    assert!(outcome.passed());
}

#[tokio::test]
async fn host_running_fails_on_stopped_status() {
    let machine = ScriptedMachine {
        status_output: "Stopped\n".to_owned(),
        ..ScriptedMachine::fresh()
    };
    let outcome = Check::HostRunning
        .evaluate(&machine, &OkRunner, &server())
        .await
        .expect("check should run");
    match outcome {
        CheckOutcome::Failed(reason) => assert!(reason.contains("stopped")),
        CheckOutcome::Passed => panic!("expected failure"),
    }
}

#[tokio::test]
async fn project_setup_requires_the_exact_topology() {
    for (containers, expected) in [(0, false), (1, false), (2, true), (3, false)] {
        let machine = ScriptedMachine {
            ps_output: ps_listing(containers),
            ..ScriptedMachine::fresh()
        };
        let outcome = Check::ProjectSetup
            .evaluate(&machine, &OkRunner, &server())
            .await
            .expect("check should run");
        assert_eq!(
            outcome.passed(),
            expected,
            "{containers} containers should classify as setup={expected}"
        );
    }
}

#[test]
fn listing_boundary_counts() {
    assert!(!listing_shows_project(&ps_listing(0)));
    assert!(!listing_shows_project(&ps_listing(1)));
    assert!(listing_shows_project(&ps_listing(2)));
    assert!(!listing_shows_project(&ps_listing(3)));
}
