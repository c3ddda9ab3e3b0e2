//! Deployment flows: precondition gates, the update path, and deferral to
//! provisioning.

use oceanup::commands::deploy;
use oceanup::config::ProjectConfig;

use crate::mocks::{MachineCall, ScriptedMachine, ScriptedPrompter, context, test_config};

#[tokio::test]
async fn stopped_host_halts_with_no_remote_mutation() {
    let machine = ScriptedMachine {
        status_output: "Stopped\n".to_owned(),
        ..ScriptedMachine::fresh()
    };
    let mut cx = context(test_config(true, true), machine, ScriptedPrompter::with_answers(&[]));
    let err = deploy::run(&mut cx).await.expect_err("a stopped host must halt the deploy");

    assert!(format!("{err:#}").contains("stopped"));
    assert_eq!(
        cx.machine.recorded(),
        vec![MachineCall::Status],
        "only the status query may run before the gate fails"
    );
}

#[tokio::test]
async fn update_path_pulls_rebuilds_and_restarts() {
    let mut cx = context(
        test_config(true, true),
        ScriptedMachine::provisioned(),
        ScriptedPrompter::with_answers(&[]),
    );
    deploy::run(&mut cx).await.expect("deploy should succeed");

    let streamed = cx.machine.streamed_commands();
    assert!(streamed.iter().any(|c| c.contains("git pull")));
    assert!(streamed.iter().any(|c| c.contains("docker container stop oceanup-web")));
    assert!(streamed.iter().any(|c| c.contains("docker container rm oceanup-web")));
    assert!(streamed.iter().any(|c| c.contains("docker build")));
    assert!(
        streamed.iter().any(|c| c.contains("--name oceanup-web") && c.contains("-p 80:3000")),
        "the app container must be restarted with the TLS-driven port"
    );
    assert!(
        !streamed.iter().any(|c| c.contains("--name oceanup-db")),
        "the database container is assumed to survive from provisioning"
    );
    assert!(!cx.machine.created(), "deploy must not create a droplet");
    assert!(cx.machine.recorded().contains(&MachineCall::Ip));
}

#[tokio::test]
async fn tag_takes_precedence_over_branch_on_checkout() {
    let config = ProjectConfig::new(
        "demo".to_owned(),
        "master".to_owned(),
        "production".to_owned(),
        Some("v1.2.0".to_owned()),
        Some("do-token".to_owned()),
        true,
        true,
    )
    .expect("valid config");
    let mut cx = context(config, ScriptedMachine::provisioned(), ScriptedPrompter::with_answers(&[]));
    deploy::run(&mut cx).await.expect("deploy should succeed");

    assert!(
        cx.machine
            .streamed_commands()
            .iter()
            .any(|c| c.contains("git checkout tags/v1.2.0")),
        "the tag ref must win over the branch"
    );
}

#[tokio::test]
async fn unprovisioned_host_defers_to_full_provisioning() {
    let mut cx = context(
        test_config(true, true),
        ScriptedMachine::fresh(),
        ScriptedPrompter::with_answers(&["git@github.com:user/demo.git"]),
    );
    deploy::run(&mut cx).await.expect("deferred provisioning should succeed");

    assert!(cx.machine.created(), "deploy against a bare host must provision it");
    assert!(
        cx.machine.streamed_commands().iter().any(|c| c.contains("git clone")),
        "the provisioning pipeline must run"
    );
}
