//! `oceanup deploy` — update-only path: pull the latest source, rebuild,
//! and restart the app container on an already-provisioned droplet.

use anyhow::{Result, bail};

use super::WorkflowContext;
use crate::checks::{Check, CheckOutcome};
use crate::command_runner::CommandRunner;
use crate::machine::Machine;
use crate::pipeline::{self, Step, StepFuture};
use crate::prompt::Prompter;
use crate::remote;

/// Run the deployment workflow.
///
/// Preconditions run before any mutation: a stopped droplet halts the run,
/// and a droplet that never finished provisioning defers to the full
/// provisioning workflow instead.
///
/// # Errors
///
/// Returns the first failing gate or step.
pub async fn run<M, P, R>(cx: &mut WorkflowContext<M, P, R>) -> Result<()>
where
    M: Machine,
    P: Prompter,
    R: CommandRunner,
{
    if let CheckOutcome::Failed(reason) =
        Check::HostRunning.evaluate(&cx.machine, &cx.local, &cx.server).await?
    {
        bail!(reason);
    }

    let setup = Check::ProjectSetup.evaluate(&cx.machine, &cx.local, &cx.server).await?;
    if !setup.passed() {
        cx.out.info("The droplet is not set up yet; running first-time provisioning instead.");
        return super::setup::provision(cx).await;
    }

    cx.out.step(&format!("Deploying: {}", cx.server));
    pipeline::run(&steps(), cx).await?;
    Ok(())
}

fn steps<M, P, R>() -> Vec<Step<WorkflowContext<M, P, R>>>
where
    M: Machine,
    P: Prompter,
    R: CommandRunner,
{
    vec![
        Step::new("update-project", update_project),
        Step::new("redeploy-project", redeploy_project),
        Step::new("server-info", super::server_info),
    ]
}

fn update_project<M, P, R>(cx: &mut WorkflowContext<M, P, R>) -> StepFuture<'_>
where
    M: Machine,
    P: Prompter,
    R: CommandRunner,
{
    Box::pin(async move {
        cx.out.step("Updating project");
        cx.machine
            .ssh_stream(&cx.server, &remote::update_command(&cx.config.checkout_ref()))
            .await
    })
}

fn redeploy_project<M, P, R>(cx: &mut WorkflowContext<M, P, R>) -> StepFuture<'_>
where
    M: Machine,
    P: Prompter,
    R: CommandRunner,
{
    Box::pin(async move {
        cx.out.step("Deploying project");
        for command in remote::redeploy_commands(&cx.config.environment, cx.config.skip_ssl) {
            cx.machine.ssh_stream(&cx.server, &command).await?;
        }
        cx.out.success("Deployment complete");
        Ok(())
    })
}
