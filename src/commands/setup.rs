//! `oceanup setup` — first-time provisioning: create the droplet, prepare
//! it, clone the project, and start the containers.
//!
//! The sequence is strictly forward-only. A failing step halts the run in
//! place; resources already created (the droplet, a partially built image)
//! are left for out-of-band cleanup.

use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use tempfile::NamedTempFile;

use super::WorkflowContext;
use crate::checks::Check;
use crate::command_runner::CommandRunner;
use crate::machine::Machine;
use crate::pipeline::{self, Step, StepFuture};
use crate::prompt::Prompter;
use crate::remote;
use crate::shell;

/// Run the full provisioning workflow.
///
/// # Errors
///
/// Returns the first failing step, wrapped with its name.
pub async fn run<M, P, R>(cx: &mut WorkflowContext<M, P, R>) -> Result<()>
where
    M: Machine,
    P: Prompter,
    R: CommandRunner,
{
    provision(cx).await
}

/// The provisioning pipeline, also entered by `deploy` when the droplet
/// turns out not to be set up yet.
///
/// # Errors
///
/// Returns the first failing step, wrapped with its name.
pub async fn provision<M, P, R>(cx: &mut WorkflowContext<M, P, R>) -> Result<()>
where
    M: Machine,
    P: Prompter,
    R: CommandRunner,
{
    cx.out.step(&format!("Provisioning server: {}", cx.server));
    let steps = steps(&cx.config);
    pipeline::run(&steps, cx).await?;
    Ok(())
}

fn steps<M, P, R>(config: &crate::config::ProjectConfig) -> Vec<Step<WorkflowContext<M, P, R>>>
where
    M: Machine,
    P: Prompter,
    R: CommandRunner,
{
    let mut steps = vec![
        Step::new("check-repo", check_repo),
        Step::new("check-tool", check_tool),
        Step::new("check-name", check_name),
        Step::new("create-host", create_host),
        Step::new("configure-swap", configure_swap),
        Step::new("generate-deploy-key", generate_deploy_key),
        Step::new("clone-project", clone_project),
    ];
    if !config.skip_vars {
        steps.push(Step::new("capture-env-vars", capture_env_vars));
    }
    steps.push(Step::new("start-containers", start_containers));
    if !config.skip_ssl {
        steps.push(Step::new("configure-tls", configure_tls));
    }
    steps.push(Step::new("server-info", super::server_info));
    steps
}

fn check_repo<M, P, R>(cx: &mut WorkflowContext<M, P, R>) -> StepFuture<'_>
where
    M: Machine,
    P: Prompter,
    R: CommandRunner,
{
    Box::pin(async move {
        Check::RepoValid.ensure(&cx.machine, &cx.local, &cx.server).await
    })
}

fn check_tool<M, P, R>(cx: &mut WorkflowContext<M, P, R>) -> StepFuture<'_>
where
    M: Machine,
    P: Prompter,
    R: CommandRunner,
{
    Box::pin(async move {
        Check::ToolInstalled.ensure(&cx.machine, &cx.local, &cx.server).await
    })
}

fn check_name<M, P, R>(cx: &mut WorkflowContext<M, P, R>) -> StepFuture<'_>
where
    M: Machine,
    P: Prompter,
    R: CommandRunner,
{
    Box::pin(async move {
        Check::NameUnique.ensure(&cx.machine, &cx.local, &cx.server).await
    })
}

fn create_host<M, P, R>(cx: &mut WorkflowContext<M, P, R>) -> StepFuture<'_>
where
    M: Machine,
    P: Prompter,
    R: CommandRunner,
{
    Box::pin(async move {
        cx.out.step(&format!("Creating docker machine: {}", cx.server));
        let token = match &cx.config.key {
            Some(key) => key.clone(),
            None => {
                cx.out.info("Enter a write-enabled API token, or create one first:");
                cx.out.kv("Token URL", remote::TOKEN_URL);
                cx.prompter.secret("DigitalOcean access token")?
            }
        };
        ensure!(!token.trim().is_empty(), "an API token is required to create the droplet");
        cx.machine.create(&cx.server, token.trim()).await
    })
}

fn configure_swap<M, P, R>(cx: &mut WorkflowContext<M, P, R>) -> StepFuture<'_>
where
    M: Machine,
    P: Prompter,
    R: CommandRunner,
{
    Box::pin(async move {
        cx.out.step("Creating swapfile");
        cx.machine.ssh_stream(&cx.server, &remote::swap_setup_command()).await?;
        cx.machine.ssh_stream(&cx.server, remote::swap_persist_command()).await
    })
}

fn generate_deploy_key<M, P, R>(cx: &mut WorkflowContext<M, P, R>) -> StepFuture<'_>
where
    M: Machine,
    P: Prompter,
    R: CommandRunner,
{
    Box::pin(async move {
        cx.out.step("Creating deploy key");
        cx.machine
            .ssh_stream(&cx.server, &remote::keygen_command(&cx.config.app_name))
            .await?;
        cx.out.warn("Add this public key to your project's deploy keys on GitHub or GitLab:");
        cx.machine.ssh_stream(&cx.server, remote::SHOW_DEPLOY_KEY).await
    })
}

fn clone_project<M, P, R>(cx: &mut WorkflowContext<M, P, R>) -> StepFuture<'_>
where
    M: Machine,
    P: Prompter,
    R: CommandRunner,
{
    Box::pin(async move {
        cx.out.step("Cloning project");
        cx.machine.ssh_stream(&cx.server, remote::INSTALL_GIT).await?;

        let answer = cx
            .prompter
            .input("Repository to deploy from (e.g. git@github.com:username/project.git)")?;
        let repo_url = shell::validate_repo_url(&answer)?;

        cx.machine.ssh_stream(&cx.server, remote::SEED_KNOWN_HOSTS).await?;
        cx.machine
            .ssh_stream(&cx.server, &remote::clone_command(repo_url, cx.config.clone_ref()))
            .await?;

        // Local config template rides along when the project keeps one.
        let template = Path::new("database.yml");
        if template.exists() {
            cx.out.info("Copying local database.yml into the project");
            cx.machine
                .scp(&cx.server, template, &format!("{}/database.yml", remote::PROJECT_DIR))
                .await?;
        }
        Ok(())
    })
}

fn capture_env_vars<M, P, R>(cx: &mut WorkflowContext<M, P, R>) -> StepFuture<'_>
where
    M: Machine,
    P: Prompter,
    R: CommandRunner,
{
    Box::pin(async move {
        cx.out.step("Capturing environment variables");
        let answer = cx
            .prompter
            .input("Environment variables as space-separated KEY=VALUE pairs")?;
        let pairs = shell::parse_env_pairs(&answer)?;

        let mut file = NamedTempFile::new().context("creating env file")?;
        for (key, value) in &pairs {
            writeln!(file, "{key}={value}").context("writing env file")?;
        }
        file.flush().context("flushing env file")?;

        cx.machine
            .scp(&cx.server, file.path(), &format!("{}/.env", remote::PROJECT_DIR))
            .await?;

        // Held until the containers have consumed the uploaded copy.
        cx.env_file = Some(file);
        Ok(())
    })
}

fn start_containers<M, P, R>(cx: &mut WorkflowContext<M, P, R>) -> StepFuture<'_>
where
    M: Machine,
    P: Prompter,
    R: CommandRunner,
{
    Box::pin(async move {
        cx.out.step("Setting up project. This may take a few minutes");
        cx.machine.ssh_stream(&cx.server, &remote::network_create_command()).await?;
        cx.machine.ssh_stream(&cx.server, &remote::build_image_command()).await?;
        cx.machine
            .ssh_stream(&cx.server, &remote::db_run_command(&cx.config.environment))
            .await?;

        let with_env_file = cx.env_file.is_some();
        cx.machine
            .ssh_stream(
                &cx.server,
                &remote::web_run_command(&cx.config.environment, cx.config.skip_ssl, with_env_file),
            )
            .await?;

        // The remote .env now backs the container; drop the local copy.
        cx.env_file = None;

        cx.out.success("Initial server setup & deployment complete");
        Ok(())
    })
}

fn configure_tls<M, P, R>(cx: &mut WorkflowContext<M, P, R>) -> StepFuture<'_>
where
    M: Machine,
    P: Prompter,
    R: CommandRunner,
{
    Box::pin(async move {
        cx.out.step("Configuring TLS proxy");
        let answer = cx.prompter.input("Domain name for the app")?;
        let domain = shell::validate_domain(&answer)?;
        let answer = cx.prompter.input("Contact email for certificate registration")?;
        let email = shell::validate_email(&answer)?;

        let mut file = NamedTempFile::new().context("creating proxy config")?;
        file.write_all(remote::caddyfile(domain, email).as_bytes())
            .context("writing proxy config")?;
        file.flush().context("flushing proxy config")?;

        cx.machine.ssh_stream(&cx.server, remote::PREPARE_PROXY_DIR).await?;
        cx.machine.scp(&cx.server, file.path(), remote::CADDYFILE_PATH).await?;
        cx.machine.ssh_stream(&cx.server, &remote::proxy_install_command()).await?;

        cx.out.success(&format!("TLS proxy serving https://{domain}"));
        Ok(())
    })
}
