//! Command implementations

pub mod available;
pub mod deploy;
pub mod setup;

use anyhow::Result;
use clap::Args;

use crate::command_runner::{CommandRunner, DEFAULT_CMD_TIMEOUT, TokioCommandRunner};
use crate::config::{ProjectConfig, ServerIdentity};
use crate::machine::{Machine, MachineCli};
use crate::output::OutputContext;
use crate::pipeline::StepFuture;
use crate::prompt::{Prompter, TerminalPrompter};

/// Flags shared by `setup` and `deploy`.
#[derive(Args)]
pub struct DeployFlags {
    /// The name for the application
    #[arg(short = 'a', long)]
    pub app_name: String,

    /// Branch to use for deployment
    #[arg(short = 'b', long, default_value = "master")]
    pub branch: String,

    /// Deployment environment for the remote host
    #[arg(short = 'e', long, default_value = "production")]
    pub environment: String,

    /// API key for the service you are deploying to
    #[arg(short = 'k', long)]
    pub key: Option<String>,

    /// Tag to use for deployment. Overrides branch.
    #[arg(short = 't', long)]
    pub tag: Option<String>,

    /// Skip the environment-variable capture step
    #[arg(long)]
    pub skip_envs: bool,

    /// Skip TLS setup and publish the app directly on port 80
    #[arg(long)]
    pub skip_ssl: bool,
}

impl DeployFlags {
    /// Validate the flags into an immutable [`ProjectConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error when a flag value fails validation.
    pub fn into_config(self) -> Result<ProjectConfig> {
        let DeployFlags { app_name, branch, environment, key, tag, skip_envs, skip_ssl } = self;
        Ok(ProjectConfig::new(
            app_name,
            branch,
            environment,
            tag,
            key,
            skip_envs,
            skip_ssl,
        )?)
    }
}

/// Everything a workflow step may touch. Constructed once per run; the
/// server identity is derived here and only ever borrowed afterwards.
pub struct WorkflowContext<M, P, R> {
    pub config: ProjectConfig,
    pub server: ServerIdentity,
    pub machine: M,
    /// Runner for local commands (the git repository check).
    pub local: R,
    pub prompter: P,
    pub out: OutputContext,
    /// Env-var list between capture and container start; dropped (and the
    /// file with it) once the containers have consumed the uploaded copy.
    pub env_file: Option<tempfile::NamedTempFile>,
}

/// Production context: real docker-machine, real terminal prompts.
///
/// # Errors
///
/// Returns an error when the flags fail validation.
pub fn production_context(
    flags: DeployFlags,
    out: OutputContext,
) -> Result<WorkflowContext<MachineCli<TokioCommandRunner>, TerminalPrompter, TokioCommandRunner>> {
    let config = flags.into_config()?;
    let server = ServerIdentity::derive(&config);
    Ok(WorkflowContext {
        config,
        server,
        machine: MachineCli::default_runner(),
        local: TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT),
        prompter: TerminalPrompter,
        out,
        env_file: None,
    })
}

/// Shared final step: query the droplet's address and print access hints.
pub(crate) fn server_info<M, P, R>(cx: &mut WorkflowContext<M, P, R>) -> StepFuture<'_>
where
    M: Machine,
    P: Prompter,
    R: CommandRunner,
{
    Box::pin(async move {
        let out = cx.machine.ip(&cx.server).await?;
        anyhow::ensure!(out.status.success(), "docker-machine ip exited with {}", out.status);
        let ip = String::from_utf8_lossy(&out.stdout).trim().to_owned();
        cx.out.step("Server info");
        cx.out.kv(
            "SSH",
            &format!("ssh root@{ip} -i ~/.docker/machine/machines/{}/id_rsa", cx.server),
        );
        cx.out.kv("App", &format!("http://{ip}"));
        Ok(())
    })
}
