//! docker-machine CLI abstraction — enables test doubles for every remote
//! operation.

use std::path::Path;
use std::process::Output;

use anyhow::{Context, Result, ensure};

use crate::command_runner::{
    CommandRunner, DEFAULT_CMD_TIMEOUT, DEFAULT_EXEC_TIMEOUT, TokioCommandRunner,
};
use crate::config::ServerIdentity;
use crate::remote;

/// Operations against the host-provisioning tool.
///
/// Query operations capture output for the caller to inspect; mutating and
/// long-running operations inherit stdio so the operator watches them live,
/// and report a nonzero exit as an error.
#[allow(async_fn_in_trait)]
pub trait Machine {
    /// Run `docker-machine version`; an error or nonzero exit means the
    /// tool is not usable.
    async fn version(&self) -> Result<Output>;

    /// Run `docker-machine ls`, capturing the host listing.
    async fn ls(&self) -> Result<Output>;

    /// Run `docker-machine status <name>`, capturing the status text.
    async fn status(&self, name: &ServerIdentity) -> Result<Output>;

    /// Run `docker-machine ip <name>`, capturing the address.
    async fn ip(&self, name: &ServerIdentity) -> Result<Output>;

    /// Run `docker-machine create` for a fixed-tier droplet, streaming the
    /// provisioner's output. Blocks until creation completes or fails.
    async fn create(&self, name: &ServerIdentity, token: &str) -> Result<()>;

    /// Run one command string on the droplet via `docker-machine ssh`,
    /// streaming stdio live. Blocks until the remote process exits.
    async fn ssh_stream(&self, name: &ServerIdentity, command: &str) -> Result<()>;

    /// Run one command string on the droplet, capturing its output.
    async fn ssh_capture(&self, name: &ServerIdentity, command: &str) -> Result<Output>;

    /// Copy one local file to a path on the droplet via `docker-machine scp`.
    async fn scp(&self, name: &ServerIdentity, local: &Path, remote: &str) -> Result<()>;
}

/// Production implementation — shells out to the `docker-machine` binary
/// through a [`CommandRunner`].
///
/// Two runners are held: `cmd_runner` for local subcommands (version, ls,
/// status, ip) and `exec_runner` for captured commands that run on the
/// droplet and may be slower.
pub struct MachineCli<R: CommandRunner> {
    cmd_runner: R,
    exec_runner: R,
}

impl<R: CommandRunner> MachineCli<R> {
    pub fn new(cmd_runner: R, exec_runner: R) -> Self {
        Self { cmd_runner, exec_runner }
    }
}

impl MachineCli<TokioCommandRunner> {
    /// Convenience constructor for production use with default timeouts.
    #[must_use]
    pub fn default_runner() -> Self {
        Self {
            cmd_runner: TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT),
            exec_runner: TokioCommandRunner::new(DEFAULT_EXEC_TIMEOUT),
        }
    }
}

impl<R: CommandRunner> Machine for MachineCli<R> {
    async fn version(&self) -> Result<Output> {
        self.cmd_runner
            .run("docker-machine", &["version"])
            .await
            .context("failed to run docker-machine version")
    }

    async fn ls(&self) -> Result<Output> {
        self.cmd_runner
            .run("docker-machine", &["ls"])
            .await
            .context("failed to run docker-machine ls")
    }

    async fn status(&self, name: &ServerIdentity) -> Result<Output> {
        self.cmd_runner
            .run("docker-machine", &["status", name.as_str()])
            .await
            .context("failed to run docker-machine status")
    }

    async fn ip(&self, name: &ServerIdentity) -> Result<Output> {
        self.cmd_runner
            .run("docker-machine", &["ip", name.as_str()])
            .await
            .context("failed to run docker-machine ip")
    }

    async fn create(&self, name: &ServerIdentity, token: &str) -> Result<()> {
        let driver = format!("--driver={}", remote::DRIVER);
        let access_token = format!("--digitalocean-access-token={token}");
        let size = format!("--digitalocean-size={}", remote::SERVER_SIZE);
        let status = self
            .exec_runner
            .run_status(
                "docker-machine",
                &[
                    "create",
                    name.as_str(),
                    driver.as_str(),
                    access_token.as_str(),
                    size.as_str(),
                ],
            )
            .await
            .context("failed to run docker-machine create")?;
        ensure!(status.success(), "docker-machine create exited with {status}");
        Ok(())
    }

    async fn ssh_stream(&self, name: &ServerIdentity, command: &str) -> Result<()> {
        let status = self
            .exec_runner
            .run_status("docker-machine", &["ssh", name.as_str(), command])
            .await
            .context("failed to run docker-machine ssh")?;
        ensure!(status.success(), "remote command exited with {status}: {command}");
        Ok(())
    }

    async fn ssh_capture(&self, name: &ServerIdentity, command: &str) -> Result<Output> {
        self.exec_runner
            .run("docker-machine", &["ssh", name.as_str(), command])
            .await
            .context("failed to run docker-machine ssh")
    }

    async fn scp(&self, name: &ServerIdentity, local: &Path, remote: &str) -> Result<()> {
        let local = local.to_string_lossy();
        let dest = format!("{}:{remote}", name.as_str());
        let status = self
            .exec_runner
            .run_status("docker-machine", &["scp", local.as_ref(), dest.as_str()])
            .await
            .context("failed to run docker-machine scp")?;
        ensure!(status.success(), "docker-machine scp exited with {status}");
        Ok(())
    }
}
