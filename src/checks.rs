//! Validation gates — the closed set of precondition checks the workflows
//! evaluate before and between mutating steps.

use anyhow::{Result, anyhow};

use crate::command_runner::CommandRunner;
use crate::config::ServerIdentity;
use crate::machine::Machine;
use crate::remote::EXPECTED_CONTAINERS;

/// A named precondition check. Closed set: adding a check means adding a
/// variant and its arm in [`Check::evaluate`], nothing string-dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// The provisioning CLI is installed and runnable.
    ToolInstalled,
    /// The working directory is a valid git repository.
    RepoValid,
    /// No existing droplet already uses the derived identity.
    NameUnique,
    /// The droplet is not in a stopped state.
    HostRunning,
    /// The droplet already runs the expected container topology.
    ProjectSetup,
}

/// Structured outcome: a failure always carries its reason, so a reason can
/// never be computed while the check still reports success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Passed,
    Failed(String),
}

impl CheckOutcome {
    fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

impl Check {
    /// Evaluate the check.
    ///
    /// A [`CheckOutcome::Failed`] means the precondition does not hold; an
    /// `Err` means the check itself could not be carried out (for example
    /// the host listing query failed).
    ///
    /// # Errors
    ///
    /// Returns an error when a required query cannot be executed.
    pub async fn evaluate<M, R>(
        self,
        machine: &M,
        local: &R,
        server: &ServerIdentity,
    ) -> Result<CheckOutcome>
    where
        M: Machine,
        R: CommandRunner,
    {
        match self {
            Check::ToolInstalled => match machine.version().await {
                Ok(out) if out.status.success() => Ok(CheckOutcome::Passed),
                _ => Ok(CheckOutcome::failed(
                    "docker-machine is not installed. See https://docs.docker.com/machine/install-machine/",
                )),
            },
            Check::RepoValid => match local.run("git", &["status"]).await {
                Ok(out) if out.status.success() => Ok(CheckOutcome::Passed),
                _ => Ok(CheckOutcome::failed(
                    "must be run from the root of a valid git repository",
                )),
            },
            Check::NameUnique => {
                let out = machine.ls().await?;
                let listing = String::from_utf8_lossy(&out.stdout);
                if listing.contains(server.as_str()) {
                    Ok(CheckOutcome::failed(format!(
                        "a docker machine named \"{server}\" already exists"
                    )))
                } else {
                    Ok(CheckOutcome::Passed)
                }
            }
            Check::HostRunning => {
                let out = machine.status(server).await?;
                let status = String::from_utf8_lossy(&out.stdout);
                if status.contains("Stopped") {
                    Ok(CheckOutcome::failed(format!(
                        "the docker machine \"{server}\" is currently stopped; start it before deploying"
                    )))
                } else {
                    Ok(CheckOutcome::Passed)
                }
            }
            Check::ProjectSetup => {
                let out = machine.ssh_capture(server, "docker ps").await?;
                let listing = String::from_utf8_lossy(&out.stdout);
                if listing_shows_project(&listing) {
                    Ok(CheckOutcome::Passed)
                } else {
                    Ok(CheckOutcome::failed(format!(
                        "the containers on \"{server}\" do not appear to be set up or are not running; \
                         run setup first"
                    )))
                }
            }
        }
    }

    /// Evaluate the check and turn a failure into an error, for use as a
    /// hard gate inside a pipeline step.
    ///
    /// # Errors
    ///
    /// Returns an error when the check fails or cannot be carried out.
    pub async fn ensure<M, R>(
        self,
        machine: &M,
        local: &R,
        server: &ServerIdentity,
    ) -> Result<()>
    where
        M: Machine,
        R: CommandRunner,
    {
        match self.evaluate(machine, local, server).await? {
            CheckOutcome::Passed => Ok(()),
            CheckOutcome::Failed(reason) => Err(anyhow!(reason)),
        }
    }
}

/// A set-up host shows the `docker ps` header line plus exactly the fixed
/// app+db topology. The constant describes this tool's own conventions and
/// makes no claim about other container layouts.
#[must_use]
pub fn listing_shows_project(listing: &str) -> bool {
    let rows = listing.lines().filter(|line| !line.trim().is_empty()).count();
    rows == EXPECTED_CONTAINERS + 1
}
