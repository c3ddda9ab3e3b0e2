//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use crate::output::OutputContext;

/// Provision a DigitalOcean droplet and deploy a containerized web app
#[derive(Parser)]
#[command(
    name = "oceanup",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Provision a new droplet and deploy the project onto it
    #[command(alias = "s")]
    Setup(commands::DeployFlags),

    /// Update and redeploy the project on an existing droplet
    #[command(alias = "d")]
    Deploy(commands::DeployFlags),

    /// Emit a machine-readable descriptor list for plugin discovery
    Available,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoked workflow fails; `main` turns this
    /// into a nonzero exit status.
    pub async fn run(self) -> Result<()> {
        let Cli { quiet, no_color, command } = self;
        let out = OutputContext::new(no_color, quiet);
        match command {
            Command::Setup(flags) => {
                let mut cx = commands::production_context(flags, out)?;
                commands::setup::run(&mut cx).await
            }
            Command::Deploy(flags) => {
                let mut cx = commands::production_context(flags, out)?;
                commands::deploy::run(&mut cx).await
            }
            Command::Available => commands::available::run(),
        }
    }
}
