//! `oceanup available` — machine-readable descriptor list so host tooling
//! can discover this plugin's commands.

use anyhow::{Context, Result};
use serde::Serialize;

/// One discoverable command.
#[derive(Debug, Serialize)]
pub struct CommandDescriptor {
    pub name: &'static str,
    /// Command the entry attaches to in the host tool.
    pub command: &'static str,
    pub description: &'static str,
    pub aliases: Vec<&'static str>,
}

/// The discoverable surface of this plugin.
#[must_use]
pub fn descriptors() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor {
            name: "setup",
            command: "root",
            description: "Provision a new droplet and deploy the project onto it",
            aliases: vec!["s"],
        },
        CommandDescriptor {
            name: "deploy",
            command: "root",
            description: "Update and redeploy the project on an existing droplet",
            aliases: vec!["d"],
        },
    ]
}

/// Print the descriptor list as JSON on stdout.
///
/// # Errors
///
/// Returns an error when serialization or the write fails.
pub fn run() -> Result<()> {
    let stdout = std::io::stdout();
    serde_json::to_writer(stdout.lock(), &descriptors()).context("writing descriptor list")?;
    println!();
    Ok(())
}
