//! oceanup - provision a DigitalOcean droplet and deploy a containerized web app

use clap::Parser;

use oceanup::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
