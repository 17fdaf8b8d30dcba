//! gmail-digest - Summarize recently sent Gmail and email the summary
//!
//! Runs the digest once and exits.

use anyhow::Result;
use clap::Parser;
use gmail_digest::{Services, bootstrap, report};

#[derive(Parser)]
#[command(name = "gmail-digest", version, about = "Email yourself a summary of your recently sent mail")]
struct Cli {
    /// Build the digest and print it instead of sending
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = bootstrap()?;

    let services = Services::connect(&config, true)?;
    let outcome = services.run(&config, cli.dry_run)?;
    report(&outcome);

    Ok(())
}
