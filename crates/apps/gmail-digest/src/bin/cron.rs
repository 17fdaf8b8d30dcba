//! gmail-digest-cron - Run the digest on a cron schedule
//!
//! Blocks forever, running once per fire time of `SCHEDULE`. Exits non-zero
//! when a run fails. Never opens a browser: sign in with `gmail-digest` first
//! so a token is cached.

use anyhow::Result;
use clap::Parser;
use gmail_digest::{Services, bootstrap, report};
use log::info;
use mail::schedule::DEFAULT_CONNECTIVITY_PROBE;
use mail::{CronSchedule, Heartbeat, Scheduler};

#[derive(Parser)]
#[command(name = "gmail-digest-cron", version, about = "Run the sent-mail digest on a schedule")]
struct Cli {
    /// Build each digest without sending it
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = bootstrap()?;

    let schedule = CronSchedule::parse(&config.schedule)?;
    let services = Services::connect(&config, false)?;

    if config.heartbeat_url.is_some() {
        info!("Heartbeat enabled");
    }
    let scheduler = Scheduler::new(schedule)
        .with_heartbeat(config.heartbeat_url.clone().map(Heartbeat::new))
        .with_connectivity_probe(DEFAULT_CONNECTIVITY_PROBE);

    scheduler.run_forever(|| {
        let outcome = services.run(&config, cli.dry_run)?;
        report(&outcome);
        Ok(outcome)
    })
}
