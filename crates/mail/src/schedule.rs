//! Cron-driven scheduling of digest runs
//!
//! Runs happen on the calling thread one after another, so two runs never
//! overlap. A run that ends in any [`RunOutcome`] keeps the scheduler going;
//! a run that returns an error stops it and the error reaches the caller.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use log::info;
use std::str::FromStr;
use std::time::Duration;

use crate::digest::RunOutcome;
use crate::error::DigestError;
use crate::heartbeat::{Heartbeat, wait_for_connectivity};

/// A parsed cron expression
///
/// Accepts standard 5-field crontab lines (`0 6 * * *`, seconds implied as
/// `0`) as well as 6 and 7 field expressions with seconds and year.
#[derive(Debug, Clone)]
pub struct CronSchedule {
    expression: String,
    schedule: cron::Schedule,
}

impl CronSchedule {
    pub fn parse(expression: &str) -> Result<Self, DigestError> {
        let expression = expression.trim();
        let invalid = |reason: String| DigestError::InvalidSchedule {
            expression: expression.to_string(),
            reason,
        };

        let normalized = match expression.split_whitespace().count() {
            5 => format!("0 {expression}"),
            6 | 7 => expression.to_string(),
            n => return Err(invalid(format!("expected 5 to 7 fields, found {n}"))),
        };

        let schedule = cron::Schedule::from_str(&normalized).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            expression: expression.to_string(),
            schedule,
        })
    }

    /// The expression as written
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// First fire time strictly after `after`
    pub fn next_after<Tz: TimeZone>(&self, after: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.schedule.after(after).next()
    }
}

/// Default probe used to wait for the network before a run
pub const DEFAULT_CONNECTIVITY_PROBE: &str = "https://www.googleapis.com/";

/// Runs a job on a cron schedule with optional heartbeat and network wait
pub struct Scheduler {
    schedule: CronSchedule,
    heartbeat: Option<Heartbeat>,
    connectivity_probe: Option<String>,
    connectivity_attempts: u32,
    connectivity_delay: Duration,
}

impl Scheduler {
    pub fn new(schedule: CronSchedule) -> Self {
        Self {
            schedule,
            heartbeat: None,
            connectivity_probe: None,
            connectivity_attempts: 30,
            connectivity_delay: Duration::from_secs(10),
        }
    }

    pub fn with_heartbeat(mut self, heartbeat: Option<Heartbeat>) -> Self {
        self.heartbeat = heartbeat;
        self
    }

    /// Wait for `probe_url` to answer before each run
    pub fn with_connectivity_probe(mut self, probe_url: impl Into<String>) -> Self {
        self.connectivity_probe = Some(probe_url.into());
        self
    }

    /// Run the job once, then ping the heartbeat
    ///
    /// A failed job skips the heartbeat so the monitor notices.
    pub fn tick<F>(&self, job: &mut F) -> Result<RunOutcome>
    where
        F: FnMut() -> Result<RunOutcome>,
    {
        if let Some(probe) = &self.connectivity_probe {
            wait_for_connectivity(probe, self.connectivity_attempts, self.connectivity_delay);
        }

        let outcome = job()?;
        match &outcome {
            RunOutcome::Sent { message_id } => info!("Scheduled run sent digest {}", message_id),
            RunOutcome::DryRun(email) => info!("Scheduled dry run built {:?}", email.subject),
            RunOutcome::NothingToSend => info!("Scheduled run had nothing to send"),
        }

        if let Some(heartbeat) = &self.heartbeat {
            heartbeat.ping();
        }

        Ok(outcome)
    }

    /// Sleep until each fire time and run the job, until the job fails
    pub fn run_forever<F>(&self, mut job: F) -> Result<()>
    where
        F: FnMut() -> Result<RunOutcome>,
    {
        info!("Running on schedule: {}", self.schedule.expression());

        loop {
            let now = Local::now();
            let next = self
                .schedule
                .next_after(&now)
                .context("Cron schedule has no upcoming run")?;
            info!("Next digest run at {}", next.format("%Y-%m-%d %H:%M:%S %Z"));

            std::thread::sleep(until(next, Local::now()));
            self.tick(&mut job)?;
        }
    }
}

/// Time left until `next`, zero if it has passed
fn until(next: DateTime<Local>, now: DateTime<Local>) -> Duration {
    (next - now).to_std().unwrap_or(Duration::ZERO)
}
