//! Best-effort liveness notifications
//!
//! Nothing in here ever fails a digest run: every network error is logged and
//! dropped.

use log::{debug, info, warn};
use std::time::Duration;

/// A URL pinged after each successful scheduled run (healthchecks.io style)
#[derive(Debug, Clone)]
pub struct Heartbeat {
    url: String,
}

impl Heartbeat {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// GET the heartbeat URL, ignoring the response and any failure
    pub fn ping(&self) {
        match ureq::get(&self.url).call() {
            Ok(response) => debug!("Heartbeat ping returned {}", response.status()),
            Err(e) => debug!("Heartbeat ping to {} failed: {}", self.url, e),
        }
    }
}

/// Whether `probe_url` answers at all; any HTTP status counts as reachable
fn is_reachable(probe_url: &str) -> bool {
    match ureq::get(probe_url).call() {
        Ok(_) | Err(ureq::Error::StatusCode(_)) => true,
        Err(e) => {
            debug!("Connectivity probe {} failed: {}", probe_url, e);
            false
        }
    }
}

/// Block until `probe_url` is reachable, trying up to `attempts` times
///
/// Returns whether the network came up. Callers proceed either way; a run
/// without network then fails on its first real request.
pub fn wait_for_connectivity(probe_url: &str, attempts: u32, delay: Duration) -> bool {
    for attempt in 1..=attempts {
        if is_reachable(probe_url) {
            if attempt > 1 {
                info!("Network reachable after {} attempts", attempt);
            }
            return true;
        }
        if attempt < attempts {
            std::thread::sleep(delay);
        }
    }
    warn!("Network still unreachable after {} attempts", attempts);
    false
}
