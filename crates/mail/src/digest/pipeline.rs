//! One digest run, from listing sent mail to sending the summary

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use log::info;

use super::fetch::{fetch_messages, list_recent_sent_message_ids};
use super::format::format_messages;
use super::links::{LinkStyle, rewrite_links};
use super::send::{DigestEmail, send_digest};
use super::summarize::{Completion, build_prompt};
use super::truncate::truncate_long_thread;
use crate::config::DigestConfig;
use crate::gmail::MailApi;

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The digest was delivered
    Sent { message_id: String },
    /// The digest was built but not sent
    DryRun(DigestEmail),
    /// The summary came back empty, so there was nothing to send
    NothingToSend,
}

/// Wires the mail API, the completion service and the configuration together
pub struct DigestPipeline<'a> {
    mail: &'a dyn MailApi,
    completion: &'a dyn Completion,
    config: &'a DigestConfig,
}

impl<'a> DigestPipeline<'a> {
    pub fn new(mail: &'a dyn MailApi, completion: &'a dyn Completion, config: &'a DigestConfig) -> Self {
        Self {
            mail,
            completion,
            config,
        }
    }

    /// Run the digest for the current time
    pub fn run(&self, dry_run: bool) -> Result<RunOutcome> {
        self.run_at(Local::now(), dry_run)
    }

    /// Run the digest as if it were `now`
    ///
    /// The lookback window ends at `now`; the subject carries `now`'s local date.
    pub fn run_at(&self, now: DateTime<Local>, dry_run: bool) -> Result<RunOutcome> {
        let account = self.mail.get_profile()?.email_address;
        info!("Building digest for {}", account);

        let ids = list_recent_sent_message_ids(self.mail, self.config.lookback(), now.with_timezone(&Utc))?;
        info!(
            "Found {} sent messages in the last {} day(s)",
            ids.len(),
            self.config.lookback_days
        );

        let messages: Vec<_> = fetch_messages(self.mail, &ids)?
            .into_iter()
            .map(truncate_long_thread)
            .collect();

        let document = format_messages(&messages);
        let summary = self.completion.complete(&build_prompt(&document))?;

        if summary.trim().is_empty() {
            info!("Summary is empty, no digest to send");
            return Ok(RunOutcome::NothingToSend);
        }

        let style = if self.config.superhuman_links {
            LinkStyle::Superhuman {
                account: account.clone(),
            }
        } else {
            LinkStyle::Gmail
        };
        let linked = rewrite_links(&summary, &style);

        let email = DigestEmail::new(account, &self.config.destination, now.date_naive(), &linked);

        Ok(match send_digest(self.mail, &email, dry_run)? {
            Some(message_id) => RunOutcome::Sent { message_id },
            None => RunOutcome::DryRun(email),
        })
    }
}
