//! Mail crate - Business logic for the Gmail sent-mail digest
//!
//! This crate provides:
//! - Gmail API client and OAuth authentication with pluggable token storage
//! - Normalization of sent messages (header lookup, body extraction)
//! - The digest pipeline: truncate, format, summarize, link, send
//! - Cron scheduling with a best-effort heartbeat
//!
//! Every run is synchronous and sequential; there is no async runtime.

pub mod config;
pub mod digest;
pub mod error;
pub mod gmail;
pub mod heartbeat;
pub mod models;
pub mod schedule;

pub use config::{DigestConfig, GmailCredentials};
pub use digest::links::LinkStyle;
pub use digest::send::DigestEmail;
pub use digest::summarize::{Completion, OpenAiClient};
pub use digest::{DigestPipeline, RunOutcome};
pub use error::DigestError;
pub use gmail::{FileTokenStore, GmailAuth, GmailClient, MailApi, MemoryTokenStore, TokenStore};
pub use heartbeat::Heartbeat;
pub use models::{MessageId, NormalizedMessage, ThreadId};
pub use schedule::{CronSchedule, Scheduler};
