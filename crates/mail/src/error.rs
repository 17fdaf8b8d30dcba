//! Typed failures callers are expected to match on.
//!
//! Everything else travels as `anyhow::Error` with context attached.

use crate::models::MessageId;

#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    /// A fetched message lacks a header the digest needs
    #[error("message {message_id} has no {header} header")]
    MissingHeader {
        message_id: MessageId,
        header: &'static str,
    },

    /// A fetched message has neither a text/plain nor a text/html body
    #[error("message {message_id} has no text body")]
    MissingBody { message_id: MessageId },

    #[error("invalid cron schedule {expression:?}: {reason}")]
    InvalidSchedule { expression: String, reason: String },

    #[error("invalid value for {key}: {reason}")]
    InvalidConfig { key: &'static str, reason: String },

    /// No usable token and the browser sign-in is disabled
    #[error("Gmail authorization required: run `gmail-digest` once in a terminal to sign in")]
    AuthorizationRequired,
}

impl DigestError {
    /// Whether only the one message is unusable and the run can go on
    pub fn is_per_message(&self) -> bool {
        matches!(self, Self::MissingHeader { .. } | Self::MissingBody { .. })
    }
}
