//! Gmail API response normalization
//!
//! Converts a full Gmail message into a [`NormalizedMessage`].

use anyhow::{Context, Result};
use log::warn;

use super::api::{GmailMessage, MessagePayload};
use crate::digest::extract::extract_bodies;
use crate::error::DigestError;
use crate::models::{MessageId, NormalizedMessage, ThreadId};

/// Normalize a Gmail API message for the digest
///
/// Fails with [`DigestError::MissingHeader`] when `From`, `To` or `Subject`
/// is absent and with [`DigestError::MissingBody`] when neither a plain-text
/// nor an HTML body can be found. There are no placeholder values.
pub fn normalize_message(gmail_msg: GmailMessage) -> Result<NormalizedMessage> {
    let id = MessageId::new(&gmail_msg.id);
    let thread_id = ThreadId::new(&gmail_msg.thread_id);

    let payload = gmail_msg
        .payload
        .as_ref()
        .with_context(|| format!("Message {} has no payload", id))?;

    let from = required_header(payload, &id, "From")?;
    let to = required_header(payload, &id, "To")?;
    let subject = required_header(payload, &id, "Subject")?;

    let bodies = extract_bodies(payload);
    let plain_text = bodies
        .plain_or_html()
        .map(str::to_string)
        .ok_or_else(|| DigestError::MissingBody {
            message_id: id.clone(),
        })?;

    Ok(NormalizedMessage::builder(id, thread_id)
        .from(from)
        .to(to)
        .subject(subject)
        .plain_text(plain_text)
        .html_text(bodies.html_text)
        .build())
}

fn required_header(
    payload: &MessagePayload,
    id: &MessageId,
    name: &'static str,
) -> Result<String, DigestError> {
    extract_header(payload, name).ok_or_else(|| {
        warn!("Header {} not found on message {}", name, id);
        DigestError::MissingHeader {
            message_id: id.clone(),
            header: name,
        }
    })
}

/// Extract a header value by name
pub fn extract_header(payload: &MessagePayload, name: &str) -> Option<String> {
    payload.headers.as_ref()?.iter().find_map(|h| {
        if h.name.eq_ignore_ascii_case(name) {
            Some(h.value.clone())
        } else {
            None
        }
    })
}
