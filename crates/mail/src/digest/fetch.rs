//! Retrieval of the messages sent during the lookback window

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};

use super::send::DIGEST_SUBJECT_PREFIX;
use crate::error::DigestError;
use crate::gmail::{MailApi, SENT_LABEL, normalize_message};
use crate::models::{MessageId, NormalizedMessage};

/// Gmail search for `[now - window, now]`, excluding earlier digests
pub fn sent_messages_query(window: Duration, now: DateTime<Utc>) -> String {
    let start = now - window;
    format!(
        "after:{} before:{} -subject:\"{}\"",
        start.timestamp(),
        now.timestamp(),
        DIGEST_SUBJECT_PREFIX
    )
}

/// IDs of sent messages in the window, in the provider's order
///
/// Follows pagination to the end. Any API error aborts the listing.
pub fn list_recent_sent_message_ids(
    mail: &dyn MailApi,
    window: Duration,
    now: DateTime<Utc>,
) -> Result<Vec<MessageId>> {
    let query = sent_messages_query(window, now);
    debug!("Listing sent messages with query {:?}", query);

    let mut ids = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let response = mail.list_messages(SENT_LABEL, &query, page_token.as_deref())?;

        if let Some(messages) = response.messages {
            ids.extend(messages.into_iter().map(|m| MessageId::new(m.id)));
        }

        match response.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    Ok(ids)
}

/// Fetch one message and normalize it
pub fn fetch_full_message(mail: &dyn MailApi, id: &MessageId) -> Result<NormalizedMessage> {
    normalize_message(mail.get_message(id)?)
}

/// Fetch every listed message in order, one at a time
///
/// Messages that are unusable on their own (missing header, no text body)
/// are skipped with a warning. Transport and API errors abort the run.
pub fn fetch_messages(mail: &dyn MailApi, ids: &[MessageId]) -> Result<Vec<NormalizedMessage>> {
    let mut messages = Vec::with_capacity(ids.len());

    for id in ids {
        match fetch_full_message(mail, id) {
            Ok(message) => messages.push(message),
            Err(e) if e.downcast_ref::<DigestError>().is_some_and(DigestError::is_per_message) => {
                warn!("Skipping message {}: {}", id, e);
            }
            Err(e) => return Err(e),
        }
    }

    info!("Fetched {} of {} sent messages", messages.len(), ids.len());
    Ok(messages)
}
