//! Markdown rendering of fetched messages

use crate::models::NormalizedMessage;

/// Render one message as a markdown block
pub fn format_message(message: &NormalizedMessage) -> String {
    format!(
        "# {subject}\n\n**Thread:** {thread}\n**From:** {from}\n**To:** {to}\n\n---\n\n{body}\n",
        subject = message.subject,
        thread = message.thread_id,
        from = message.from,
        to = message.to,
        body = message.digest_body(),
    )
}

/// Render all messages in fetch order, one blank line between blocks
///
/// No messages renders as an empty string.
pub fn format_messages(messages: &[NormalizedMessage]) -> String {
    messages
        .iter()
        .map(format_message)
        .collect::<Vec<_>>()
        .join("\n")
}
