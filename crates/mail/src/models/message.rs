//! Message model for one sent Gmail message, flattened for the digest

use super::ThreadId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a message (Gmail message ID)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A sent message reduced to what the digest needs
///
/// `plain_text` is always present: messages without a text/plain part carry
/// their decoded HTML here instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMessage {
    /// Gmail message ID
    pub id: MessageId,
    /// ID of the thread this message belongs to
    pub thread_id: ThreadId,
    /// Raw `From` header
    pub from: String,
    /// Raw `To` header
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain text body (or the HTML body when no plain part exists)
    pub plain_text: String,
    /// HTML body, if the message had one
    pub html_text: Option<String>,
    /// Plain text with older quoted history removed
    pub truncated_plain_text: Option<String>,
}

impl NormalizedMessage {
    /// Create a new message builder
    pub fn builder(id: MessageId, thread_id: ThreadId) -> NormalizedMessageBuilder {
        NormalizedMessageBuilder::new(id, thread_id)
    }

    /// Attach the truncated body. Consumes the message so the result is set once.
    pub fn with_truncated_text(mut self, truncated: String) -> Self {
        self.truncated_plain_text = Some(truncated);
        self
    }

    /// Body to render in the digest: truncated text if available, else the full text
    pub fn digest_body(&self) -> &str {
        self.truncated_plain_text
            .as_deref()
            .unwrap_or(&self.plain_text)
    }
}

/// Builder for creating NormalizedMessage instances
pub struct NormalizedMessageBuilder {
    id: MessageId,
    thread_id: ThreadId,
    from: String,
    to: String,
    subject: String,
    plain_text: String,
    html_text: Option<String>,
}

impl NormalizedMessageBuilder {
    fn new(id: MessageId, thread_id: ThreadId) -> Self {
        Self {
            id,
            thread_id,
            from: String::new(),
            to: String::new(),
            subject: String::new(),
            plain_text: String::new(),
            html_text: None,
        }
    }

    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = to.into();
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn plain_text(mut self, plain_text: impl Into<String>) -> Self {
        self.plain_text = plain_text.into();
        self
    }

    pub fn html_text(mut self, html_text: Option<String>) -> Self {
        self.html_text = html_text;
        self
    }

    pub fn build(self) -> NormalizedMessage {
        NormalizedMessage {
            id: self.id,
            thread_id: self.thread_id,
            from: self.from,
            to: self.to,
            subject: self.subject,
            plain_text: self.plain_text,
            html_text: self.html_text,
            truncated_plain_text: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NormalizedMessage {
        NormalizedMessage::builder(MessageId::new("m1"), ThreadId::new("t1"))
            .from("me@example.com")
            .to("John Doe <john@example.com>")
            .subject("Lunch")
            .plain_text("Are you free?\n>> older")
            .build()
    }

    #[test]
    fn test_builder_leaves_truncation_unset() {
        let msg = sample();
        assert_eq!(msg.truncated_plain_text, None);
        assert_eq!(msg.digest_body(), "Are you free?\n>> older");
    }

    #[test]
    fn test_digest_body_prefers_truncated_text() {
        let msg = sample().with_truncated_text("Are you free?".to_string());
        assert_eq!(msg.digest_body(), "Are you free?");
        assert_eq!(msg.plain_text, "Are you free?\n>> older");
    }

    #[test]
    fn test_ids_display_as_raw_strings() {
        assert_eq!(MessageId::new("190e654d26e12dcd").to_string(), "190e654d26e12dcd");
        assert_eq!(ThreadId::from("abc").to_string(), "abc");
    }
}
