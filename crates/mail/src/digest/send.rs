//! Digest email construction and delivery through Gmail

use anyhow::{Context, Result};
use base64::prelude::*;
use chrono::NaiveDate;
use lettre::message::{Mailbox, MultiPart, SinglePart, header::ContentType};
use log::info;
use pulldown_cmark::{Options, Parser, html};

use crate::gmail::MailApi;

/// Subject prefix of every digest; also used to keep digests out of the next run
pub const DIGEST_SUBJECT_PREFIX: &str = "Email Digest for";

/// Render markdown to an HTML fragment
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// The outbound digest message
#[derive(Debug, Clone, PartialEq)]
pub struct DigestEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl DigestEmail {
    /// Build the digest for `date` from the final markdown summary
    pub fn new(from: impl Into<String>, to: impl Into<String>, date: NaiveDate, markdown: &str) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: digest_subject(date),
            html: markdown_to_html(markdown),
        }
    }

    /// RFC 5322 message: multipart/alternative with a single HTML part
    pub fn to_rfc5322(&self) -> Result<Vec<u8>> {
        let from: Mailbox = self
            .from
            .parse()
            .with_context(|| format!("Invalid from address: {}", self.from))?;
        let to: Mailbox = self
            .to
            .parse()
            .with_context(|| format!("Invalid destination address: {}", self.to))?;

        let message = lettre::Message::builder()
            .from(from)
            .to(to)
            .subject(self.subject.clone())
            .multipart(
                MultiPart::alternative().singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(self.html.clone()),
                ),
            )
            .context("Failed to build digest email")?;

        Ok(message.formatted())
    }

    /// URL-safe base64 encoding of the RFC 5322 message, as Gmail's `raw` field expects
    pub fn to_raw(&self) -> Result<String> {
        Ok(BASE64_URL_SAFE_NO_PAD.encode(self.to_rfc5322()?))
    }
}

/// `Email Digest for YYYY-MM-DD`
pub fn digest_subject(date: NaiveDate) -> String {
    format!("{} {}", DIGEST_SUBJECT_PREFIX, date.format("%Y-%m-%d"))
}

/// Encode and, unless `dry_run`, send the digest
///
/// Returns the Gmail ID of the sent message, `None` on a dry run. The raw
/// message is built either way so a dry run catches encoding problems.
pub fn send_digest(mail: &dyn MailApi, email: &DigestEmail, dry_run: bool) -> Result<Option<String>> {
    let raw = email.to_raw()?;

    if dry_run {
        info!("Dry run: digest to {} not sent ({} bytes)", email.to, raw.len());
        return Ok(None);
    }

    let sent = mail.send_message(&raw)?;
    info!("Digest email sent to {} (id {})", email.to, sent.id);
    Ok(Some(sent.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> DigestEmail {
        DigestEmail::new(
            "me@example.com",
            "digest@example.com",
            NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
            "* [Ann.](https://mail.google.com/mail/u/0/#inbox/abc) Said **hi**.",
        )
    }

    #[test]
    fn test_subject_uses_iso_date() {
        assert_eq!(email().subject, "Email Digest for 2024-07-15");
    }

    #[test]
    fn test_markdown_to_html() {
        let html = markdown_to_html("* [Ann.](https://x/abc) Said **hi**.");
        assert_eq!(
            html,
            "<ul>\n<li><a href=\"https://x/abc\">Ann.</a> Said <strong>hi</strong>.</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_rfc5322_message_has_headers_and_html_part() {
        let raw = String::from_utf8(email().to_rfc5322().unwrap()).unwrap();
        assert!(raw.contains("From: me@example.com"));
        assert!(raw.contains("To: digest@example.com"));
        assert!(raw.contains("Subject: Email Digest for 2024-07-15"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("Content-Type: text/html; charset=utf-8"));
    }

    #[test]
    fn test_raw_is_url_safe_base64_of_message() {
        let email = email();
        let raw = email.to_raw().unwrap();
        assert!(!raw.contains('+') && !raw.contains('/') && !raw.contains('='));
        let decoded = BASE64_URL_SAFE_NO_PAD.decode(raw).unwrap();
        assert!(String::from_utf8(decoded).unwrap().contains("Subject: Email Digest for 2024-07-15"));
    }

    #[test]
    fn test_invalid_destination_fails() {
        let mut email = email();
        email.to = "not an address".to_string();
        assert!(email.to_raw().is_err());
    }
}
