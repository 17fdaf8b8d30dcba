//! Body extraction from a Gmail MIME tree
//!
//! Only two levels are inspected: the payload's direct parts and, when those
//! hold no text part at all, the parts of the first `multipart/alternative`
//! among them. Deeper nesting is ignored and the first match wins at each
//! level.

use base64::prelude::*;
use log::warn;

use crate::gmail::api::{MessageBody, MessagePart, MessagePayload};

const TEXT_PLAIN: &str = "text/plain";
const TEXT_HTML: &str = "text/html";
const MULTIPART_ALTERNATIVE: &str = "multipart/alternative";

/// Decoded text bodies found in a message
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExtractedBodies {
    pub plain_text: Option<String>,
    pub html_text: Option<String>,
}

impl ExtractedBodies {
    /// Plain text, falling back to the raw HTML when no plain part exists
    pub fn plain_or_html(&self) -> Option<&str> {
        self.plain_text.as_deref().or(self.html_text.as_deref())
    }
}

/// Extract the plain-text and HTML bodies of a message payload
///
/// A payload without parts is a single-part message and is inspected as
/// its own only part.
pub fn extract_bodies(payload: &MessagePayload) -> ExtractedBodies {
    match payload.parts.as_deref() {
        Some(parts) if !parts.is_empty() => extract_from_parts(parts),
        _ => {
            let decoded = || payload.body.as_ref().and_then(body_text);
            let mime_type = payload.mime_type.as_deref();
            ExtractedBodies {
                plain_text: mime_matches(mime_type, TEXT_PLAIN).then(decoded).flatten(),
                html_text: mime_matches(mime_type, TEXT_HTML).then(decoded).flatten(),
            }
        }
    }
}

fn extract_from_parts(parts: &[MessagePart]) -> ExtractedBodies {
    let mut plain_part = find_part(parts, TEXT_PLAIN);
    let mut html_part = find_part(parts, TEXT_HTML);

    // Probably wrapped in a multipart/alternative container
    if plain_part.is_none()
        && html_part.is_none()
        && let Some(nested) = find_part(parts, MULTIPART_ALTERNATIVE).and_then(|p| p.parts.as_deref())
    {
        plain_part = find_part(nested, TEXT_PLAIN);
        html_part = find_part(nested, TEXT_HTML);
    }

    ExtractedBodies {
        plain_text: plain_part.and_then(part_text),
        html_text: html_part.and_then(part_text),
    }
}

fn find_part<'a>(parts: &'a [MessagePart], mime_type: &str) -> Option<&'a MessagePart> {
    parts
        .iter()
        .find(|part| mime_matches(part.mime_type.as_deref(), mime_type))
}

/// Compare a MIME type ignoring case and parameters such as `charset`
fn mime_matches(actual: Option<&str>, expected: &str) -> bool {
    actual.is_some_and(|m| {
        m.split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .eq_ignore_ascii_case(expected)
    })
}

fn part_text(part: &MessagePart) -> Option<String> {
    part.body.as_ref().and_then(body_text)
}

fn body_text(body: &MessageBody) -> Option<String> {
    let data = body.data.as_deref()?;
    let text = decode_base64_body(data);
    if text.is_none() {
        warn!("Could not decode message body ({} bytes of base64)", data.len());
    }
    text
}

/// Decode base64-encoded body data
///
/// Gmail uses URL-safe base64 but padding can vary, so we try multiple decoders.
pub fn decode_base64_body(data: &str) -> Option<String> {
    let decoders: &[&base64::engine::GeneralPurpose] = &[
        &BASE64_URL_SAFE_NO_PAD,
        &BASE64_URL_SAFE,
        &BASE64_STANDARD,
        &BASE64_STANDARD_NO_PAD,
    ];

    decoders
        .iter()
        .find_map(|decoder| decoder.decode(data).ok())
        .and_then(|decoded| String::from_utf8(decoded).ok())
}
