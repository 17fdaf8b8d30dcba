//! Gmail API integration
//!
//! This module provides:
//! - OAuth2 authentication flow with pluggable token storage
//! - Gmail API client for listing, fetching and sending messages
//! - Response normalization to domain models

mod auth;
mod client;
mod normalize;
mod token_store;

pub use auth::GmailAuth;
pub use client::GmailClient;
pub use normalize::{extract_header, normalize_message};
pub use token_store::{FileTokenStore, MemoryTokenStore, StoredToken, TokenStore};

use anyhow::Result;

use crate::models::MessageId;
use api::{GmailMessage, ListMessagesResponse, ProfileResponse, SendMessageResponse};

/// Label Gmail applies to everything the account has sent
pub const SENT_LABEL: &str = "SENT";

/// The subset of the Gmail API the digest pipeline consumes
///
/// `GmailClient` talks to Google; tests substitute an in-memory fake.
pub trait MailApi {
    /// List one page of message references carrying `label` and matching `query`
    fn list_messages(
        &self,
        label: &str,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<ListMessagesResponse>;

    /// Fetch a message with its full MIME tree
    fn get_message(&self, id: &MessageId) -> Result<GmailMessage>;

    /// Profile of the authenticated account
    fn get_profile(&self) -> Result<ProfileResponse>;

    /// Send a URL-safe base64 encoded RFC 5322 message
    fn send_message(&self, raw: &str) -> Result<SendMessageResponse>;
}

/// Gmail API response types
pub mod api {
    use serde::Deserialize;

    /// Response from listing messages
    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ListMessagesResponse {
        pub messages: Option<Vec<MessageRef>>,
        pub next_page_token: Option<String>,
    }

    /// Reference to a message (just ID and thread ID)
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MessageRef {
        pub id: String,
        pub thread_id: String,
    }

    /// Full message from Gmail API
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GmailMessage {
        pub id: String,
        pub thread_id: String,
        pub payload: Option<MessagePayload>,
    }

    /// Message payload containing headers and body
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MessagePayload {
        pub headers: Option<Vec<Header>>,
        pub body: Option<MessageBody>,
        pub parts: Option<Vec<MessagePart>>,
        pub mime_type: Option<String>,
    }

    /// Email header (name-value pair)
    #[derive(Debug, Clone, Deserialize)]
    pub struct Header {
        pub name: String,
        pub value: String,
    }

    /// Message body (may be base64 encoded)
    #[derive(Debug, Clone, Deserialize)]
    pub struct MessageBody {
        pub data: Option<String>,
    }

    /// Message part (for multipart messages)
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MessagePart {
        pub mime_type: Option<String>,
        pub body: Option<MessageBody>,
        pub parts: Option<Vec<MessagePart>>,
    }

    /// Response from `users/me/profile`
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProfileResponse {
        pub email_address: String,
    }

    /// Response from `users/me/messages/send`
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SendMessageResponse {
        pub id: String,
    }
}
