//! Gmail API HTTP client
//!
//! Provides methods for listing, fetching and sending messages through the
//! Gmail API. Uses synchronous HTTP (ureq) to be executor-agnostic.

use anyhow::{Context, Result};
use serde_json::json;

use super::api::{GmailMessage, ListMessagesResponse, ProfileResponse, SendMessageResponse};
use super::{GmailAuth, MailApi};
use crate::models::MessageId;

/// Gmail API client
pub struct GmailClient {
    auth: GmailAuth,
    base_url: String,
}

impl GmailClient {
    /// Gmail API base URL
    const BASE_URL: &'static str = "https://gmail.googleapis.com/gmail/v1";

    /// Create a new Gmail client
    pub fn new(auth: GmailAuth) -> Self {
        Self {
            auth,
            base_url: Self::BASE_URL.to_string(),
        }
    }

    /// Talk to a different API root (tests point this at a local server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Trigger authentication flow
    pub fn authenticate(&self) -> Result<()> {
        self.auth.get_access_token()?;
        Ok(())
    }

    fn bearer(&self) -> Result<String> {
        Ok(format!("Bearer {}", self.auth.get_access_token()?))
    }
}

impl MailApi for GmailClient {
    /// List message IDs carrying `label` and matching the search `query`
    ///
    /// # Arguments
    /// * `label` - Gmail label ID, e.g. `SENT`
    /// * `query` - Gmail search syntax, e.g. `after:1718000000`
    /// * `page_token` - Optional page token for pagination
    fn list_messages(
        &self,
        label: &str,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<ListMessagesResponse> {
        let authorization = self.bearer()?;

        let mut url = format!(
            "{}/users/me/messages?labelIds={}&q={}",
            self.base_url,
            urlencoding::encode(label),
            urlencoding::encode(query),
        );

        if let Some(token) = page_token {
            url.push_str(&format!("&pageToken={}", urlencoding::encode(token)));
        }

        let mut response = ureq::get(&url)
            .header("Authorization", &authorization)
            .call()
            .context("Failed to send list messages request")?;

        let list: ListMessagesResponse = response
            .body_mut()
            .read_json()
            .context("Failed to parse list messages response")?;

        Ok(list)
    }

    /// Get full message details by ID
    fn get_message(&self, id: &MessageId) -> Result<GmailMessage> {
        let authorization = self.bearer()?;

        let url = format!(
            "{}/users/me/messages/{}?format=full",
            self.base_url,
            urlencoding::encode(id.as_str())
        );

        let mut response = ureq::get(&url)
            .header("Authorization", &authorization)
            .call()
            .with_context(|| format!("Failed to send get message request for {}", id))?;

        let message: GmailMessage = response
            .body_mut()
            .read_json()
            .context("Failed to parse message response")?;

        Ok(message)
    }

    fn get_profile(&self) -> Result<ProfileResponse> {
        let authorization = self.bearer()?;

        let url = format!("{}/users/me/profile", self.base_url);

        let mut response = ureq::get(&url)
            .header("Authorization", &authorization)
            .call()
            .context("Failed to send get profile request")?;

        response
            .body_mut()
            .read_json()
            .context("Failed to parse profile response")
    }

    fn send_message(&self, raw: &str) -> Result<SendMessageResponse> {
        let authorization = self.bearer()?;

        let url = format!("{}/users/me/messages/send", self.base_url);

        let mut response = ureq::post(&url)
            .header("Authorization", &authorization)
            .send_json(json!({ "raw": raw }))
            .context("Failed to send message")?;

        response
            .body_mut()
            .read_json()
            .context("Failed to parse send message response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GmailCredentials;
    use crate::gmail::{MemoryTokenStore, StoredToken};
    use mockito::Matcher;

    fn client(server: &mockito::Server) -> GmailClient {
        let store = MemoryTokenStore::with_token(StoredToken {
            access_token: "test-token".to_string(),
            refresh_token: None,
            expires_at: Some(chrono::Utc::now().timestamp() + 3600),
        });
        let creds = GmailCredentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        };
        GmailClient::new(GmailAuth::new(creds, store)).with_base_url(server.url())
    }

    #[test]
    fn test_list_messages_sends_label_and_query() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/users/me/messages")
            .match_header("authorization", "Bearer test-token")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("labelIds".into(), "SENT".into()),
                Matcher::UrlEncoded("q".into(), "after:1 before:2".into()),
                Matcher::UrlEncoded("pageToken".into(), "p2".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"messages":[{"id":"m1","threadId":"t1"}],"resultSizeEstimate":1}"#)
            .create();

        let list = client(&server)
            .list_messages("SENT", "after:1 before:2", Some("p2"))
            .unwrap();
        mock.assert();

        let messages = list.messages.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, "m1");
        assert!(list.next_page_token.is_none());
    }

    #[test]
    fn test_get_message_requests_full_format() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/users/me/messages/m1")
            .match_query(Matcher::UrlEncoded("format".into(), "full".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":"m1","threadId":"t1","payload":{"mimeType":"text/plain","headers":[{"name":"Subject","value":"Hi"}],"body":{"size":2,"data":"aGk"}}}"#,
            )
            .create();

        let message = client(&server).get_message(&MessageId::new("m1")).unwrap();
        mock.assert();
        assert_eq!(message.thread_id, "t1");
        assert!(message.payload.is_some());
    }

    #[test]
    fn test_get_profile() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/users/me/profile")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"emailAddress":"me@x.com","messagesTotal":10,"threadsTotal":5,"historyId":"99"}"#)
            .create();

        let profile = client(&server).get_profile().unwrap();
        assert_eq!(profile.email_address, "me@x.com");
    }

    #[test]
    fn test_send_message_posts_raw() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/users/me/messages/send")
            .match_header("authorization", "Bearer test-token")
            .match_body(Matcher::Json(json!({ "raw": "UkFX" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"sent-1","threadId":"t9","labelIds":["SENT"]}"#)
            .expect(1)
            .create();

        let sent = client(&server).send_message("UkFX").unwrap();
        mock.assert();
        assert_eq!(sent.id, "sent-1");
    }

    #[test]
    fn test_http_errors_propagate() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/users/me/profile")
            .with_status(401)
            .create();

        assert!(client(&server).get_profile().is_err());
    }
}
