//! Language-model summary of the formatted messages
//!
//! The prompt asks for one bullet per message in the shape
//! `* <thread id> **Name.** summary`, which [`super::links`] later turns into
//! links. The reply itself is treated as opaque text.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Chat model used when none is configured
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// OpenAI API root used when none is configured
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const PROMPT_TEMPLATE: &str = "\
Below are the messages sent from my email account during the last few days. \
I want a short summary of that activity. Other people also send mail from this inbox.

Write one bullet per message. Start each bullet with the message's thread ID, \
then the name of the person the message was sent to in bold, then a \
one-sentence summary of what was said.

Leave out:

* unsubscribe requests
* forwarded verification code emails
* messages sent to todoist

If no messages remain after leaving those out, reply with nothing at all.

Example bullets:

* 190e654d26e12dcd **John Doe.** Asked when he would be available to meet.
* 190e6a1b3f0c2e7a **Jane Doe.** Reminded her of a previous unanswered email.

Below are the messages:

";

/// Embed the formatted messages in the instruction prompt
///
/// An empty document still produces a full prompt.
pub fn build_prompt(document: &str) -> String {
    format!("{PROMPT_TEMPLATE}{document}\n")
}

/// A single-turn text completion service
pub trait Completion {
    /// Send `prompt` as one user message and return the reply text
    fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// OpenAI-compatible chat completions client
pub struct OpenAiClient {
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl Completion for OpenAiClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut response = ureq::post(&format!("{}/chat/completions", self.base_url))
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(&request)
            .context("Failed to send chat completion request")?;

        let chat: ChatResponse = response
            .body_mut()
            .read_json()
            .context("Failed to parse chat completion response")?;

        let choice = chat
            .choices
            .into_iter()
            .next()
            .context("Chat completion returned no choices")?;

        Ok(choice.message.content.unwrap_or_default())
    }
}
