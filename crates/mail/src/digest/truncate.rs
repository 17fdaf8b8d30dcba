//! Quoted-history removal for plain-text replies
//!
//! In plain text, a reply carries the thread it answers as quoted lines:
//!
//! ```text
//! > On Thu, Jun 13, 2024 at 3:06 PM, Scott King wrote:
//! >
//! >> Hi Mike,
//! >>
//! >> Thanks for getting back to me.
//! ```
//!
//! Lines starting with two or more `>` followed by whitespace belong to older
//! messages and are dropped. The newest reply and the one it quotes directly
//! are kept.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::NormalizedMessage;

static NESTED_QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^>{2,}\s").expect("nested quote pattern is valid"));

/// Drop every line quoting two or more levels deep, keeping line order
pub fn truncate_quoted_history(text: &str) -> String {
    text.split('\n')
        .filter(|line| !NESTED_QUOTE.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Attach the truncated body to a message
pub fn truncate_long_thread(message: NormalizedMessage) -> NormalizedMessage {
    let truncated = truncate_quoted_history(&message.plain_text);
    message.with_truncated_text(truncated)
}
