//! Turn `* <id> **Name.**` bullets into links back to the thread
//!
//! The summary is free-form model output, so this is a line filter rather
//! than a parser: lines that do not look like an identified bullet pass
//! through untouched.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static ID_BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*[*-]\s+)([A-Za-z0-9]+)\s+\*\*(.+?)\*\*").expect("bullet pattern is valid")
});

/// Which mail client the links open
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStyle {
    /// Gmail web UI
    Gmail,
    /// Superhuman, which needs the account address in the URL
    Superhuman { account: String },
}

impl LinkStyle {
    /// URL of the thread with the given identifier
    pub fn thread_url(&self, id: &str) -> String {
        match self {
            LinkStyle::Gmail => format!("https://mail.google.com/mail/u/0/#inbox/{id}"),
            LinkStyle::Superhuman { account } => {
                format!("https://mail.superhuman.com/{account}/thread/{id}#app")
            }
        }
    }
}

/// Rewrite every identified bullet so the bold name links to its thread
pub fn rewrite_links(summary: &str, style: &LinkStyle) -> String {
    summary
        .split('\n')
        .map(|line| rewrite_line(line, style))
        .collect::<Vec<_>>()
        .join("\n")
}

fn rewrite_line(line: &str, style: &LinkStyle) -> String {
    ID_BULLET
        .replace(line, |caps: &Captures| {
            format!("{}[{}]({})", &caps[1], &caps[3], style.thread_url(&caps[2]))
        })
        .into_owned()
}
