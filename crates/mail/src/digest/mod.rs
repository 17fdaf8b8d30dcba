//! The digest pipeline
//!
//! Stages, in run order:
//! - [`fetch`]: list and fetch the sent messages in the lookback window
//! - [`extract`]: pull text bodies out of each MIME tree
//! - [`truncate`]: drop older quoted history
//! - [`format`]: render the messages as one markdown document
//! - [`summarize`]: ask the language model for a bullet summary
//! - [`links`]: link each bullet back to its thread
//! - [`send`]: wrap the summary as HTML email and send it
//!
//! [`pipeline::DigestPipeline`] runs them in sequence.

pub mod extract;
pub mod fetch;
pub mod format;
pub mod links;
pub mod pipeline;
pub mod send;
pub mod summarize;
pub mod truncate;

pub use pipeline::{DigestPipeline, RunOutcome};
