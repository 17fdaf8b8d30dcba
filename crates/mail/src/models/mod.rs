//! Domain models for the digest pipeline

mod message;
mod thread;

pub use message::{MessageId, NormalizedMessage};
pub use thread::ThreadId;
