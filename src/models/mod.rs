//! Request payload models for the IssueTracker API.
//!
//! Responses are passed through as raw text, so the only models are on the
//! outgoing side: form fields, attachments and the option structs for the
//! write operations.

mod issue;
mod payload;

pub use issue::*;
pub use payload::*;
