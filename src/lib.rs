//! # issuetracker
//!
//! A thin async client for the DoneDone IssueTracker API, plus a small
//! command-line tool built on it.
//!
//! The client authenticates with HTTP Basic auth, sends form fields and file
//! attachments to fixed endpoint paths, and returns the server's response
//! body as a raw string. Responses are never parsed; failures come back as
//! a typed [`TrackerError`](error::TrackerError) instead of a body.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration and credential resolution
//! - [`error`] - Error type with credential redaction
//! - [`client`] - The API client and its operations
//! - [`endpoint`] - Endpoint path templates
//! - [`models`] - Outgoing payloads and write-operation options
//! - [`cli`] - Command-line front end
//!
//! ## Credentials
//!
//! A project API token takes precedence over the account password. The
//! chosen credential is never logged and is redacted from error messages.
//!
//! ## Example
//!
//! ```ignore
//! use issuetracker::client::TrackerClient;
//! use issuetracker::models::{Attachments, NewIssue};
//!
//! async fn example() -> Result<(), issuetracker::error::TrackerError> {
//!     let client = TrackerClient::from_credentials("acme", Some("token"), "alice", None)?;
//!
//!     let issue = NewIssue::new("Crash on save", 2, 10, 11)
//!         .with_tags("crash,editor")
//!         .with_attachments(Attachments::new().with("log", "/tmp/crash.log"));
//!
//!     let body = client.create_issue(7, &issue).await?;
//!     println!("{}", body);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cli;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod models;
