//! Command-line front end.
//!
//! Every subcommand maps onto one [`TrackerClient`] operation and yields the
//! raw response body, which the binary prints to stdout.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::client::TrackerClient;
use crate::error::TrackerError;
use crate::models::{IssueUpdate, NewComment, NewIssue};

/// Command-line client for the DoneDone IssueTracker API.
///
/// Connection settings come from ISSUETRACKER_* environment variables or a
/// `.env` file.
#[derive(Debug, Parser)]
#[command(name = "issuetracker", version, about)]
pub struct Cli {
    /// Re-indent JSON responses for reading.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Skip the connection test before running the command.
    #[arg(long, global = true)]
    pub no_check: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// API operations.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List projects with the API enabled.
    Projects {
        /// Deep-load each project's active issues.
        #[arg(long)]
        with_issues: bool,
    },
    /// List priority levels.
    Priorities,
    /// List people in a project.
    People {
        /// Project ID.
        project: u64,
    },
    /// List issues in a project.
    Issues {
        /// Project ID.
        project: u64,
    },
    /// Check whether an issue exists.
    Exists(IssueRef),
    /// List statuses an issue can transition to.
    Statuses(IssueRef),
    /// Show issue details.
    Issue(IssueRef),
    /// List people an issue can be assigned to.
    Assignable(IssueRef),
    /// Create an issue.
    CreateIssue(CreateIssueArgs),
    /// Comment on an issue.
    Comment(CommentArgs),
    /// Update an issue. Only the given options are changed.
    UpdateIssue(UpdateIssueArgs),
}

/// Project and issue identifiers.
#[derive(Debug, Args)]
pub struct IssueRef {
    /// Project ID.
    pub project: u64,
    /// Issue ID.
    pub issue: u64,
}

/// Arguments for `create-issue`.
#[derive(Debug, Args)]
pub struct CreateIssueArgs {
    /// Project ID.
    pub project: u64,

    /// Issue title.
    #[arg(long)]
    pub title: String,

    /// Priority level ID.
    #[arg(long)]
    pub priority: u64,

    /// Resolver person ID.
    #[arg(long)]
    pub resolver: u64,

    /// Tester person ID.
    #[arg(long)]
    pub tester: u64,

    /// Issue description.
    #[arg(long)]
    pub description: Option<String>,

    /// Comma-delimited tags.
    #[arg(long)]
    pub tags: Option<String>,

    /// Comma-delimited watcher person IDs.
    #[arg(long)]
    pub watchers: Option<String>,

    /// File to upload, may be repeated.
    #[arg(long = "attach", value_name = "KEY=PATH", value_parser = parse_attachment)]
    pub attachments: Vec<(String, PathBuf)>,
}

/// Arguments for `comment`.
#[derive(Debug, Args)]
pub struct CommentArgs {
    /// Project ID.
    pub project: u64,

    /// Issue ID.
    pub issue: u64,

    /// Comment text.
    #[arg(long)]
    pub text: String,

    /// Comma-delimited IDs of people to CC.
    #[arg(long)]
    pub cc: Option<String>,

    /// File to upload, may be repeated.
    #[arg(long = "attach", value_name = "KEY=PATH", value_parser = parse_attachment)]
    pub attachments: Vec<(String, PathBuf)>,
}

/// Arguments for `update-issue`.
#[derive(Debug, Args)]
pub struct UpdateIssueArgs {
    /// Project ID.
    pub project: u64,

    /// Issue ID.
    pub issue: u64,

    /// New title.
    #[arg(long)]
    pub title: Option<String>,

    /// New priority level ID.
    #[arg(long)]
    pub priority: Option<u64>,

    /// New resolver person ID.
    #[arg(long)]
    pub resolver: Option<u64>,

    /// New tester person ID.
    #[arg(long)]
    pub tester: Option<u64>,

    /// New description.
    #[arg(long)]
    pub description: Option<String>,

    /// Replacement comma-delimited tag list.
    #[arg(long)]
    pub tags: Option<String>,

    /// State ID to transition to.
    #[arg(long)]
    pub state: Option<u64>,

    /// File to upload, may be repeated.
    #[arg(long = "attach", value_name = "KEY=PATH", value_parser = parse_attachment)]
    pub attachments: Vec<(String, PathBuf)>,
}

impl Command {
    /// Runs the command and returns the raw response body.
    pub async fn execute(self, client: &TrackerClient) -> Result<String, TrackerError> {
        match self {
            Command::Projects { with_issues } => client.get_projects(with_issues).await,
            Command::Priorities => client.get_priority_levels().await,
            Command::People { project } => client.get_all_people_in_project(project).await,
            Command::Issues { project } => client.get_all_issues_in_project(project).await,
            Command::Exists(r) => client.does_issue_exist(r.project, r.issue).await,
            Command::Statuses(r) => {
                client
                    .get_potential_statuses_for_issue(r.project, r.issue)
                    .await
            }
            Command::Issue(r) => client.get_issue_details(r.project, r.issue).await,
            Command::Assignable(r) => {
                client
                    .get_people_for_issue_assignment(r.project, r.issue)
                    .await
            }
            Command::CreateIssue(args) => {
                let project = args.project;
                client.create_issue(project, &args.into_new_issue()).await
            }
            Command::Comment(args) => {
                let (project, issue) = (args.project, args.issue);
                client
                    .create_comment(project, issue, &args.into_new_comment())
                    .await
            }
            Command::UpdateIssue(args) => {
                let (project, issue) = (args.project, args.issue);
                client
                    .update_issue(project, issue, &args.into_update())
                    .await
            }
        }
    }
}

impl CreateIssueArgs {
    fn into_new_issue(self) -> NewIssue {
        NewIssue {
            title: self.title,
            priority_id: self.priority,
            resolver_id: self.resolver,
            tester_id: self.tester,
            description: self.description,
            tags: self.tags,
            watcher_ids: self.watchers,
            attachments: self.attachments.into_iter().collect(),
        }
    }
}

impl CommentArgs {
    fn into_new_comment(self) -> NewComment {
        NewComment {
            comment: self.text,
            people_to_cc_ids: self.cc,
            attachments: self.attachments.into_iter().collect(),
        }
    }
}

impl UpdateIssueArgs {
    fn into_update(self) -> IssueUpdate {
        IssueUpdate {
            title: self.title,
            priority_id: self.priority,
            resolver_id: self.resolver,
            tester_id: self.tester,
            description: self.description,
            tags: self.tags,
            state_id: self.state,
            attachments: self.attachments.into_iter().collect(),
        }
    }
}

/// Parses a `KEY=PATH` attachment argument.
fn parse_attachment(value: &str) -> Result<(String, PathBuf), String> {
    let (key, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=PATH, got {:?}", value))?;
    let key = key.trim();
    let path = path.trim();

    if key.is_empty() || path.is_empty() {
        return Err(format!("expected KEY=PATH, got {:?}", value));
    }
    Ok((key.to_string(), PathBuf::from(path)))
}

/// Formats a response body for output.
///
/// With `pretty`, valid JSON is re-indented; anything else is returned
/// unchanged.
pub fn render(body: &str, pretty: bool) -> String {
    if !pretty {
        return body.to_string();
    }
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| serde_json::to_string_pretty(&json).ok())
        .unwrap_or_else(|| body.to_string())
}
