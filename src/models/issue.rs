//! Options for the write operations: issue creation, issue updates and
//! comments.
//!
//! Each struct carries named optional fields. `to_payload()` inserts only the
//! fields that are present, using the API's wire names.

use super::{Attachments, Fields, Payload};

/// A new issue.
///
/// `tags` and `watcher_ids` are comma-delimited and sent as-is.
#[derive(Debug, Clone, Default)]
pub struct NewIssue {
    /// Issue title (required).
    pub title: String,

    /// Priority level ID.
    pub priority_id: u64,

    /// Person assigned to resolve the issue.
    pub resolver_id: u64,

    /// Person assigned to verify the fix.
    pub tester_id: u64,

    /// Optional description.
    pub description: Option<String>,

    /// Optional comma-delimited tags.
    pub tags: Option<String>,

    /// Optional comma-delimited IDs of people watching the issue.
    pub watcher_ids: Option<String>,

    /// Files to upload with the issue.
    pub attachments: Attachments,
}

impl NewIssue {
    /// Creates an issue with the required fields only.
    pub fn new(
        title: impl Into<String>,
        priority_id: u64,
        resolver_id: u64,
        tester_id: u64,
    ) -> Self {
        Self {
            title: title.into(),
            priority_id,
            resolver_id,
            tester_id,
            ..Default::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the comma-delimited tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    /// Sets the comma-delimited watcher IDs.
    #[must_use]
    pub fn with_watchers(mut self, watcher_ids: impl Into<String>) -> Self {
        self.watcher_ids = Some(watcher_ids.into());
        self
    }

    /// Sets the files to upload.
    #[must_use]
    pub fn with_attachments(mut self, attachments: Attachments) -> Self {
        self.attachments = attachments;
        self
    }

    /// Builds the request payload.
    pub fn to_payload(&self) -> Payload {
        let mut fields = Fields::new();
        fields.insert("title", self.title.as_str());
        fields.insert("priority_level_id", self.priority_id.to_string());
        fields.insert("resolver_id", self.resolver_id.to_string());
        fields.insert("tester_id", self.tester_id.to_string());
        fields.insert_text("description", self.description.as_deref());
        fields.insert_text("tags", self.tags.as_deref());
        fields.insert_text("watcher_id", self.watcher_ids.as_deref());

        Payload::new(fields).with_attachments(self.attachments.clone())
    }
}

/// Changes to an existing issue.
///
/// Omitted fields are left untouched on the server. Supplied fields replace
/// the stored value entirely; to add a tag, pass the full tag list.
#[derive(Debug, Clone, Default)]
pub struct IssueUpdate {
    /// New title.
    pub title: Option<String>,

    /// New priority level ID.
    pub priority_id: Option<u64>,

    /// New resolver.
    pub resolver_id: Option<u64>,

    /// New tester.
    pub tester_id: Option<u64>,

    /// New description.
    pub description: Option<String>,

    /// Replacement comma-delimited tag list.
    pub tags: Option<String>,

    /// A state the issue can transition to (see potential statuses).
    pub state_id: Option<u64>,

    /// Files to upload with the update.
    pub attachments: Attachments,
}

impl IssueUpdate {
    /// Creates an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the priority level.
    #[must_use]
    pub fn with_priority(mut self, priority_id: u64) -> Self {
        self.priority_id = Some(priority_id);
        self
    }

    /// Sets the resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver_id: u64) -> Self {
        self.resolver_id = Some(resolver_id);
        self
    }

    /// Sets the tester.
    #[must_use]
    pub fn with_tester(mut self, tester_id: u64) -> Self {
        self.tester_id = Some(tester_id);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the tag list.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    /// Moves the issue to another state.
    #[must_use]
    pub fn with_state(mut self, state_id: u64) -> Self {
        self.state_id = Some(state_id);
        self
    }

    /// Sets the files to upload.
    #[must_use]
    pub fn with_attachments(mut self, attachments: Attachments) -> Self {
        self.attachments = attachments;
        self
    }

    /// Builds the request payload.
    pub fn to_payload(&self) -> Payload {
        let mut fields = Fields::new();
        fields.insert_text("title", self.title.as_deref());
        fields.insert_id("priority_level_id", self.priority_id);
        fields.insert_id("resolver_id", self.resolver_id);
        fields.insert_id("tester_id", self.tester_id);
        fields.insert_text("description", self.description.as_deref());
        fields.insert_text("tags", self.tags.as_deref());
        fields.insert_id("state_id", self.state_id);

        Payload::new(fields).with_attachments(self.attachments.clone())
    }
}

/// A comment on an issue.
#[derive(Debug, Clone, Default)]
pub struct NewComment {
    /// Comment text (required).
    pub comment: String,

    /// Optional comma-delimited IDs of people to CC.
    pub people_to_cc_ids: Option<String>,

    /// Files to upload with the comment.
    pub attachments: Attachments,
}

impl NewComment {
    /// Creates a comment with the given text.
    pub fn new(comment: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
            ..Default::default()
        }
    }

    /// Sets the comma-delimited CC list.
    #[must_use]
    pub fn with_cc(mut self, people_to_cc_ids: impl Into<String>) -> Self {
        self.people_to_cc_ids = Some(people_to_cc_ids.into());
        self
    }

    /// Sets the files to upload.
    #[must_use]
    pub fn with_attachments(mut self, attachments: Attachments) -> Self {
        self.attachments = attachments;
        self
    }

    /// Builds the request payload.
    pub fn to_payload(&self) -> Payload {
        let mut fields = Fields::new();
        fields.insert("comment", self.comment.as_str());
        fields.insert_text("people_to_cc_ids", self.people_to_cc_ids.as_deref());

        Payload::new(fields).with_attachments(self.attachments.clone())
    }
}
