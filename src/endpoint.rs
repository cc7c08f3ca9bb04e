//! Endpoint path templates of the IssueTracker API.

use std::fmt;

/// A relative API endpoint, rendered onto the base URL by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// All projects with the API enabled. `with_issues` deep-loads each
    /// project's active issues.
    Projects {
        /// Include active issues inline.
        with_issues: bool,
    },
    /// Priority levels.
    PriorityLevels,
    /// People in a project.
    PeopleInProject(u64),
    /// Issues in a project.
    IssuesInProject(u64),
    /// Existence check for an issue.
    DoesIssueExist(u64, u64),
    /// Statuses an issue can transition to.
    PotentialStatusesForIssue(u64, u64),
    /// A single issue; also the target of issue updates.
    Issue(u64, u64),
    /// People an issue can be assigned to.
    PeopleForIssueAssignment(u64, u64),
    /// Issue creation within a project.
    NewIssue(u64),
    /// Comment creation on an issue.
    Comment(u64, u64),
}

impl Endpoint {
    /// Renders the path relative to the API base URL.
    pub fn path(&self) -> String {
        match *self {
            Endpoint::Projects { with_issues: false } => "Projects".to_string(),
            Endpoint::Projects { with_issues: true } => "Projects/true".to_string(),
            Endpoint::PriorityLevels => "PriorityLevels".to_string(),
            Endpoint::PeopleInProject(project) => format!("PeopleInProject/{}", project),
            Endpoint::IssuesInProject(project) => format!("IssuesInProject/{}", project),
            Endpoint::DoesIssueExist(project, issue) => {
                format!("DoesIssueExist/{}/{}", project, issue)
            }
            Endpoint::PotentialStatusesForIssue(project, issue) => {
                format!("PotentialStatusesForIssue/{}/{}", project, issue)
            }
            Endpoint::Issue(project, issue) => format!("Issue/{}/{}", project, issue),
            Endpoint::PeopleForIssueAssignment(project, issue) => {
                format!("PeopleForIssueAssignment/{}/{}", project, issue)
            }
            Endpoint::NewIssue(project) => format!("Issue/{}", project),
            Endpoint::Comment(project, issue) => format!("Comment/{}/{}", project, issue),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
