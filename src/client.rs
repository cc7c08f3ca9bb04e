//! HTTP client for the IssueTracker API.
//!
//! [`TrackerClient::request`] is the single dispatch point: it authenticates
//! with HTTP Basic auth, encodes the payload and hands back the response body
//! untouched. The named operations only pick an [`Endpoint`] and a payload.
//!
//! There is no retry, pagination or response parsing. A 2xx body is returned
//! as-is; everything else is a [`TrackerError`].
//!
//! # Security
//!
//! The credential is never logged. Error bodies are sanitized before they
//! are returned.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use url::Url;

use crate::config::{Config, Credential};
use crate::endpoint::Endpoint;
use crate::error::TrackerError;
use crate::models::{IssueUpdate, NewComment, NewIssue, Payload};

/// HTTP client for the IssueTracker API.
///
/// Cloning is cheap and clones share the underlying connection pool.
///
/// # Example
///
/// ```ignore
/// let client = TrackerClient::from_credentials("acme", Some(token), "alice", None)?;
/// let projects = client.get_projects(false).await?;
/// println!("{}", projects);
/// ```
#[derive(Clone)]
pub struct TrackerClient {
    /// The underlying HTTP client.
    http: Client,

    /// API base URL, ending in `/`.
    base_url: Url,

    username: String,

    /// SECURITY: Never log this value!
    credential: Credential,

    /// Transport timeout, reported in timeout errors.
    timeout: Duration,
}

impl TrackerClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::HttpClient` if the HTTP client fails to
    /// initialize, or `TrackerError::InvalidUrl` for a malformed base URL.
    pub fn new(config: &Config) -> Result<Self, TrackerError> {
        let http = Client::builder()
            .user_agent(format!("issuetracker/{}", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(TrackerError::HttpClient)?;

        let base_url = config.api_url()?;

        Ok(Self {
            http,
            base_url,
            username: config.username.clone(),
            credential: config.credential().clone(),
            timeout: config.timeout,
        })
    }

    /// Creates a client straight from domain and credentials.
    ///
    /// A non-empty `token` is used as the credential; otherwise `password`
    /// is.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Config` if neither credential is set or the
    /// domain is invalid.
    pub fn from_credentials(
        domain: &str,
        token: Option<&str>,
        username: &str,
        password: Option<&str>,
    ) -> Result<Self, TrackerError> {
        let config = Config::new(domain, token, username, password)?;
        Self::new(&config)
    }

    /// The API base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The username sent with every request.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The resolved credential.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Sends one authenticated request and returns the raw response body.
    ///
    /// An empty payload is sent as GET. A non-empty payload is sent as PUT
    /// when `update` is set and as POST otherwise; it is form-encoded, or
    /// multipart when it carries attachments. Each attachment is uploaded
    /// as `attachment-<key>`.
    ///
    /// # Errors
    ///
    /// - `TrackerError::InvalidUrl` if `path` would leave the API base URL
    /// - `TrackerError::Attachment` if a local file cannot be read
    /// - `TrackerError::Http` / `TrackerError::Timeout` on transport failure
    /// - `TrackerError::HttpStatus` for any non-2xx response
    /// - `TrackerError::Decode` if the body cannot be read as text
    pub async fn request(
        &self,
        path: &str,
        payload: &Payload,
        update: bool,
    ) -> Result<String, TrackerError> {
        let url = self.endpoint_url(path)?;
        let method = payload.method(update);

        tracing::debug!(
            method = %method,
            path = %path,
            fields = payload.fields.len(),
            attachments = payload.attachments.len(),
            "Making IssueTracker API request"
        );

        let mut req = self
            .http
            .request(method.clone(), url)
            .basic_auth(&self.username, Some(self.credential.expose()));

        if payload.is_multipart() {
            req = req.multipart(Self::multipart_form(payload).await?);
        } else if !payload.is_empty() {
            req = req.form(&payload.fields);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                return TrackerError::timeout(self.timeout, format!("{} {}", method, path));
            }
            TrackerError::Http(e)
        })?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Failed to read error response body");
                String::new()
            });
            let body = TrackerError::sanitize_message(&body, self.credential.expose());
            tracing::warn!(
                status = %status,
                method = %method,
                path = %path,
                "IssueTracker API returned an error status"
            );
            return Err(TrackerError::HttpStatus { status, body });
        }

        let body = response.text().await.map_err(TrackerError::Decode)?;

        tracing::trace!(body = %body, "IssueTracker API response");

        Ok(body)
    }

    /// Appends `path` to the base URL.
    ///
    /// The result must keep the base URL's origin and stay under its path;
    /// anything else is `TrackerError::InvalidUrl`.
    fn endpoint_url(&self, path: &str) -> Result<Url, TrackerError> {
        let raw = format!("{}{}", self.base_url, path.trim_start_matches('/'));
        let url = Url::parse(&raw)?;

        if url.origin() != self.base_url.origin() || !url.path().starts_with(self.base_url.path())
        {
            return Err(TrackerError::InvalidUrl(format!(
                "endpoint {:?} leaves the API base URL",
                path
            )));
        }
        Ok(url)
    }

    /// Builds the multipart body: fields as text parts, then one file part
    /// per attachment.
    async fn multipart_form(payload: &Payload) -> Result<Form, TrackerError> {
        let mut form = Form::new();

        for (name, value) in payload.fields.iter() {
            form = form.text(name.to_string(), value.to_string());
        }

        for (name, path) in payload.attachments.upload_entries() {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|source| TrackerError::Attachment {
                    path: path.to_path_buf(),
                    source,
                })?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| name.clone());

            tracing::debug!(part = %name, file = %file_name, size = bytes.len(), "Attaching file");

            form = form.part(name, Part::bytes(bytes).file_name(file_name));
        }

        Ok(form)
    }

    async fn get(&self, endpoint: Endpoint) -> Result<String, TrackerError> {
        self.request(&endpoint.path(), &Payload::default(), false)
            .await
    }

    /// Tests connectivity and credentials.
    ///
    /// Fetches the priority levels, the cheapest authenticated call.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::ConnectionTest` describing what went wrong.
    pub async fn test_connection(&self) -> Result<(), TrackerError> {
        tracing::debug!("Testing connection to IssueTracker API");

        match self.get_priority_levels().await {
            Ok(_) => {
                tracing::info!("Connection test successful");
                Ok(())
            }
            Err(e) if e.is_unauthorized() => Err(TrackerError::connection_test(
                "authentication failed - verify username and API token or password",
            )),
            Err(TrackerError::Timeout { duration, .. }) => {
                Err(TrackerError::connection_test(format!(
                    "connection timed out after {:?} - verify the domain and that the server is reachable",
                    duration
                )))
            }
            Err(TrackerError::Http(e)) => {
                let message =
                    TrackerError::sanitize_message(&e.to_string(), self.credential.expose());
                Err(TrackerError::connection_test(format!(
                    "HTTP error: {} - verify the domain is correct",
                    message
                )))
            }
            Err(e) => Err(TrackerError::connection_test(
                e.sanitized_display(self.credential.expose()),
            )),
        }
    }

    /// Lists all projects with the API enabled.
    ///
    /// With `load_with_issues` every project is deep-loaded together with its
    /// active issues.
    pub async fn get_projects(&self, load_with_issues: bool) -> Result<String, TrackerError> {
        self.get(Endpoint::Projects {
            with_issues: load_with_issues,
        })
        .await
    }

    /// Lists priority levels.
    pub async fn get_priority_levels(&self) -> Result<String, TrackerError> {
        self.get(Endpoint::PriorityLevels).await
    }

    /// Lists everyone in a project.
    pub async fn get_all_people_in_project(&self, project_id: u64) -> Result<String, TrackerError> {
        self.get(Endpoint::PeopleInProject(project_id)).await
    }

    /// Lists all issues in a project.
    pub async fn get_all_issues_in_project(&self, project_id: u64) -> Result<String, TrackerError> {
        self.get(Endpoint::IssuesInProject(project_id)).await
    }

    /// Checks whether an issue exists.
    pub async fn does_issue_exist(
        &self,
        project_id: u64,
        issue_id: u64,
    ) -> Result<String, TrackerError> {
        self.get(Endpoint::DoesIssueExist(project_id, issue_id))
            .await
    }

    /// Lists the statuses an issue can move to.
    ///
    /// Admins get every status back, not only the allowed transitions.
    pub async fn get_potential_statuses_for_issue(
        &self,
        project_id: u64,
        issue_id: u64,
    ) -> Result<String, TrackerError> {
        self.get(Endpoint::PotentialStatusesForIssue(project_id, issue_id))
            .await
    }

    /// Gets issue details. A missing issue comes back as HTTP 404.
    pub async fn get_issue_details(
        &self,
        project_id: u64,
        issue_id: u64,
    ) -> Result<String, TrackerError> {
        self.get(Endpoint::Issue(project_id, issue_id)).await
    }

    /// Lists people an issue can be assigned to.
    pub async fn get_people_for_issue_assignment(
        &self,
        project_id: u64,
        issue_id: u64,
    ) -> Result<String, TrackerError> {
        self.get(Endpoint::PeopleForIssueAssignment(project_id, issue_id))
            .await
    }

    /// Creates an issue in a project.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Validation` if the title is blank.
    pub async fn create_issue(
        &self,
        project_id: u64,
        issue: &NewIssue,
    ) -> Result<String, TrackerError> {
        if issue.title.trim().is_empty() {
            return Err(TrackerError::validation("issue title must not be empty"));
        }

        let payload = issue.to_payload();
        self.request(&Endpoint::NewIssue(project_id).path(), &payload, false)
            .await
    }

    /// Adds a comment to an issue.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Validation` if the comment is blank.
    pub async fn create_comment(
        &self,
        project_id: u64,
        issue_id: u64,
        comment: &NewComment,
    ) -> Result<String, TrackerError> {
        if comment.comment.trim().is_empty() {
            return Err(TrackerError::validation("comment must not be empty"));
        }

        let payload = comment.to_payload();
        self.request(&Endpoint::Comment(project_id, issue_id).path(), &payload, false)
            .await
    }

    /// Updates an issue.
    ///
    /// Only the fields set on `update` are sent; each one replaces the stored
    /// value.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Validation` if the update carries neither a
    /// field nor an attachment.
    pub async fn update_issue(
        &self,
        project_id: u64,
        issue_id: u64,
        update: &IssueUpdate,
    ) -> Result<String, TrackerError> {
        let payload = update.to_payload();
        if payload.is_empty() {
            return Err(TrackerError::validation(
                "update must set at least one field or attachment",
            ));
        }

        self.request(&Endpoint::Issue(project_id, issue_id).path(), &payload, true)
            .await
    }
}

impl std::fmt::Debug for TrackerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerClient")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("credential", &self.credential)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Attachments;
    use pretty_assertions::assert_eq;

    fn test_client() -> TrackerClient {
        TrackerClient::from_credentials("acme", Some("tok"), "alice", Some("pw")).unwrap()
    }

    #[test]
    fn test_credential_prefers_token() {
        let client = test_client();
        assert_eq!(client.credential().expose(), "tok");
    }

    #[test]
    fn test_credential_falls_back_to_password() {
        let client =
            TrackerClient::from_credentials("acme", Some(""), "alice", Some("pw")).unwrap();
        assert_eq!(client.credential().expose(), "pw");
    }

    #[test]
    fn test_base_url_from_domain() {
        let client = test_client();
        assert_eq!(
            client.base_url().as_str(),
            "https://acme.mydonedone.com/IssueTracker/API/"
        );
        assert_eq!(
            client.base_url().join("Projects/true").unwrap().as_str(),
            "https://acme.mydonedone.com/IssueTracker/API/Projects/true"
        );
    }

    #[test]
    fn test_endpoint_url_appends_path() {
        let client = test_client();
        assert_eq!(
            client.endpoint_url("Issue/7/42").unwrap().as_str(),
            "https://acme.mydonedone.com/IssueTracker/API/Issue/7/42"
        );
        assert_eq!(
            client.endpoint_url("Search:foo").unwrap().as_str(),
            "https://acme.mydonedone.com/IssueTracker/API/Search:foo"
        );
    }

    #[test]
    fn test_endpoint_url_keeps_host() {
        let client = test_client();
        let url = client.endpoint_url("http://127.0.0.1:9/x").unwrap();
        assert_eq!(url.host_str(), Some("acme.mydonedone.com"));
        assert!(url.path().starts_with("/IssueTracker/API/"));
    }

    #[test]
    fn test_endpoint_url_rejects_escaping_path() {
        let err = test_client().endpoint_url("../../Admin").unwrap_err();
        assert!(matches!(err, TrackerError::InvalidUrl(_)));
    }

    #[test]
    fn test_debug_hides_credential() {
        let debug = format!("{:?}", test_client());
        assert!(!debug.contains("tok"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_multipart_form_reports_missing_file() {
        let payload = Payload::default()
            .with_attachments(Attachments::new().with("a", "/nonexistent/dir/f.png"));
        let err = TrackerClient::multipart_form(&payload).await.unwrap_err();
        match err {
            TrackerError::Attachment { path, .. } => {
                assert_eq!(path, std::path::PathBuf::from("/nonexistent/dir/f.png"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected_before_sending() {
        let err = test_client()
            .update_issue(1, 2, &IssueUpdate::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
    }

    #[tokio::test]
    async fn test_blank_title_is_rejected_before_sending() {
        let err = test_client()
            .create_issue(1, &NewIssue::new("   ", 1, 2, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
    }

    #[tokio::test]
    async fn test_blank_comment_is_rejected_before_sending() {
        let err = test_client()
            .create_comment(1, 2, &NewComment::new(" \n"))
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
    }
}
