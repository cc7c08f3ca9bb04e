//! Configuration management for the issue tracker client.
//!
//! Configuration can be built in code with [`Config::new`] or loaded from
//! environment variables with [`Config::from_env`]. Credential precedence
//! (API token over password) is resolved here, once, into a [`Credential`].

use std::env;
use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::TrackerError;

/// Host that company subdomains live under.
pub const DEFAULT_HOST: &str = "mydonedone.com";

/// Path prefix of the API on every subdomain.
const API_PATH: &str = "IssueTracker/API/";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The resolved secret sent as the Basic auth password.
///
/// Holds either the project API token or the account password. The value is
/// redacted from `Debug` output and must never be logged.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Applies the precedence rule: a non-empty token wins, otherwise the
    /// password is used.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Config` if both are absent or empty.
    pub fn resolve(token: Option<&str>, password: Option<&str>) -> Result<Self, TrackerError> {
        let token = token.filter(|t| !t.is_empty());
        let password = password.filter(|p| !p.is_empty());

        token
            .or(password)
            .map(|secret| Credential(secret.to_string()))
            .ok_or_else(|| {
                TrackerError::invalid_config("either an API token or a password is required")
            })
    }

    /// Returns the secret. Only for the Authorization header and redaction.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Settings for connecting to the IssueTracker API.
#[derive(Clone)]
pub struct Config {
    /// Company subdomain, e.g. `acme` for `acme.mydonedone.com`.
    pub domain: String,

    /// Account username used for Basic authentication.
    pub username: String,

    /// Resolved credential (token preferred over password).
    credential: Credential,

    /// Full base URL override. When unset the URL is derived from `domain`.
    pub base_url: Option<String>,

    /// Transport timeout for each request.
    pub timeout: Duration,
}

impl Config {
    /// Builds a configuration from explicit values.
    ///
    /// `token` takes precedence over `password` when it is non-empty.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Config` if the domain is not a valid DNS label,
    /// the username is blank, or no credential is supplied.
    pub fn new(
        domain: impl Into<String>,
        token: Option<&str>,
        username: impl Into<String>,
        password: Option<&str>,
    ) -> Result<Self, TrackerError> {
        let domain = Self::validate_domain(domain.into())?;
        let username = username.into();
        if username.trim().is_empty() {
            return Err(TrackerError::invalid_config("username must not be empty"));
        }
        let credential = Credential::resolve(token, password)?;

        Ok(Config {
            domain,
            username,
            credential,
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Loads configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ISSUETRACKER_DOMAIN` (required): company subdomain
    /// - `ISSUETRACKER_USERNAME` (required): account username
    /// - `ISSUETRACKER_API_TOKEN`: project API token
    /// - `ISSUETRACKER_PASSWORD`: account password, used when no token is set
    /// - `ISSUETRACKER_BASE_URL`: full base URL override
    /// - `ISSUETRACKER_TIMEOUT_SECS`: request timeout (default 30)
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Config` if any required variable is missing
    /// or if values fail validation.
    pub fn from_env() -> Result<Self, TrackerError> {
        let domain = Self::get_required_env("ISSUETRACKER_DOMAIN")?;
        let username = Self::get_required_env("ISSUETRACKER_USERNAME")?;
        let token = Self::get_optional_env("ISSUETRACKER_API_TOKEN");
        let password = Self::get_optional_env("ISSUETRACKER_PASSWORD");

        if let Some(ref token) = token {
            Self::reject_placeholder("ISSUETRACKER_API_TOKEN", token)?;
        }
        if let Some(ref password) = password {
            Self::reject_placeholder("ISSUETRACKER_PASSWORD", password)?;
        }

        let mut config = Config::new(domain, token.as_deref(), username, password.as_deref())?;

        if let Some(base_url) = Self::get_optional_env("ISSUETRACKER_BASE_URL") {
            config = config.with_base_url(base_url)?;
        }
        if let Some(secs) = Self::get_optional_env("ISSUETRACKER_TIMEOUT_SECS") {
            config.timeout = Self::parse_timeout(&secs)?;
        }

        Ok(config)
    }

    /// Overrides the derived base URL (self-hosted instances, tests).
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Config` if the URL lacks an http(s) scheme.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Result<Self, TrackerError> {
        self.base_url = Some(Self::validate_base_url(url.into())?);
        Ok(self)
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the resolved credential.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Returns the API base URL, always ending in `/`.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidUrl` if the URL does not parse.
    pub fn api_url(&self) -> Result<Url, TrackerError> {
        let raw = match self.base_url {
            Some(ref url) => format!("{}/", url.trim_end_matches('/')),
            None => format!("https://{}.{}/{}", self.domain, DEFAULT_HOST, API_PATH),
        };
        Ok(Url::parse(&raw)?)
    }

    fn get_required_env(name: &str) -> Result<String, TrackerError> {
        Self::get_optional_env(name).ok_or_else(|| TrackerError::missing_env(name))
    }

    /// Reads a variable, treating blank values as unset.
    fn get_optional_env(name: &str) -> Option<String> {
        env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn validate_domain(domain: String) -> Result<String, TrackerError> {
        let domain = domain.trim().to_ascii_lowercase();
        let valid_label = !domain.is_empty()
            && domain.len() <= 63
            && !domain.starts_with('-')
            && !domain.ends_with('-')
            && domain.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-');

        if !valid_label {
            return Err(TrackerError::invalid_config(
                "domain must be a subdomain label (letters, digits and '-')",
            ));
        }
        Ok(domain)
    }

    fn validate_base_url(url: String) -> Result<String, TrackerError> {
        let url = url.trim().trim_end_matches('/').to_string();

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(TrackerError::invalid_config(
                "ISSUETRACKER_BASE_URL must start with http:// or https://",
            ));
        }

        Ok(url)
    }

    fn parse_timeout(value: &str) -> Result<Duration, TrackerError> {
        match value.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(TrackerError::invalid_config(
                "ISSUETRACKER_TIMEOUT_SECS must be a positive number of seconds",
            )),
        }
    }

    fn reject_placeholder(name: &str, value: &str) -> Result<(), TrackerError> {
        let lower = value.to_lowercase();
        let placeholder_patterns = ["your_token", "your_password", "placeholder", "changeme"];

        if placeholder_patterns.iter().any(|p| lower.contains(p)) {
            return Err(TrackerError::invalid_config(format!(
                "{} appears to be a placeholder value",
                name
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("domain", &self.domain)
            .field("username", &self.username)
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // Environment-based loading is covered by the binary; these tests stay
    // off the process environment so they can run in parallel.

    #[test]
    fn test_empty_token_falls_back_to_password() {
        let config = Config::new("acme", Some(""), "alice", Some("hunter2")).unwrap();
        assert_eq!(config.credential().expose(), "hunter2");

        let config = Config::new("acme", None, "alice", Some("hunter2")).unwrap();
        assert_eq!(config.credential().expose(), "hunter2");
    }

    #[test]
    fn test_token_takes_precedence_over_password() {
        let config = Config::new("acme", Some("tok"), "alice", Some("hunter2")).unwrap();
        assert_eq!(config.credential().expose(), "tok");

        let config = Config::new("acme", Some("tok"), "alice", None).unwrap();
        assert_eq!(config.credential().expose(), "tok");
    }

    #[test]
    fn test_missing_credential_is_rejected() {
        let err = Config::new("acme", Some(""), "alice", Some("")).unwrap_err();
        assert!(matches!(err, TrackerError::Config(_)));
        assert!(Config::new("acme", None, "alice", None).is_err());
    }

    #[test]
    fn test_blank_username_is_rejected() {
        assert!(Config::new("acme", Some("tok"), "  ", None).is_err());
    }

    #[test]
    fn test_api_url_derived_from_domain() {
        let config = Config::new("Acme", Some("tok"), "alice", None).unwrap();
        assert_eq!(
            config.api_url().unwrap().as_str(),
            "https://acme.mydonedone.com/IssueTracker/API/"
        );
    }

    #[test]
    fn test_api_url_override_gets_trailing_slash() {
        let config = Config::new("acme", Some("tok"), "alice", None)
            .unwrap()
            .with_base_url("http://127.0.0.1:8080/IssueTracker/API")
            .unwrap();
        assert_eq!(
            config.api_url().unwrap().as_str(),
            "http://127.0.0.1:8080/IssueTracker/API/"
        );
    }

    #[test]
    fn test_validate_domain_rejects_host_injection() {
        assert!(Config::validate_domain("evil.com/x".to_string()).is_err());
        assert!(Config::validate_domain("a b".to_string()).is_err());
        assert!(Config::validate_domain("-acme".to_string()).is_err());
        assert!(Config::validate_domain(String::new()).is_err());
        assert!(Config::validate_domain("acme-corp2".to_string()).is_ok());
    }

    #[test]
    fn test_validate_base_url_requires_scheme() {
        assert!(Config::validate_base_url("example.com".to_string()).is_err());
        let url = Config::validate_base_url("https://example.com/".to_string()).unwrap();
        assert_eq!(url, "https://example.com");
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(Config::parse_timeout("5").unwrap(), Duration::from_secs(5));
        assert!(Config::parse_timeout("0").is_err());
        assert!(Config::parse_timeout("soon").is_err());
    }

    #[test]
    fn test_reject_placeholder() {
        assert!(Config::reject_placeholder("X", "your_token_here").is_err());
        assert!(Config::reject_placeholder("X", "CHANGEME").is_err());
        assert!(Config::reject_placeholder("X", "f3a9c0d1").is_ok());
    }

    #[test]
    fn test_debug_redacts_credential() {
        let config = Config::new("acme", Some("s3cr3t"), "alice", None).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("s3cr3t"));
        assert!(debug.contains("[REDACTED]"));
    }
}
