//! Outgoing request payloads.
//!
//! A [`Payload`] is the body of one API call: an ordered set of form
//! [`Fields`] plus optional [`Attachments`]. An empty payload means the call
//! is a plain GET.

use std::path::{Path, PathBuf};

use reqwest::Method;
use serde::Serialize;

/// Form name prefix for uploaded files; the attachment key follows it.
pub const ATTACHMENT_PREFIX: &str = "attachment-";

/// Ordered form fields, name to string value.
///
/// Inserting a name that is already present replaces its value in place,
/// so the original position is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Fields(Vec<(String, String)>);

impl Fields {
    /// Creates an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Sets `name` only when `value` is present and not blank. The value is
    /// stored exactly as passed.
    pub fn insert_text(&mut self, name: &str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.insert(name, value);
        }
    }

    /// Sets `name` only when `value` is present.
    pub fn insert_id(&mut self, name: &str, value: Option<u64>) {
        if let Some(value) = value {
            self.insert(name, value.to_string());
        }
    }

    /// Returns the value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns true if `name` is present.
    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    /// Name/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Local files to upload, attachment key to path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachments(Vec<(String, PathBuf)>);

impl Attachments {
    /// Creates an empty attachment list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file under `key`, replacing any file already under that key.
    pub fn insert(&mut self, key: impl Into<String>, path: impl Into<PathBuf>) {
        let key = key.into();
        let path = path.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = path,
            None => self.0.push((key, path)),
        }
    }

    /// Builder form of [`Attachments::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.insert(key, path);
        self
    }

    /// Multipart form names (`attachment-<key>`) paired with their paths.
    pub fn upload_entries(&self) -> impl Iterator<Item = (String, &Path)> {
        self.0
            .iter()
            .map(|(key, path)| (format!("{}{}", ATTACHMENT_PREFIX, key), path.as_path()))
    }

    /// Number of attachments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there is nothing to upload.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, P> FromIterator<(K, P)> for Attachments
where
    K: Into<String>,
    P: Into<PathBuf>,
{
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        let mut attachments = Attachments::new();
        for (key, path) in iter {
            attachments.insert(key, path);
        }
        attachments
    }
}

/// The body of a single API call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    /// Form fields.
    pub fields: Fields,
    /// Files uploaded alongside the fields.
    pub attachments: Attachments,
}

impl Payload {
    /// Creates a payload from form fields.
    pub fn new(fields: Fields) -> Self {
        Self {
            fields,
            attachments: Attachments::new(),
        }
    }

    /// Adds attachments to the payload.
    #[must_use]
    pub fn with_attachments(mut self, attachments: Attachments) -> Self {
        self.attachments = attachments;
        self
    }

    /// Returns true when there is neither a field nor an attachment.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.attachments.is_empty()
    }

    /// Returns true when the body has to be sent as multipart form data.
    pub fn is_multipart(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Selects the HTTP method: GET without a body, PUT for updates,
    /// POST otherwise.
    pub fn method(&self, update: bool) -> Method {
        if self.is_empty() {
            Method::GET
        } else if update {
            Method::PUT
        } else {
            Method::POST
        }
    }
}
