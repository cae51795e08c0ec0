//! Synchronous HTTP client for the docat REST surface.
//!
//! Each operation is a single round-trip: the server either answers
//! with the expected status code or the call fails. Transport problems
//! surface as [`DocatlError::Network`]; any other status code becomes a
//! [`DocatlError::RemoteRejected`] carrying the server's diagnostic
//! body verbatim. Nothing is retried.

use crate::error::{DocatlError, Result};
use camino::Utf8Path;
use serde::Deserialize;
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

/// Request header carrying the docat credential token.
pub const API_KEY_HEADER: &str = "Docat-Api-Key";

/// Multipart form field name the server expects for uploads.
const UPLOAD_FIELD_NAME: &str = "file";

/// A claimed project namespace: the server-issued token granting write
/// access.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectClaim {
    /// Opaque credential string issued by the server.
    #[serde(alias = "Token")]
    pub token: String,
}

/// Client for one docat server, constructed per command invocation from
/// resolved settings.
///
/// # Examples
///
/// ```
/// use docatl::client::DocatClient;
///
/// let client = DocatClient::new("https://docs.example.com/", "secret");
/// // Trailing slashes on the host are normalised away.
/// ```
#[derive(Debug)]
pub struct DocatClient {
    host: String,
    api_key: String,
    agent: ureq::Agent,
}

impl DocatClient {
    /// Create a client for `host`, attaching `api_key` to requests that
    /// carry credentials. An empty key means no credential is
    /// configured.
    #[must_use]
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        let host: String = host.into();
        // Non-2xx responses are read for their diagnostic body rather
        // than surfacing as transport errors.
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            host: host.trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
            agent: ureq::Agent::new_with_config(config),
        }
    }

    /// Upload a documentation artifact as `project`/`version`.
    ///
    /// # Errors
    ///
    /// Returns [`DocatlError::InvalidInput`] when the artifact is not
    /// readable locally, [`DocatlError::Network`] on transport failure,
    /// and [`DocatlError::RemoteRejected`] unless the server answers
    /// HTTP 201.
    pub fn publish(&self, project: &str, version: &str, artifact_path: &Utf8Path) -> Result<()> {
        let url = self.api_url(&[project, version]);
        self.upload(&url, artifact_path, 201)
    }

    /// Upload a project icon.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::publish`], expecting HTTP 200.
    pub fn push_icon(&self, project: &str, icon_path: &Utf8Path) -> Result<()> {
        let url = self.api_url(&[project, "icon"]);
        self.upload(&url, icon_path, 200)
    }

    /// Delete a published version. The credential header is always
    /// attached, even when empty, matching server expectations.
    ///
    /// # Errors
    ///
    /// Returns [`DocatlError::Network`] or [`DocatlError::RemoteRejected`].
    pub fn delete(&self, project: &str, version: &str) -> Result<()> {
        let url = self.api_url(&[project, version]);
        log::debug!("DELETE {url}");
        let response = self
            .agent
            .delete(url.as_str())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .call()
            .map_err(|e| network_error(&url, &e))?;
        expect_status(response, 200)
    }

    /// Point `tag` at `version`. Tags are applied one call at a time;
    /// a failure does not roll back previously applied tags.
    ///
    /// # Errors
    ///
    /// Returns [`DocatlError::Network`] or [`DocatlError::RemoteRejected`].
    pub fn tag(&self, project: &str, version: &str, tag: &str) -> Result<()> {
        let url = self.api_url(&[project, version, "tags", tag]);
        log::debug!("PUT {url}");
        let response = self
            .with_api_key(self.agent.put(url.as_str()))
            .send_empty()
            .map_err(|e| network_error(&url, &e))?;
        expect_status(response, 201)
    }

    /// Claim the project namespace, returning the server-issued token.
    /// No credential is required.
    ///
    /// # Errors
    ///
    /// Returns [`DocatlError::Network`] on transport failure,
    /// [`DocatlError::RemoteRejected`] unless the server answers HTTP
    /// 201, and [`DocatlError::Format`] when a 201 body cannot be
    /// parsed as a claim.
    pub fn claim(&self, project: &str) -> Result<ProjectClaim> {
        let url = self.api_url(&[project, "claim"]);
        log::debug!("GET {url}");
        let response = self
            .agent
            .get(url.as_str())
            .call()
            .map_err(|e| network_error(&url, &e))?;

        let status = response.status().as_u16();
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| network_error(&url, &e))?;
        if status != 201 {
            return Err(DocatlError::RemoteRejected { status, body });
        }
        serde_json::from_str(&body).map_err(|_| DocatlError::Format {
            reason: format!("cannot parse claim response from server: {body}"),
        })
    }

    /// Rename a project.
    ///
    /// # Errors
    ///
    /// Returns [`DocatlError::Network`] or [`DocatlError::RemoteRejected`].
    pub fn rename(&self, project: &str, new_name: &str) -> Result<()> {
        let url = self.api_url(&[project, "rename", new_name]);
        log::debug!("PUT {url}");
        let response = self
            .with_api_key(self.agent.put(url.as_str()))
            .send_empty()
            .map_err(|e| network_error(&url, &e))?;
        expect_status(response, 200)
    }

    /// Hide or show a published version in the version select and the
    /// search index.
    ///
    /// # Errors
    ///
    /// Returns [`DocatlError::Network`] or [`DocatlError::RemoteRejected`].
    pub fn set_visibility(&self, project: &str, version: &str, hidden: bool) -> Result<()> {
        let action = if hidden { "hide" } else { "show" };
        let url = self.api_url(&[project, version, action]);
        log::debug!("POST {url}");
        let response = self
            .with_api_key(self.agent.post(url.as_str()))
            .send_empty()
            .map_err(|e| network_error(&url, &e))?;
        expect_status(response, 200)
    }

    /// Trigger server-side regeneration of the search index.
    ///
    /// # Errors
    ///
    /// Returns [`DocatlError::Network`] or [`DocatlError::RemoteRejected`].
    pub fn update_index(&self) -> Result<()> {
        let url = self.api_url(&["index", "update"]);
        log::debug!("POST {url}");
        let response = self
            .with_api_key(self.agent.post(url.as_str()))
            .send_empty()
            .map_err(|e| network_error(&url, &e))?;
        expect_status(response, 200)
    }

    /// Multipart upload of a local file, expecting `expected_status`.
    fn upload(&self, url: &str, file_path: &Utf8Path, expected_status: u16) -> Result<()> {
        let upload = MultipartUpload::from_file(file_path)?;
        log::debug!("POST {url} ({} bytes)", upload.body.len());
        let request = self
            .agent
            .post(url)
            .header("Content-Type", upload.content_type.as_str());
        let response = self
            .with_api_key(request)
            .send(upload.body.as_slice())
            .map_err(|e| network_error(url, &e))?;
        expect_status(response, expected_status)
    }

    /// Attach the credential header when a key is configured.
    fn with_api_key<B>(&self, request: ureq::RequestBuilder<B>) -> ureq::RequestBuilder<B> {
        if self.api_key.is_empty() {
            request
        } else {
            request.header(API_KEY_HEADER, self.api_key.as_str())
        }
    }

    fn api_url(&self, segments: &[&str]) -> String {
        format!("{}/api/{}", self.host, segments.join("/"))
    }
}

/// Succeed on the expected status; otherwise surface the server's
/// diagnostic body.
fn expect_status(response: ureq::http::Response<ureq::Body>, expected: u16) -> Result<()> {
    let status = response.status().as_u16();
    if status == expected {
        return Ok(());
    }
    // The body is purely diagnostic here; an unreadable one degrades to
    // the bare status code.
    let body = response.into_body().read_to_string().unwrap_or_default();
    Err(DocatlError::RemoteRejected { status, body })
}

fn network_error(url: &str, err: &ureq::Error) -> DocatlError {
    DocatlError::Network {
        url: url.to_owned(),
        reason: err.to_string(),
    }
}

/// A `multipart/form-data` body holding one file under the
/// [`UPLOAD_FIELD_NAME`] field.
struct MultipartUpload {
    content_type: String,
    body: Vec<u8>,
}

impl MultipartUpload {
    fn from_file(file_path: &Utf8Path) -> Result<Self> {
        let contents = fs::read(file_path).map_err(|e| {
            DocatlError::invalid_input(format!(
                "upload file is not accessible locally at '{file_path}': {e}"
            ))
        })?;
        let file_name = file_path.file_name().unwrap_or(UPLOAD_FIELD_NAME);
        let boundary = fresh_boundary();

        let mut body = Vec::with_capacity(contents.len() + 256);
        body.extend_from_slice(
            format!(
                "--{boundary}\r\n\
                 Content-Disposition: form-data; name=\"{UPLOAD_FIELD_NAME}\"; \
                 filename=\"{file_name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&contents);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Ok(Self {
            content_type: format!("multipart/form-data; boundary={boundary}"),
            body,
        })
    }
}

/// A boundary that cannot collide with documentation content in
/// practice: a fixed prefix plus the current wall-clock nanoseconds.
fn fresh_boundary() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("----docatl-{nanos:032x}")
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
