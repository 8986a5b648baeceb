use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::JiraSettings;
use crate::error::{ReleaseNotesError, Result};
use crate::responses::{CreateVersion, ErrorBody, FixVersionUpdate, SearchPage, SearchRequest};
use crate::types::Pagination;

/// Header Jira uses to report a failed login, even on a 200 response.
const LOGIN_REASON_HEADER: &str = "x-seraph-loginreason";
const LOGIN_FAILURE_MARKERS: [&str; 2] = ["AUTHENTICATED_FAILED", "AUTHENTICATION_DENIED"];

/// Outcome of ensuring a fix version exists in a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionStatus {
    Created,
    AlreadyExists,
}

/// The remote calls the release pipeline needs from an issue tracker.
#[async_trait]
pub trait IssueTracker {
    /// Fetch one page of search results.
    async fn search(&self, pagination: Pagination, request: &SearchRequest) -> Result<SearchPage>;

    /// Set the fix version of a single issue.
    async fn set_fix_version(&self, key: &str, version: &str) -> Result<()>;

    /// Create a version in a project.
    async fn create_version(&self, project: &str, version: &str) -> Result<VersionStatus>;
}

pub struct JiraClient {
    http: Client,
    base: String,
    email: String,
    api_token: String,
}

impl JiraClient {
    pub fn new(settings: &JiraSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ReleaseNotesError::Transport {
                endpoint: settings.domain.to_string(),
                source: e,
            })?;

        Ok(Self {
            http,
            base: settings.browse_domain().to_string(),
            email: settings.email.clone(),
            api_token: settings.api_token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    /// Send a JSON request and return status and body, after ruling out
    /// transport and authentication failures.
    async fn send<B: Serialize + ?Sized>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
        body: &B,
    ) -> Result<(StatusCode, String, String)> {
        let request_body = serde_json::to_string(body)?;
        debug!(%endpoint, body = %request_body, "sending request");

        let response = request
            .basic_auth(&self.email, Some(&self.api_token))
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ReleaseNotesError::Transport {
                endpoint: endpoint.to_string(),
                source: e,
            })?;

        let status = response.status();
        debug!(%endpoint, status = status.as_u16(), "received response");

        if let Some(reason) = login_failure(response.headers()) {
            return Err(ReleaseNotesError::Auth {
                endpoint: endpoint.to_string(),
                reason,
            });
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ReleaseNotesError::Auth {
                endpoint: endpoint.to_string(),
                reason: format!("HTTP {}", status.as_u16()),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ReleaseNotesError::Transport {
                endpoint: endpoint.to_string(),
                source: e,
            })?;

        Ok((status, text, request_body))
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn search(&self, pagination: Pagination, request: &SearchRequest) -> Result<SearchPage> {
        let endpoint = self.endpoint(pagination.search_path());
        let (status, body, request_body) = self
            .send(self.http.post(&endpoint), &endpoint, request)
            .await?;

        if !status.is_success() {
            return Err(ReleaseNotesError::Api {
                endpoint,
                status: status.as_u16(),
                request_body,
                response_body: ErrorBody::summarize(&body),
            });
        }

        let page = decode_page(&endpoint, &request_body, &body)?;
        for message in &page.warning_messages {
            warn!(%endpoint, "Jira warning: {message}");
        }
        Ok(page)
    }

    async fn set_fix_version(&self, key: &str, version: &str) -> Result<()> {
        let endpoint = self.endpoint(&format!("rest/api/3/issue/{key}"));
        let (status, body, _) = self
            .send(self.http.put(&endpoint), &endpoint, &FixVersionUpdate::new(version))
            .await?;

        if status.is_success() {
            Ok(())
        } else {
            Err(ReleaseNotesError::UpdateFailed {
                key: key.to_string(),
                status: status.as_u16(),
                message: ErrorBody::summarize(&body),
            })
        }
    }

    async fn create_version(&self, project: &str, version: &str) -> Result<VersionStatus> {
        let endpoint = self.endpoint("rest/api/3/version");
        let request = CreateVersion {
            name: version,
            project,
        };
        let (status, body, _) = self
            .send(self.http.post(&endpoint), &endpoint, &request)
            .await?;

        if status.is_success() {
            return Ok(VersionStatus::Created);
        }

        let message = ErrorBody::summarize(&body);
        if is_duplicate_version(&message) {
            Ok(VersionStatus::AlreadyExists)
        } else {
            Err(ReleaseNotesError::VersionCreateFailed {
                project: project.to_string(),
                version: version.to_string(),
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Read the login-failure marker Jira attaches to otherwise successful responses.
pub fn login_failure(headers: &HeaderMap) -> Option<String> {
    let reason = headers.get(LOGIN_REASON_HEADER)?.to_str().ok()?.trim();
    LOGIN_FAILURE_MARKERS
        .iter()
        .any(|marker| reason.eq_ignore_ascii_case(marker))
        .then(|| reason.to_string())
}

fn decode_page(endpoint: &str, request_body: &str, body: &str) -> Result<SearchPage> {
    serde_json::from_str(body).map_err(|e| ReleaseNotesError::Protocol {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
        request_body: request_body.to_string(),
        response_body: body.to_string(),
    })
}

fn is_duplicate_version(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("already exists") || lower.contains("duplicate")
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    #[test]
    fn test_login_failure_marker_detected() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-seraph-loginreason",
            HeaderValue::from_static("AUTHENTICATED_FAILED"),
        );
        assert_eq!(login_failure(&headers).as_deref(), Some("AUTHENTICATED_FAILED"));
    }

    #[test]
    fn test_login_ok_is_not_failure() {
        let mut headers = HeaderMap::new();
        headers.insert("x-seraph-loginreason", HeaderValue::from_static("OK"));
        assert_eq!(login_failure(&headers), None);
        assert_eq!(login_failure(&HeaderMap::new()), None);
    }

    #[test]
    fn test_undecodable_body_is_protocol_error() {
        let err = decode_page("https://x/rest/api/3/search/jql", "{}", "<html>").unwrap_err();
        match err {
            ReleaseNotesError::Protocol { response_body, .. } => {
                assert_eq!(response_body, "<html>")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_version_messages() {
        assert!(is_duplicate_version(
            "name: A version with this name already exists in this project."
        ));
        assert!(is_duplicate_version("Duplicate version"));
        assert!(!is_duplicate_version("project: Project does not exist"));
    }

    #[test]
    fn test_endpoint_keeps_context_path() {
        let settings = JiraSettings {
            domain: "https://jira.example.com/jira/".parse().unwrap(),
            email: "me@example.com".into(),
            api_token: "t".into(),
            timeout: std::time::Duration::from_secs(5),
        };
        let client = JiraClient::new(&settings).unwrap();
        assert_eq!(
            client.endpoint(Pagination::Offset.search_path()),
            "https://jira.example.com/jira/rest/api/2/search"
        );
    }
}
