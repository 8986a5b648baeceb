//! Paginated search over all result pages.

use tracing::{debug, info, warn};

use crate::client::IssueTracker;
use crate::error::Result;
use crate::responses::{SearchRequest, SEARCH_FIELDS};
use crate::types::{IssueRecord, Pagination};

/// Fetch every issue matching `jql`, walking pages until the server signals
/// the end. Any failed page aborts the whole fetch.
pub async fn fetch_issues<T: IssueTracker + ?Sized>(
    tracker: &T,
    jql: &str,
    page_size: u32,
    pagination: Pagination,
) -> Result<Vec<IssueRecord>> {
    let mut request = SearchRequest {
        jql: jql.to_string(),
        fields: SEARCH_FIELDS.to_vec(),
        max_results: page_size,
        start_at: None,
        next_page_token: None,
    };
    if pagination == Pagination::Offset {
        request.start_at = Some(0);
    }

    let mut issues: Vec<IssueRecord> = Vec::new();
    let mut page_number = 0usize;

    loop {
        let page = tracker.search(pagination, &request).await?;
        page_number += 1;

        let received = page.issues.len();
        issues.extend(page.issues.into_iter().map(IssueRecord::from));
        debug!(page = page_number, received, total = issues.len(), "fetched page");

        if received == 0 {
            if page_number == 1 {
                warn!("first page was empty: no matching issues, or the credentials lack access");
            }
            break;
        }

        match pagination {
            Pagination::Offset => {
                let fetched = issues.len() as u64;
                match page.total {
                    Some(total) if fetched >= total => break,
                    None if received < page_size as usize => break,
                    _ => request.start_at = Some(fetched),
                }
            }
            Pagination::Token => {
                if page.is_last.unwrap_or(true) {
                    break;
                }
                match page.next_page_token {
                    Some(token) => request.next_page_token = Some(token),
                    None => break,
                }
            }
        }
    }

    info!(pages = page_number, issues = issues.len(), "search complete");
    Ok(issues)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::client::{IssueTracker, VersionStatus};
    use crate::error::{ReleaseNotesError, Result};
    use crate::responses::{SearchPage, SearchRequest};
    use crate::types::Pagination;

    /// In-memory tracker replaying canned pages and recording every call.
    #[derive(Default)]
    pub struct FakeTracker {
        pub pages: Mutex<VecDeque<Result<SearchPage>>>,
        pub requests: Mutex<Vec<SearchRequest>>,
        pub updates: Mutex<Vec<(String, String)>>,
        pub failing_keys: Vec<String>,
        pub created_versions: Mutex<Vec<(String, String)>>,
        pub existing_projects: Vec<String>,
    }

    impl FakeTracker {
        pub fn with_pages(pages: Vec<SearchPage>) -> Self {
            Self {
                pages: Mutex::new(pages.into_iter().map(Ok).collect()),
                ..Default::default()
            }
        }

        pub fn push_error(&self, err: ReleaseNotesError) {
            self.pages.lock().unwrap().push_back(Err(err));
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    pub fn issue_json(key: &str, summary: &str, issue_type: &str) -> serde_json::Value {
        json!({
            "key": key,
            "fields": {
                "summary": summary,
                "issuetype": { "name": issue_type },
                "project": { "key": key.split('-').next().unwrap_or(key) }
            }
        })
    }

    pub fn page(issues: Vec<serde_json::Value>, extra: serde_json::Value) -> SearchPage {
        let mut body = json!({ "issues": issues });
        if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            body.extend(extra.clone());
        }
        serde_json::from_value(body).unwrap()
    }

    pub fn numbered(range: std::ops::Range<usize>) -> Vec<serde_json::Value> {
        range
            .map(|n| issue_json(&format!("EN-{n}"), &format!("Issue {n}"), "Task"))
            .collect()
    }

    #[async_trait]
    impl IssueTracker for FakeTracker {
        async fn search(&self, _pagination: Pagination, request: &SearchRequest) -> Result<SearchPage> {
            self.requests.lock().unwrap().push(request.clone());
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("unexpected request #{}", self.request_count()))
        }

        async fn set_fix_version(&self, key: &str, version: &str) -> Result<()> {
            self.updates
                .lock()
                .unwrap()
                .push((key.to_string(), version.to_string()));
            if self.failing_keys.iter().any(|k| k == key) {
                return Err(ReleaseNotesError::UpdateFailed {
                    key: key.to_string(),
                    status: 400,
                    message: "Field 'fixVersions' cannot be set".into(),
                });
            }
            Ok(())
        }

        async fn create_version(&self, project: &str, version: &str) -> Result<VersionStatus> {
            self.created_versions
                .lock()
                .unwrap()
                .push((project.to_string(), version.to_string()));
            if self.existing_projects.iter().any(|p| p == project) {
                return Ok(VersionStatus::AlreadyExists);
            }
            if project == "MISSING" {
                return Err(ReleaseNotesError::VersionCreateFailed {
                    project: project.to_string(),
                    version: version.to_string(),
                    status: 404,
                    message: "project: Project does not exist".into(),
                });
            }
            Ok(VersionStatus::Created)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::testing::{issue_json, numbered, page, FakeTracker};
    use super::*;
    use crate::error::ReleaseNotesError;

    #[tokio::test]
    async fn test_offset_stops_when_total_reached() {
        let tracker = FakeTracker::with_pages(vec![
            page(numbered(0..2), json!({ "total": 5 })),
            page(numbered(2..4), json!({ "total": 5 })),
            page(numbered(4..5), json!({ "total": 5 })),
        ]);

        let issues = fetch_issues(&tracker, "status = Done", 2, Pagination::Offset)
            .await
            .unwrap();

        assert_eq!(issues.len(), 5);
        assert_eq!(issues[4].key, "EN-4");
        let requests = tracker.requests.lock().unwrap();
        let offsets: Vec<_> = requests.iter().map(|r| r.start_at).collect();
        assert_eq!(offsets, vec![Some(0), Some(2), Some(4)]);
        assert!(requests.iter().all(|r| r.next_page_token.is_none()));
    }

    #[tokio::test]
    async fn test_offset_stops_on_empty_page_despite_total() {
        let tracker = FakeTracker::with_pages(vec![
            page(numbered(0..2), json!({ "total": 10 })),
            page(vec![], json!({ "total": 10 })),
        ]);

        let issues = fetch_issues(&tracker, "x", 2, Pagination::Offset).await.unwrap();

        assert_eq!(issues.len(), 2);
        assert_eq!(tracker.request_count(), 2);
    }

    #[tokio::test]
    async fn test_offset_without_total_stops_on_short_page() {
        let tracker = FakeTracker::with_pages(vec![
            page(numbered(0..3), json!({})),
            page(numbered(3..4), json!({})),
        ]);

        let issues = fetch_issues(&tracker, "x", 3, Pagination::Offset).await.unwrap();

        assert_eq!(issues.len(), 4);
        assert_eq!(tracker.request_count(), 2);
    }

    #[tokio::test]
    async fn test_token_follows_cursor_until_last() {
        let tracker = FakeTracker::with_pages(vec![
            page(numbered(0..2), json!({ "isLast": false, "nextPageToken": "p2" })),
            page(numbered(2..4), json!({ "isLast": false, "nextPageToken": "p3" })),
            page(numbered(4..5), json!({ "isLast": true })),
        ]);

        let issues = fetch_issues(&tracker, "x", 2, Pagination::Token).await.unwrap();

        assert_eq!(issues.len(), 5);
        let requests = tracker.requests.lock().unwrap();
        let tokens: Vec<_> = requests.iter().map(|r| r.next_page_token.clone()).collect();
        assert_eq!(tokens, vec![None, Some("p2".into()), Some("p3".into())]);
        assert!(requests.iter().all(|r| r.start_at.is_none()));
    }

    #[tokio::test]
    async fn test_token_stops_when_token_missing() {
        let tracker = FakeTracker::with_pages(vec![page(numbered(0..2), json!({ "isLast": false }))]);

        let issues = fetch_issues(&tracker, "x", 2, Pagination::Token).await.unwrap();

        assert_eq!(issues.len(), 2);
        assert_eq!(tracker.request_count(), 1);
    }

    #[tokio::test]
    async fn test_token_stops_on_empty_page_despite_token() {
        let tracker = FakeTracker::with_pages(vec![
            page(numbered(0..2), json!({ "isLast": false, "nextPageToken": "p2" })),
            page(vec![], json!({ "isLast": false, "nextPageToken": "p3" })),
        ]);

        let issues = fetch_issues(&tracker, "x", 2, Pagination::Token).await.unwrap();

        assert_eq!(issues.len(), 2);
        assert_eq!(tracker.request_count(), 2);
    }

    #[tokio::test]
    async fn test_missing_is_last_treated_as_last() {
        let tracker = FakeTracker::with_pages(vec![page(
            vec![issue_json("EN-1", "Fix crash", "Bug")],
            json!({ "nextPageToken": "ignored" }),
        )]);

        let issues = fetch_issues(&tracker, "x", 50, Pagination::Token).await.unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(tracker.request_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_page_aborts_fetch() {
        let tracker = FakeTracker::with_pages(vec![page(
            numbered(0..2),
            json!({ "isLast": false, "nextPageToken": "p2" }),
        )]);
        tracker.push_error(ReleaseNotesError::Auth {
            endpoint: "https://x/rest/api/3/search/jql".into(),
            reason: "AUTHENTICATED_FAILED".into(),
        });

        let err = fetch_issues(&tracker, "x", 2, Pagination::Token)
            .await
            .unwrap_err();

        assert!(matches!(err, ReleaseNotesError::Auth { .. }));
    }

    #[tokio::test]
    async fn test_request_carries_filter_and_fields() {
        let tracker = FakeTracker::with_pages(vec![page(vec![], json!({ "isLast": true }))]);

        let issues = fetch_issues(&tracker, "status = \"Done\"", 100, Pagination::Token)
            .await
            .unwrap();

        assert!(issues.is_empty());
        let requests = tracker.requests.lock().unwrap();
        assert_eq!(requests[0].jql, "status = \"Done\"");
        assert_eq!(requests[0].max_results, 100);
        assert!(requests[0].fields.contains(&"issuetype"));
    }
}
