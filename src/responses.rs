//! Jira REST wire types shared by the client and the fetcher.

use serde::{Deserialize, Serialize};

use crate::types::IssueRecord;

/// Fields requested on every search.
pub const SEARCH_FIELDS: [&str; 6] = [
    "summary",
    "issuetype",
    "project",
    "status",
    "created",
    "updated",
];

/// Body of a search request. Exactly one of `start_at` and
/// `next_page_token` is meaningful, depending on the endpoint.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub jql: String,
    pub fields: Vec<&'static str>,
    pub max_results: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// One page of search results. Offset endpoints fill `total`, token
/// endpoints fill `is_last` and `next_page_token`.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub issues: Vec<RawIssue>,
    pub total: Option<u64>,
    pub is_last: Option<bool>,
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub warning_messages: Vec<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawIssue {
    pub key: String,
    #[serde(default)]
    pub fields: RawFields,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawFields {
    pub summary: Option<String>,
    pub issuetype: Option<NamedRef>,
    pub project: Option<KeyRef>,
    pub status: Option<NamedRef>,
    pub created: Option<String>,
    pub updated: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NamedRef {
    pub name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct KeyRef {
    pub key: String,
}

impl From<RawIssue> for IssueRecord {
    fn from(raw: RawIssue) -> Self {
        let fields = raw.fields;
        Self {
            summary: fields.summary.unwrap_or_default(),
            issue_type: fields.issuetype.map(|t| t.name).unwrap_or_default(),
            project_key: fields.project.map(|p| p.key).unwrap_or_default(),
            status: fields.status.map(|s| s.name),
            created: fields.created,
            updated: fields.updated,
            key: raw.key,
        }
    }
}

/// Body of an issue edit setting its fix version.
#[derive(Serialize, Debug)]
pub struct FixVersionUpdate<'a> {
    pub fields: FixVersionFields<'a>,
}

#[derive(Serialize, Debug)]
pub struct FixVersionFields<'a> {
    #[serde(rename = "fixVersions")]
    pub fix_versions: [VersionName<'a>; 1],
}

#[derive(Serialize, Debug)]
pub struct VersionName<'a> {
    pub name: &'a str,
}

impl<'a> FixVersionUpdate<'a> {
    pub fn new(version: &'a str) -> Self {
        Self {
            fields: FixVersionFields {
                fix_versions: [VersionName { name: version }],
            },
        }
    }
}

/// Body of a version create call.
#[derive(Serialize, Debug)]
pub struct CreateVersion<'a> {
    pub name: &'a str,
    pub project: &'a str,
}

/// Jira's error envelope, used to make rejections readable.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub error_messages: Vec<String>,
    #[serde(default)]
    pub errors: serde_json::Map<String, serde_json::Value>,
}

impl ErrorBody {
    /// Flatten the envelope into one line, falling back to the raw body.
    pub fn summarize(raw: &str) -> String {
        let Ok(body) = serde_json::from_str::<ErrorBody>(raw) else {
            return raw.trim().to_string();
        };
        let mut parts = body.error_messages;
        parts.extend(body.errors.iter().map(|(field, msg)| match msg.as_str() {
            Some(text) => format!("{field}: {text}"),
            None => format!("{field}: {msg}"),
        }));
        if parts.is_empty() {
            raw.trim().to_string()
        } else {
            parts.join("; ")
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_token_page_decodes() {
        let body = json!({
            "issues": [{
                "key": "EN-1",
                "fields": {
                    "summary": "Fix crash",
                    "issuetype": { "name": "Bug" },
                    "project": { "key": "EN" },
                    "status": { "name": "Done" },
                    "created": "2025-01-02T10:00:00.000+0000"
                }
            }],
            "isLast": false,
            "nextPageToken": "abc"
        });
        let page: SearchPage = serde_json::from_value(body).unwrap();
        assert_eq!(page.is_last, Some(false));
        assert_eq!(page.next_page_token.as_deref(), Some("abc"));
        assert_eq!(page.total, None);

        let issue: IssueRecord = page.issues[0].clone().into();
        assert_eq!(issue.key, "EN-1");
        assert_eq!(issue.issue_type, "Bug");
        assert_eq!(issue.project_key, "EN");
        assert_eq!(issue.status.as_deref(), Some("Done"));
        assert_eq!(issue.updated, None);
    }

    #[test]
    fn test_sparse_issue_decodes() {
        let page: SearchPage =
            serde_json::from_value(json!({ "issues": [{ "key": "EN-9" }], "total": 1 })).unwrap();
        let issue: IssueRecord = page.issues[0].clone().into();
        assert_eq!(issue.summary, "");
        assert_eq!(issue.issue_type, "");
        assert_eq!(page.total, Some(1));
    }

    #[test]
    fn test_request_skips_absent_cursor() {
        let request = SearchRequest {
            jql: "status = Done".into(),
            fields: SEARCH_FIELDS.to_vec(),
            max_results: 50,
            start_at: None,
            next_page_token: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["maxResults"], 50);
        assert!(value.get("nextPageToken").is_none());
        assert!(value.get("startAt").is_none());
    }

    #[test]
    fn test_fix_version_body() {
        let value = serde_json::to_value(FixVersionUpdate::new("1.2.3")).unwrap();
        assert_eq!(value, json!({ "fields": { "fixVersions": [{ "name": "1.2.3" }] } }));
    }

    #[test]
    fn test_error_summary() {
        let raw = r#"{"errorMessages":["Bad JQL"],"errors":{"jql":"unexpected token"}}"#;
        assert_eq!(ErrorBody::summarize(raw), "Bad JQL; jql: unexpected token");
        assert_eq!(ErrorBody::summarize("<html>gateway</html>"), "<html>gateway</html>");
    }
}
