use serde::{Deserialize, Serialize};

/// One ticket as returned by a Jira search, flattened from the `fields` object.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct IssueRecord {
    pub key: String,
    pub summary: String,
    #[serde(rename = "issueType")]
    pub issue_type: String,
    #[serde(rename = "projectKey")]
    pub project_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

impl IssueRecord {
    #[cfg(test)]
    pub fn new(key: &str, summary: &str, issue_type: &str) -> Self {
        let project_key = key.split_once('-').map(|(p, _)| p).unwrap_or(key);
        Self {
            key: key.to_string(),
            summary: summary.to_string(),
            issue_type: issue_type.to_string(),
            project_key: project_key.to_string(),
            status: None,
            created: None,
            updated: None,
        }
    }

    /// Browse link for this issue under the given Jira domain.
    pub fn browse_url(&self, domain: &str) -> String {
        format!("{}/browse/{}", domain.trim_end_matches('/'), self.key)
    }
}
