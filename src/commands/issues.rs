use std::path::Path;

use tabled::Tabled;

use crate::cli::IssuesArgs;
use crate::commands::connect;
use crate::config::Config;
use crate::error::{ReleaseNotesError, Result};
use crate::fetch::fetch_issues;
use crate::output::{self, format_date_only, truncate};
use crate::query::build_jql;
use crate::types::{Category, IssueRecord};

#[derive(Tabled)]
struct IssueRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Project")]
    project: String,
    #[tabled(rename = "Type")]
    issue_type: String,
    #[tabled(rename = "Section")]
    section: String,
    #[tabled(rename = "Summary")]
    summary: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&IssueRecord> for IssueRow {
    fn from(issue: &IssueRecord) -> Self {
        Self {
            key: issue.key.clone(),
            project: issue.project_key.clone(),
            issue_type: issue.issue_type.clone(),
            section: Category::from_issue_type(&issue.issue_type).colored(),
            summary: truncate(&issue.summary, 60),
            created: issue
                .created
                .as_deref()
                .map(format_date_only)
                .unwrap_or_default(),
        }
    }
}

/// Save fetched issues as pretty JSON for inspection.
pub fn save_snapshot(issues: &[IssueRecord], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(issues)?;
    std::fs::write(path, json).map_err(|e| ReleaseNotesError::SnapshotWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

pub async fn list(config: &Config, args: IssuesArgs) -> Result<()> {
    let (_, client) = connect(config)?;
    let query = config.query_settings(&args.query.overrides());
    let jql = build_jql(&query);
    output::print_progress(&format!("JQL: {jql}"));

    let issues = fetch_issues(&client, &jql, query.page_size, query.pagination).await?;

    if let Some(path) = &args.snapshot {
        save_snapshot(&issues, path)?;
        output::print_progress(&format!("Saved {} issues to {}", issues.len(), path.display()));
    }

    if issues.is_empty() && !output::is_json_output() {
        output::print_message("No issues found matching the criteria.");
        return Ok(());
    }

    output::print_table(&issues, |issue| IssueRow::from(issue));
    Ok(())
}
