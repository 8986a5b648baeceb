//! Markdown rendering of grouped release notes.

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::NaiveDate;

use crate::types::{Category, IssueRecord};

/// Release notes for one version, grouped by category.
#[derive(Debug, Clone)]
pub struct ReleaseNoteDocument {
    pub version_label: String,
    pub generated_at: NaiveDate,
    /// Each bucket keeps fetch order.
    pub categorized_issues: BTreeMap<Category, Vec<IssueRecord>>,
}

impl ReleaseNoteDocument {
    pub fn new(issues: Vec<IssueRecord>, version_label: &str, generated_at: NaiveDate) -> Self {
        let mut categorized_issues: BTreeMap<Category, Vec<IssueRecord>> = BTreeMap::new();
        for issue in issues {
            categorized_issues
                .entry(Category::from_issue_type(&issue.issue_type))
                .or_default()
                .push(issue);
        }

        Self {
            version_label: version_label.to_string(),
            generated_at,
            categorized_issues,
        }
    }

    pub fn total(&self) -> usize {
        self.categorized_issues.values().map(Vec::len).sum()
    }

    /// Render as markdown, linking each key under `domain`.
    pub fn render(&self, domain: &str) -> String {
        let version = self.version_label.trim();
        let version = version.strip_prefix('v').unwrap_or(version);

        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(out, "# Release Notes - v{version}");
        out.push('\n');
        let _ = writeln!(out, "**Release Date:** {}", self.generated_at.format("%Y-%m-%d"));
        let _ = writeln!(out, "**Total Changes:** {}", self.total());
        out.push('\n');
        out.push_str("---\n\n");

        for category in Category::ALL {
            let Some(issues) = self.categorized_issues.get(&category) else {
                continue;
            };
            if issues.is_empty() {
                continue;
            }
            let _ = writeln!(out, "## {category}");
            out.push('\n');
            for issue in issues {
                let _ = writeln!(
                    out,
                    "- [{}]({}): {}",
                    issue.key,
                    issue.browse_url(domain),
                    issue.summary.trim()
                );
            }
            out.push('\n');
        }

        while out.ends_with("\n\n") {
            out.pop();
        }
        out
    }
}
