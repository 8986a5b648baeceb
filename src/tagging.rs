//! Fix-version tagging of released issues.

use colored::Colorize;
use serde::Serialize;
use tracing::warn;

use crate::client::{IssueTracker, VersionStatus};
use crate::output;
use crate::types::IssueRecord;

/// Per-run tally of fix-version updates.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct TagReport {
    pub success_count: usize,
    pub fail_count: usize,
    /// Failed issue keys with the reason reported by the tracker.
    pub failures: Vec<(String, String)>,
}

/// Set the fix version on every issue. A failed update is counted and the
/// remaining issues are still attempted.
pub async fn apply_version_tag<T: IssueTracker + ?Sized>(
    tracker: &T,
    issues: &[IssueRecord],
    version: &str,
) -> TagReport {
    let mut report = TagReport::default();

    for issue in issues {
        match tracker.set_fix_version(&issue.key, version).await {
            Ok(()) => {
                output::print_progress(&format!("  {} {}", "✓".green(), issue.key));
                report.success_count += 1;
            }
            Err(e) => {
                warn!(key = %issue.key, "fix version update failed: {e}");
                output::print_progress(&format!("  {} {}: {e}", "✗".red(), issue.key));
                report.fail_count += 1;
                report.failures.push((issue.key.clone(), e.to_string()));
            }
        }
    }

    report
}

/// Make sure `version` exists in `project`. Returns false, after logging,
/// when the tracker refuses.
pub async fn ensure_fix_version<T: IssueTracker + ?Sized>(
    tracker: &T,
    project: &str,
    version: &str,
) -> bool {
    match tracker.create_version(project, version).await {
        Ok(VersionStatus::Created) => {
            output::print_progress(&format!("  {} created {version} in {project}", "✓".green()));
            true
        }
        Ok(VersionStatus::AlreadyExists) => {
            output::print_progress(&format!(
                "  {} {version} already exists in {project}",
                "✓".green()
            ));
            true
        }
        Err(e) => {
            warn!(%project, %version, "fix version create failed: {e}");
            output::print_progress(&format!("  {} {project}: {e}", "✗".red()));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::FakeTracker;

    fn issues(n: usize) -> Vec<IssueRecord> {
        (1..=n)
            .map(|i| IssueRecord::new(&format!("EN-{i}"), "summary", "Task"))
            .collect()
    }

    #[tokio::test]
    async fn test_one_failure_does_not_stop_batch() {
        let tracker = FakeTracker {
            failing_keys: vec!["EN-2".into()],
            ..Default::default()
        };

        let report = apply_version_tag(&tracker, &issues(5), "1.2.3").await;

        assert_eq!(report.success_count, 4);
        assert_eq!(report.fail_count, 1);
        assert_eq!(report.failures[0].0, "EN-2");
        let updates = tracker.updates.lock().unwrap();
        assert_eq!(updates.len(), 5);
        assert!(updates.iter().all(|(_, v)| v == "1.2.3"));
        assert_eq!(updates[4].0, "EN-5");
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let tracker = FakeTracker::default();
        let report = apply_version_tag(&tracker, &[], "1.2.3").await;
        assert_eq!(report, TagReport::default());
    }

    #[tokio::test]
    async fn test_existing_version_counts_as_ensured() {
        let tracker = FakeTracker {
            existing_projects: vec!["EN".into()],
            ..Default::default()
        };

        assert!(ensure_fix_version(&tracker, "EN", "1.2.3").await);
        assert!(ensure_fix_version(&tracker, "BF", "1.2.3").await);
        assert!(!ensure_fix_version(&tracker, "MISSING", "1.2.3").await);
        assert_eq!(tracker.created_versions.lock().unwrap().len(), 3);
    }
}
