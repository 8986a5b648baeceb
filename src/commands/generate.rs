use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use colored::Colorize;
use serde::Serialize;
use tracing::{info, warn};

use crate::changelog;
use crate::cli::GenerateArgs;
use crate::client::IssueTracker;
use crate::commands::{connect, resolve_version};
use crate::config::Config;
use crate::error::Result;
use crate::fetch::fetch_issues;
use crate::output;
use crate::query::build_jql;
use crate::render::ReleaseNoteDocument;
use crate::tagging::{apply_version_tag, ensure_fix_version, TagReport};
use crate::types::{Category, IssueRecord, Pagination};

/// Everything one release-notes run needs, resolved up front.
#[derive(Debug, Clone)]
pub struct ReleasePlan {
    pub jql: String,
    pub page_size: u32,
    pub pagination: Pagination,
    pub version: String,
    pub domain: String,
    pub date: NaiveDate,
    /// `None` for a dry run.
    pub output: Option<PathBuf>,
    pub tag: bool,
    /// Projects to create the version in before tagging.
    pub create_version_in: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ReleaseReport {
    pub version: String,
    pub total: usize,
    pub categories: BTreeMap<Category, Vec<IssueRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagging: Option<TagReport>,
    #[serde(skip)]
    pub document: String,
}

/// Fetch, render, persist and optionally tag. Returns `None` when the
/// search matched nothing, in which case nothing is written.
pub async fn generate<T: IssueTracker + ?Sized>(
    tracker: &T,
    plan: &ReleasePlan,
) -> Result<Option<ReleaseReport>> {
    for project in &plan.create_version_in {
        ensure_fix_version(tracker, project, &plan.version).await;
    }

    info!(jql = %plan.jql, pagination = %plan.pagination, "searching");
    let issues = fetch_issues(tracker, &plan.jql, plan.page_size, plan.pagination).await?;
    if issues.is_empty() {
        return Ok(None);
    }

    let document = ReleaseNoteDocument::new(issues.clone(), &plan.version, plan.date);
    let text = document.render(&plan.domain);

    if let Some(path) = &plan.output {
        changelog::persist(&text, path)?;
        info!(path = %path.display(), "release notes saved");
    }

    let tagging = if plan.tag {
        output::print_progress(&format!(
            "Setting fix version {} on {} issues...",
            plan.version,
            issues.len()
        ));
        Some(apply_version_tag(tracker, &issues, &plan.version).await)
    } else {
        None
    };

    Ok(Some(ReleaseReport {
        version: plan.version.clone(),
        total: document.total(),
        categories: document.categorized_issues,
        output: plan.output.clone(),
        tagging,
        document: text,
    }))
}

pub async fn run(config: &Config, args: GenerateArgs) -> Result<()> {
    let (settings, client) = connect(config)?;
    let query = config.query_settings(&args.query.overrides());
    let version = resolve_version(config, &args.version);

    let tag = args.tag && !args.dry_run;
    let create_version_in = if args.create_version && !args.dry_run {
        if query.projects.is_empty() {
            warn!("--create-version needs explicit projects; skipping version creation");
        }
        query.projects.clone()
    } else {
        Vec::new()
    };

    let plan = ReleasePlan {
        jql: build_jql(&query),
        page_size: query.page_size,
        pagination: query.pagination,
        version,
        domain: settings.browse_domain().to_string(),
        date: Local::now().date_naive(),
        output: (!args.dry_run).then(|| config.resolve_output(args.output.as_deref())),
        tag,
        create_version_in,
    };

    output::print_progress(&format!("Release version: {}", plan.version.bold()));
    output::print_progress(&format!("JQL: {}", plan.jql));

    let Some(report) = generate(&client, &plan).await? else {
        output::print_message("No issues found matching the criteria.");
        return Ok(());
    };

    output::print_item(&report, |report| {
        println!("{}", report.document);
    });

    if let Some(path) = &report.output {
        output::print_message(&format!(
            "Release notes saved to {} ({} issues)",
            path.display(),
            report.total
        ));
    }
    if let Some(tagging) = &report.tagging {
        output::print_message(&format!(
            "Fix version update complete: {} succeeded, {} failed",
            tagging.success_count, tagging.fail_count
        ));
    }

    Ok(())
}
