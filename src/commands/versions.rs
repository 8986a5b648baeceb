use serde_json::json;

use crate::cli::{CreateVersionArgs, VersionArgs};
use crate::commands::{connect, resolve_version};
use crate::config::{Config, Overrides};
use crate::error::{ReleaseNotesError, Result};
use crate::output;
use crate::tagging::ensure_fix_version;

pub async fn create(config: &Config, args: CreateVersionArgs) -> Result<()> {
    let projects = config
        .query_settings(&Overrides {
            projects: args.projects,
            ..Default::default()
        })
        .projects;
    if projects.is_empty() {
        return Err(ReleaseNotesError::NoProjects);
    }

    let (_, client) = connect(config)?;
    let version = resolve_version(config, &args.version);
    output::print_progress(&format!("Creating fix version {version}..."));

    let mut ready = 0;
    for project in &projects {
        if ensure_fix_version(&client, project, &version).await {
            ready += 1;
        }
    }

    output::print_message(&format!(
        "Fix version {version} ready in {ready} of {} projects",
        projects.len()
    ));
    Ok(())
}

pub fn show(config: &Config, args: &VersionArgs) {
    let version = resolve_version(config, args);
    output::print_item(&json!({ "version": version }), |_| println!("{version}"));
}
