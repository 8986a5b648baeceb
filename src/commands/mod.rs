pub mod generate;
pub mod init;
pub mod issues;
pub mod versions;

use crate::cli::VersionArgs;
use crate::client::JiraClient;
use crate::config::{Config, JiraSettings, ProcessEnv};
use crate::error::Result;
use crate::version_source;

/// Resolve credentials and build the client. Fails before any request when
/// a required setting is missing.
pub fn connect(config: &Config) -> Result<(JiraSettings, JiraClient)> {
    let settings = config.jira_settings(&ProcessEnv)?;
    let client = JiraClient::new(&settings)?;
    Ok((settings, client))
}

/// Explicit `--version`, otherwise the version file, otherwise "unknown".
pub fn resolve_version(config: &Config, args: &VersionArgs) -> String {
    match args.release_version.as_deref().map(str::trim) {
        Some(version) if !version.is_empty() => version.to_string(),
        _ => version_source::read_version(&config.resolve_version_file(args.version_file.as_deref())),
    }
}
