use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use url::Url;

use crate::error::{ReleaseNotesError, Result};
use crate::types::Pagination;

pub const DEFAULT_STATUS: &str = "Done";
pub const DEFAULT_ORDER_BY: &str = "issuetype ASC";
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_OUTPUT: &str = "RELEASE_NOTES.md";
pub const DEFAULT_VERSION_FILE: &str = "Chart.yaml";

/// Contents of `config.toml`. Every key is optional.
#[derive(Deserialize, Default, Debug)]
pub struct Config {
    pub domain: Option<String>,
    pub email: Option<String>,
    pub api_token: Option<String>,
    pub projects: Option<Vec<String>>,
    pub status: Option<String>,
    pub require_empty_fix_version: Option<bool>,
    pub order_by: Option<String>,
    pub page_size: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub pagination: Option<Pagination>,
    pub output: Option<PathBuf>,
    pub version_file: Option<PathBuf>,
}

/// Credentials and transport settings, validated once and handed to the client.
#[derive(Debug, Clone)]
pub struct JiraSettings {
    pub domain: Url,
    pub email: String,
    pub api_token: String,
    pub timeout: Duration,
}

impl JiraSettings {
    /// Domain without a trailing slash, for building browse links.
    pub fn browse_domain(&self) -> &str {
        self.domain.as_str().trim_end_matches('/')
    }
}

/// Filter parameters for the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySettings {
    pub projects: Vec<String>,
    pub status: String,
    pub require_empty_fix_version: bool,
    pub order_by: String,
    pub raw_jql: Option<String>,
    pub page_size: u32,
    pub pagination: Pagination,
}

/// Values from the command line, which win over the environment and the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub projects: Vec<String>,
    pub status: Option<String>,
    pub include_versioned: bool,
    pub order_by: Option<String>,
    pub jql: Option<String>,
    pub page_size: Option<u32>,
    pub pagination: Option<Pagination>,
}

/// Source of environment lookups, swapped out in tests.
pub trait Env {
    fn var(&self, name: &str) -> Option<String>;
}

pub struct ProcessEnv;

impl Env for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.trim().is_empty())
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(config_path).map_err(|e| ReleaseNotesError::ConfigRead {
                path: config_path.to_path_buf(),
                source: e,
            })?;

        toml::from_str(&contents).map_err(|e| ReleaseNotesError::ConfigParse {
            path: config_path.to_path_buf(),
            source: e,
        })
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "jira-release-notes")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(ReleaseNotesError::NoConfigDir)
    }

    /// Resolve credentials with env vars taking precedence over the config file.
    pub fn jira_settings(&self, env: &dyn Env) -> Result<JiraSettings> {
        let domain = env
            .var("JIRA_DOMAIN")
            .or_else(|| self.domain.clone())
            .ok_or(ReleaseNotesError::MissingSetting {
                name: "domain",
                env: "JIRA_DOMAIN",
            })?;
        let email = env
            .var("JIRA_EMAIL")
            .or_else(|| self.email.clone())
            .ok_or(ReleaseNotesError::MissingSetting {
                name: "email",
                env: "JIRA_EMAIL",
            })?;
        let api_token = env
            .var("JIRA_API_TOKEN")
            .or_else(|| self.api_token.clone())
            .ok_or(ReleaseNotesError::MissingSetting {
                name: "api_token",
                env: "JIRA_API_TOKEN",
            })?;

        Ok(JiraSettings {
            domain: parse_domain(&domain)?,
            email,
            api_token,
            timeout: Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }

    /// Merge command-line overrides with the file into the search parameters.
    pub fn query_settings(&self, overrides: &Overrides) -> QuerySettings {
        let projects = if overrides.projects.is_empty() {
            self.projects.clone().unwrap_or_default()
        } else {
            overrides.projects.clone()
        };

        QuerySettings {
            projects,
            status: overrides
                .status
                .clone()
                .or_else(|| self.status.clone())
                .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            require_empty_fix_version: !overrides.include_versioned
                && self.require_empty_fix_version.unwrap_or(true),
            order_by: overrides
                .order_by
                .clone()
                .or_else(|| self.order_by.clone())
                .unwrap_or_else(|| DEFAULT_ORDER_BY.to_string()),
            raw_jql: overrides.jql.clone(),
            page_size: overrides
                .page_size
                .or(self.page_size)
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .max(1),
            pagination: overrides
                .pagination
                .or(self.pagination)
                .unwrap_or_default(),
        }
    }

    /// Get output path, preferring explicit argument over config
    pub fn resolve_output(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.output.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }

    pub fn resolve_version_file(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.version_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_VERSION_FILE))
    }
}

fn parse_domain(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|_| ReleaseNotesError::InvalidDomain(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.host().is_some() => Ok(url),
        _ => Err(ReleaseNotesError::InvalidDomain(raw.to_string())),
    }
}
