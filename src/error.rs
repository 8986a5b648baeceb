use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReleaseNotesError {
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Authentication rejected by {endpoint} ({reason}). Check JIRA_EMAIL and JIRA_API_TOKEN")]
    Auth { endpoint: String, reason: String },

    #[error("Malformed response from {endpoint}: {message}\nRequest body: {request_body}\nResponse body: {response_body}")]
    Protocol {
        endpoint: String,
        message: String,
        request_body: String,
        response_body: String,
    },

    #[error("API error from {endpoint} (status {status}): {response_body}\nRequest body: {request_body}")]
    Api {
        endpoint: String,
        status: u16,
        request_body: String,
        response_body: String,
    },

    #[error("Failed to update {key} (status {status}): {message}")]
    UpdateFailed {
        key: String,
        status: u16,
        message: String,
    },

    #[error("Failed to create version {version} in {project} (status {status}): {message}")]
    VersionCreateFailed {
        project: String,
        version: String,
        status: u16,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Missing required setting `{name}`. Set {env} or add `{name}` to the config file")]
    MissingSetting {
        name: &'static str,
        env: &'static str,
    },

    #[error("No projects given. Pass --project or set `projects` in the config file")]
    NoProjects,

    #[error("Invalid Jira domain {0:?}: expected an http(s) URL")]
    InvalidDomain(String),

    #[error("Failed to write release notes to {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write snapshot to {path}: {source}")]
    SnapshotWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize issues: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ReleaseNotesError {
    /// True for errors raised by configuration resolution, before any request.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::ConfigRead { .. }
                | Self::ConfigParse { .. }
                | Self::NoConfigDir
                | Self::MissingSetting { .. }
                | Self::NoProjects
                | Self::InvalidDomain(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ReleaseNotesError>;
