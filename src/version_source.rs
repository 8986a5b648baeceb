//! Release version scraped from a packaging manifest such as `Chart.yaml`.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

/// Used when no version can be read.
pub const UNKNOWN_VERSION: &str = "unknown";

fn version_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^version:\s*(.+)$").expect("valid version regex"))
}

/// Find the first `version:` value in manifest text.
pub fn parse_version(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let caps = version_line().captures(line.trim())?;
        let value = caps[1].trim().trim_matches(|c: char| c == '"' || c == '\'').trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Read the version from `path`, falling back to [`UNKNOWN_VERSION`].
pub fn read_version(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_version(&contents).unwrap_or_else(|| {
            warn!(path = %path.display(), "no version: line found");
            UNKNOWN_VERSION.to_string()
        }),
        Err(e) => {
            debug!(path = %path.display(), "version file unreadable: {e}");
            warn!(path = %path.display(), "version file not readable, using \"{UNKNOWN_VERSION}\"");
            UNKNOWN_VERSION.to_string()
        }
    }
}
