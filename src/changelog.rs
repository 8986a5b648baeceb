//! Prepend-on-write changelog persistence.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{ReleaseNotesError, Result};

/// Placed between the newest document and everything older.
pub const SEPARATOR: &str = "\n\n---\n\n";

/// Put `document` on top of `existing`, newest first.
pub fn prepend(document: &str, existing: &str) -> String {
    if existing.is_empty() {
        document.to_string()
    } else {
        format!("{document}{SEPARATOR}{existing}")
    }
}

/// Read whatever is at `path`. Missing or unreadable files count as empty.
pub fn read_existing(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => {
            warn!(path = %path.display(), "ignoring unreadable changelog: {e}");
            String::new()
        }
    }
}

/// Write `document` to `path`, keeping any prior content below it.
pub fn persist(document: &str, path: &Path) -> Result<()> {
    let existing = read_existing(path);
    let contents = prepend(document, &existing);

    let write_err = |source| ReleaseNotesError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, contents).map_err(write_err)?;

    debug!(path = %path.display(), kept_bytes = existing.len(), "changelog written");
    Ok(())
}
