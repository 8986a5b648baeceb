use std::fmt;

use colored::Colorize;
use serde::Serialize;

const FEATURE_MARKERS: [&str; 5] = ["story", "task", "improvement", "feature", "enhancement"];

/// Release-note section an issue is filed under.
///
/// Variant order is the order sections appear in a rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    FeaturesAndImprovements,
    BugFixes,
    Other,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::FeaturesAndImprovements,
        Category::BugFixes,
        Category::Other,
    ];

    /// Map a tracker issue type to its category. First match wins, so
    /// "BugStory" is a bug fix.
    pub fn from_issue_type(issue_type: &str) -> Self {
        let lower = issue_type.to_lowercase();
        if lower.contains("bug") {
            Category::BugFixes
        } else if FEATURE_MARKERS.iter().any(|m| lower.contains(m)) {
            Category::FeaturesAndImprovements
        } else {
            Category::Other
        }
    }

    /// Markdown section heading.
    pub fn heading(self) -> &'static str {
        match self {
            Category::FeaturesAndImprovements => "✨ New Features & Improvements",
            Category::BugFixes => "🐛 Bug Fixes",
            Category::Other => "📝 Other",
        }
    }

    /// Short label for tables.
    pub fn label(self) -> &'static str {
        match self {
            Category::FeaturesAndImprovements => "Feature",
            Category::BugFixes => "Bug",
            Category::Other => "Other",
        }
    }

    /// Get the colored label for terminal output.
    pub fn colored(self) -> String {
        let label = self.label();
        match self {
            Category::FeaturesAndImprovements => label.green().to_string(),
            Category::BugFixes => label.red().to_string(),
            Category::Other => label.bright_black().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.heading())
    }
}
