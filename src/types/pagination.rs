use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;

/// Pagination style of the Jira search endpoint being queried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pagination {
    /// `startAt`/`total` paging on `/rest/api/2/search`
    Offset,
    /// `nextPageToken`/`isLast` paging on `/rest/api/3/search/jql`
    #[default]
    Token,
}

impl Pagination {
    pub fn search_path(self) -> &'static str {
        match self {
            Pagination::Offset => "rest/api/2/search",
            Pagination::Token => "rest/api/3/search/jql",
        }
    }
}

impl fmt::Display for Pagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pagination::Offset => write!(f, "offset"),
            Pagination::Token => write!(f, "token"),
        }
    }
}
