//! JQL construction for the "done tickets" search.

use crate::config::QuerySettings;

/// Build the JQL filter. A raw `--jql` override is used verbatim.
pub fn build_jql(query: &QuerySettings) -> String {
    if let Some(raw) = &query.raw_jql {
        return raw.clone();
    }

    let mut clauses = Vec::new();
    if !query.projects.is_empty() {
        let projects = query
            .projects
            .iter()
            .map(|p| quote(p))
            .collect::<Vec<_>>()
            .join(", ");
        clauses.push(format!("project in ({projects})"));
    }
    clauses.push(format!("status = {}", quote(&query.status)));
    if query.require_empty_fix_version {
        clauses.push("fixVersion IS EMPTY".to_string());
    }

    let mut jql = clauses.join(" AND ");
    if !query.order_by.trim().is_empty() {
        jql.push_str(" ORDER BY ");
        jql.push_str(query.order_by.trim());
    }
    jql
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
