use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::config::Overrides;
use crate::types::Pagination;

#[derive(Parser)]
#[command(name = "release-notes")]
#[command(about = "Generate release notes from done Jira tickets", version)]
#[command(after_help = "EXAMPLES:
    release-notes generate                 Render, print and prepend to RELEASE_NOTES.md
    release-notes generate --tag           Also set the fix version on every ticket
    release-notes issues --project EN      List the tickets that would be included
    release-notes show-version             Print the version read from Chart.yaml")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress progress and success messages
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Show debug logs and detailed error information
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch done tickets and write release notes
    #[command(
        alias = "gen",
        after_help = "EXAMPLES:
    release-notes generate --version 1.2.3
    release-notes generate --version-file charts/app/Chart.yaml --output CHANGELOG.md
    release-notes generate --dry-run --project EN --project BF
    release-notes generate --tag --create-version"
    )]
    Generate(GenerateArgs),
    /// List the done tickets matching the filter
    #[command(
        alias = "ls",
        after_help = "EXAMPLES:
    release-notes issues
    release-notes issues --include-versioned --status Closed
    release-notes issues --snapshot done_tickets.json"
    )]
    Issues(IssuesArgs),
    /// Create the release version in each configured project
    #[command(after_help = "EXAMPLES:
    release-notes create-version --project EN
    release-notes create-version --version 1.2.3")]
    CreateVersion(CreateVersionArgs),
    /// Print the version read from the version file
    #[command(after_help = "EXAMPLES:
    release-notes show-version
    release-notes show-version --version-file charts/app/Chart.yaml")]
    ShowVersion(VersionArgs),
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    release-notes completions bash > ~/.bash_completion.d/release-notes
    release-notes completions zsh > ~/.zfunc/_release-notes")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Initialize configuration file interactively
    #[command(after_help = "EXAMPLES:
    release-notes init")]
    Init,
}

#[derive(Args, Clone, Default)]
pub struct QueryArgs {
    /// Restrict to a project key (repeatable; default: all projects)
    #[arg(long = "project", short = 'p')]
    pub projects: Vec<String>,

    /// Status that marks a ticket as released (default: Done)
    #[arg(long)]
    pub status: Option<String>,

    /// Include tickets that already have a fix version
    #[arg(long)]
    pub include_versioned: bool,

    /// JQL ORDER BY clause (default: "issuetype ASC")
    #[arg(long)]
    pub order_by: Option<String>,

    /// Use this JQL verbatim instead of building one
    #[arg(long)]
    pub jql: Option<String>,

    /// Results per page
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=5000))]
    pub page_size: Option<u32>,

    /// Pagination style of the search endpoint
    #[arg(long, value_enum)]
    pub pagination: Option<Pagination>,
}

impl QueryArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            projects: self.projects.clone(),
            status: self.status.clone(),
            include_versioned: self.include_versioned,
            order_by: self.order_by.clone(),
            jql: self.jql.clone(),
            page_size: self.page_size,
            pagination: self.pagination,
        }
    }
}

#[derive(Args, Clone, Default)]
pub struct VersionArgs {
    /// Release version (default: read from the version file)
    #[arg(long = "version")]
    pub release_version: Option<String>,

    /// Manifest holding a `version:` line
    #[arg(long)]
    pub version_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    #[command(flatten)]
    pub version: VersionArgs,

    /// Release notes file to prepend to
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Print the document without writing or tagging
    #[arg(long)]
    pub dry_run: bool,

    /// Set the release version as fix version on every fetched ticket
    #[arg(long)]
    pub tag: bool,

    /// Create the release version in each project before tagging
    #[arg(long)]
    pub create_version: bool,
}

#[derive(Args)]
pub struct IssuesArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Also save the fetched tickets as JSON to this path
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
}

#[derive(Args)]
pub struct CreateVersionArgs {
    /// Project key (repeatable; default: configured projects)
    #[arg(long = "project", short = 'p')]
    pub projects: Vec<String>,

    #[command(flatten)]
    pub version: VersionArgs,
}
