mod changelog;
mod cli;
mod client;
mod commands;
mod config;
mod error;
mod fetch;
mod logger;
mod output;
mod query;
mod render;
mod responses;
mod tagging;
mod types;
mod version_source;

use std::error::Error;
use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::generate;

use cli::{Cli, Commands};
use config::Config;
use error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");

        if e.is_config() {
            eprintln!("Run 'release-notes init' to create a config file.");
        }

        // Show error chain if verbose flag was passed
        if std::env::args().any(|arg| arg == "--verbose" || arg == "-v") {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = cause.source();
            }
        }

        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    logger::init(cli.verbose);
    output::set_json_output(cli.json);
    output::set_quiet(cli.quiet);

    match cli.command {
        // Commands that don't require config/client
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "release-notes", &mut io::stdout());
        }
        Commands::Init => {
            commands::init::run().await?;
        }
        Commands::ShowVersion(args) => {
            let config = Config::load()?;
            commands::versions::show(&config, &args);
        }
        // Commands that talk to Jira
        Commands::Generate(args) => {
            let config = Config::load()?;
            commands::generate::run(&config, args).await?;
        }
        Commands::Issues(args) => {
            let config = Config::load()?;
            commands::issues::list(&config, args).await?;
        }
        Commands::CreateVersion(args) => {
            let config = Config::load()?;
            commands::versions::create(&config, args).await?;
        }
    }

    Ok(())
}
