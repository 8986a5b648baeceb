use std::io::{self, Write};

use crate::config::{Config, DEFAULT_OUTPUT, DEFAULT_VERSION_FILE};
use crate::error::{ReleaseNotesError, Result};

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Answers collected by `init`.
pub struct InitAnswers {
    pub domain: String,
    pub email: String,
    pub api_token: String,
    pub projects: Vec<String>,
    pub version_file: String,
}

/// Render answers as `config.toml` contents.
pub fn render_config(answers: &InitAnswers) -> String {
    let quote = |s: &str| toml::Value::String(s.to_string()).to_string();

    let mut content = format!(
        "domain = {}\nemail = {}\napi_token = {}\n",
        quote(&answers.domain),
        quote(&answers.email),
        quote(&answers.api_token)
    );
    if !answers.projects.is_empty() {
        let projects: Vec<String> = answers.projects.iter().map(|p| quote(p)).collect();
        content.push_str(&format!("projects = [{}]\n", projects.join(", ")));
    }
    content.push_str(&format!("version_file = {}\n", quote(&answers.version_file)));
    content.push_str(&format!("output = {}\n", quote(DEFAULT_OUTPUT)));
    content
}

pub async fn run() -> Result<()> {
    let config_path = Config::config_path()?;

    if config_path.exists() {
        let answer = prompt(&format!(
            "Config file already exists at {}. Overwrite? [y/N] ",
            config_path.display()
        ))?;
        if !answer.eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("Jira Release Notes Configuration");
    println!("================================\n");

    let domain = prompt("Jira domain (e.g., https://company.atlassian.net): ")?;
    if domain.is_empty() {
        return Err(ReleaseNotesError::MissingSetting {
            name: "domain",
            env: "JIRA_DOMAIN",
        });
    }
    let email = prompt("Jira account email: ")?;
    if email.is_empty() {
        return Err(ReleaseNotesError::MissingSetting {
            name: "email",
            env: "JIRA_EMAIL",
        });
    }
    let api_token = prompt(
        "API token (create one at https://id.atlassian.com/manage-profile/security/api-tokens): ",
    )?;
    if api_token.is_empty() {
        return Err(ReleaseNotesError::MissingSetting {
            name: "api_token",
            env: "JIRA_API_TOKEN",
        });
    }
    let projects = prompt("Project keys, comma separated (e.g., EN,BF) [optional, default all]: ")?;
    let version_file = prompt(&format!("Version file [{DEFAULT_VERSION_FILE}]: "))?;

    let answers = InitAnswers {
        domain,
        email,
        api_token,
        projects: projects
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect(),
        version_file: if version_file.is_empty() {
            DEFAULT_VERSION_FILE.to_string()
        } else {
            version_file
        },
    };

    // Create config directory if it doesn't exist
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ReleaseNotesError::ConfigRead {
            path: config_path.clone(),
            source: e,
        })?;
    }

    std::fs::write(&config_path, render_config(&answers)).map_err(|e| {
        ReleaseNotesError::ConfigRead {
            path: config_path.clone(),
            source: e,
        }
    })?;

    println!("\nConfig saved to {}", config_path.display());
    println!("You can now run 'release-notes generate'!");

    Ok(())
}
