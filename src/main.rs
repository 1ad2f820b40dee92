mod assessment;
mod config;
mod github;
mod pipeline;
mod render;
mod report;
mod server;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, info_span};
use tracing_subscriber::EnvFilter;

/// Skill Assessor — serves a single-page form that takes a GitHub username
/// and shows an LLM-written assessment of the user's technical skills.
#[derive(Parser, Debug)]
#[command(name = "skill-assessor", version, about)]
struct Cli {
    /// Assess this user once and exit instead of starting the web server
    #[arg(short, long)]
    username: Option<String>,

    /// Write the one-shot assessment to this markdown file instead of the terminal
    #[arg(short, long, requires = "username")]
    output: Option<PathBuf>,

    /// Configuration file
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Environment file holding GROQ_API_KEY (and optionally GITHUB_TOKEN)
    #[arg(long, default_value = config::DEFAULT_ENV_FILE)]
    env_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let config = config::Config::load(&cli.config, &cli.env_file)?;

    let client = reqwest::Client::new();
    let agent = assessment::AssessmentAgent::new(client.clone(), &config.model);

    match cli.username.as_deref() {
        Some(username) => {
            let username = username.trim();
            if username.is_empty() {
                return Err("username must not be empty".into());
            }
            let _span = info_span!("one_shot", username = %username).entered();
            let result = pipeline::assess_user(&client, &config.github, &agent, username).await?;
            let built_report = report::Report::new(username, result);
            report::output(&built_report, cli.output.as_deref())?;
            info!("done");
        }
        None => {
            let state = server::AppState {
                config: Arc::new(config),
                client,
                assessor: Arc::new(agent),
            };
            server::serve(state).await?;
        }
    }

    Ok(())
}
