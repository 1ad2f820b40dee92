use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::assessment::{build_prompt, AgentError, Assessor};
use crate::config::GitHubConfig;
use crate::github::{self, FetchError};
use crate::render::{render, AssessmentResult};

/// Anything that can abort one assessment request.
#[derive(Debug, Error)]
pub enum AssessError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

/// Run fetch → prompt → model → render for one username, strictly in order.
/// The first failure aborts the request; nothing partial is returned.
#[instrument(skip(client, github, assessor), fields(agent = assessor.name()))]
pub async fn assess_user(
    client: &Client,
    github: &GitHubConfig,
    assessor: &dyn Assessor,
    username: &str,
) -> Result<AssessmentResult, AssessError> {
    info!("fetching GitHub data");
    let data = github::fetch_profile(client, github, username).await?;

    let request = build_prompt(&data.profile, &data.summaries());
    debug!(prompt_bytes = request.as_str().len(), "built assessment prompt");

    info!("requesting assessment");
    let raw = assessor.generate_assessment(request).await?;

    let result = render(&raw);
    info!(result_bytes = result.as_str().len(), "assessment complete");
    Ok(result)
}
