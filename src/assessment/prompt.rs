use std::fmt;

use crate::github::{Profile, RepositorySummary};

use super::INSTRUCTIONS;

const MISSING: &str = "N/A";

/// The natural-language prompt sent to the model for one username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentRequest(String);

impl AssessmentRequest {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssessmentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One bullet per repository, in listing order.
pub fn repository_line(repo: &RepositorySummary) -> String {
    format!(
        "- **{}**: {} (Language: {})",
        repo.name, repo.description, repo.language
    )
}

/// Render the profile and its repositories into the assessment prompt.
pub fn build_prompt(profile: &Profile, repositories: &[RepositorySummary]) -> AssessmentRequest {
    let repo_lines: Vec<String> = repositories.iter().map(repository_line).collect();

    let mut prompt = String::new();
    prompt.push_str("Based on the following GitHub profile, assess the user's technical skills:\n\n");
    prompt.push_str("### User Information:\n");
    prompt.push_str(&format!(
        "- **Name**: {}\n",
        profile.name.as_deref().unwrap_or(MISSING)
    ));
    prompt.push_str(&format!(
        "- **Bio**: {}\n",
        profile.bio.as_deref().unwrap_or(MISSING)
    ));
    prompt.push_str(&format!(
        "- **Public Repositories**: {}\n\n",
        profile.public_repos
    ));
    prompt.push_str("### Repositories:\n");
    prompt.push_str(&repo_lines.join("\n"));
    prompt.push_str("\n\n### Analysis Instructions:\n");
    prompt.push_str(INSTRUCTIONS);
    prompt.push_str(" Use markdown format for clarity.\n");

    AssessmentRequest(prompt)
}
