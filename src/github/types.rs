use serde::Deserialize;
use serde_json::{Map, Value};

/// A user profile from the `/users/{username}` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    /// Display name; null or absent for many accounts
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    pub public_repos: u64,
    /// Listing endpoint for this user's repositories
    pub repos_url: String,
    /// Every other field GitHub returned, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One element of the repository listing, as GitHub returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Display-oriented view of a repository with placeholders filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySummary {
    pub name: String,
    pub description: String,
    pub language: String,
}

impl From<&Repository> for RepositorySummary {
    fn from(repo: &Repository) -> Self {
        RepositorySummary {
            name: repo.name.clone(),
            description: repo
                .description
                .clone()
                .unwrap_or_else(|| "No description".to_string()),
            language: repo
                .language
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// Everything fetched for one username.
#[derive(Debug, Clone)]
pub struct GitHubData {
    pub profile: Profile,
    /// In listing order; first page only
    pub repositories: Vec<Repository>,
}

impl GitHubData {
    pub fn summaries(&self) -> Vec<RepositorySummary> {
        self.repositories.iter().map(RepositorySummary::from).collect()
    }
}
