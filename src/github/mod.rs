pub mod types;

pub use types::{GitHubData, Profile, Repository, RepositorySummary};

use crate::config::GitHubConfig;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use thiserror::Error;
use tracing::{debug, instrument};

/// Which of the two sequential requests failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Profile,
    Repositories,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Profile => write!(f, "user details"),
            Stage::Repositories => write!(f, "repositories"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GitHub API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("Invalid GitHub URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to fetch {stage}: {status} - {body}")]
    Status { stage: Stage, status: u16, body: String },

    #[error("Unexpected {stage} response from GitHub: {source}")]
    Malformed {
        stage: Stage,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// HTTP status of a rejected request, if that is what failed.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Build `<api_base>/<username>`, escaping the username as one path segment.
/// `.` and `..` are rejected since URL normalisation would swallow them.
pub fn profile_url(api_base: &str, username: &str) -> Result<Url, FetchError> {
    if matches!(username, "." | "..") {
        return Err(FetchError::InvalidUrl(format!("{api_base}{username}")));
    }
    let mut url = Url::parse(api_base).map_err(|_| FetchError::InvalidUrl(api_base.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| FetchError::InvalidUrl(api_base.to_string()))?
        .pop_if_empty()
        .push(username);
    Ok(url)
}

/// Fetch a user's profile and then their repository listing.
///
/// Two GETs, strictly in order. Any non-success status fails with the status
/// and body; the listing is never requested if the profile fails. Only the
/// first page of the listing is read.
#[instrument(skip(client, config), fields(api_base = %config.api_base))]
pub async fn fetch_profile(
    client: &Client,
    config: &GitHubConfig,
    username: &str,
) -> Result<GitHubData, FetchError> {
    let url = profile_url(&config.api_base, username)?;

    debug!(%url, "fetching user profile");
    let profile: Profile = get_json(client, config, url, Stage::Profile).await?;
    debug!(
        login = ?profile.extra.get("login"),
        public_repos = profile.public_repos,
        "received user profile"
    );

    let repos_url = Url::parse(&profile.repos_url)
        .map_err(|_| FetchError::InvalidUrl(profile.repos_url.clone()))?;

    debug!(url = %repos_url, "fetching repository listing");
    let repositories: Vec<Repository> =
        get_json(client, config, repos_url, Stage::Repositories).await?;
    debug!(repositories = repositories.len(), "received repository listing");

    Ok(GitHubData {
        profile,
        repositories,
    })
}

async fn get_json<T: DeserializeOwned>(
    client: &Client,
    config: &GitHubConfig,
    url: Url,
    stage: Stage,
) -> Result<T, FetchError> {
    let mut request = client
        .get(url)
        .header("User-Agent", &config.user_agent)
        .header("Accept", "application/vnd.github+json");
    if let Some(token) = &config.token {
        request = request.bearer_auth(token);
    }

    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(FetchError::Status {
            stage,
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|source| FetchError::Malformed { stage, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(server: &mockito::Server) -> GitHubConfig {
        GitHubConfig {
            api_base: format!("{}/users/", server.url()),
            ..GitHubConfig::default()
        }
    }

    fn profile_body(server: &mockito::Server) -> String {
        format!(
            r#"{{"login": "octocat", "name": "The Octocat", "bio": "Hub mascot",
                "public_repos": 2, "repos_url": "{}/users/octocat/repos"}}"#,
            server.url()
        )
    }

    #[test]
    fn test_profile_url_appends_username() {
        let url = profile_url("https://api.github.com/users/", "octocat").unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/users/octocat");

        let url = profile_url("https://api.github.com/users", "octocat").unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/users/octocat");
    }

    #[test]
    fn test_profile_url_escapes_username() {
        let url = profile_url("https://api.github.com/users/", "a/b?c").unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/users/a%2Fb%3Fc");
    }

    #[test]
    fn test_profile_url_rejects_dot_segments() {
        for username in [".", ".."] {
            assert!(matches!(
                profile_url("https://api.github.com/users/", username),
                Err(FetchError::InvalidUrl(_))
            ));
        }
        let url = profile_url("https://api.github.com/users/", "...").unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/users/...");
    }

    #[tokio::test]
    async fn test_dot_username_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let any = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = fetch_profile(&Client::new(), &test_config(&server), "..")
            .await
            .unwrap_err();

        any.assert_async().await;
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[test]
    fn test_profile_url_rejects_bad_base() {
        assert!(matches!(
            profile_url("not a url", "octocat"),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_profile_and_repositories() {
        let mut server = mockito::Server::new_async().await;
        let profile_mock = server
            .mock("GET", "/users/octocat")
            .match_header("user-agent", "skill-assessor")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(profile_body(&server))
            .create_async()
            .await;
        let repos_mock = server
            .mock("GET", "/users/octocat/repos")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"name": "hello-world", "description": "First", "language": "Rust"},
                    {"name": "notes", "description": null, "language": null}]"#,
            )
            .create_async()
            .await;

        let data = fetch_profile(&Client::new(), &test_config(&server), "octocat")
            .await
            .unwrap();

        profile_mock.assert_async().await;
        repos_mock.assert_async().await;
        assert_eq!(data.profile.name.as_deref(), Some("The Octocat"));
        assert_eq!(data.profile.public_repos, 2);
        let names: Vec<&str> = data.repositories.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["hello-world", "notes"]);
        assert_eq!(data.summaries()[1].language, "Unknown");
    }

    #[tokio::test]
    async fn test_profile_404_skips_listing() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/users/ghost")
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;
        let repos_mock = server
            .mock("GET", mockito::Matcher::Regex("/repos$".to_string()))
            .expect(0)
            .create_async()
            .await;

        let err = fetch_profile(&Client::new(), &test_config(&server), "ghost")
            .await
            .unwrap_err();

        repos_mock.assert_async().await;
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            r#"Failed to fetch user details: 404 - {"message": "Not Found"}"#
        );
    }

    #[tokio::test]
    async fn test_listing_403_is_fetch_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/users/octocat")
            .with_status(200)
            .with_body(profile_body(&server))
            .create_async()
            .await;
        server
            .mock("GET", "/users/octocat/repos")
            .with_status(403)
            .with_body("rate limited")
            .create_async()
            .await;

        let err = fetch_profile(&Client::new(), &test_config(&server), "octocat")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FetchError::Status {
                stage: Stage::Repositories,
                status: 403,
                ..
            }
        ));
        assert!(err.to_string().contains("403"));
        assert!(err.to_string().contains("Failed to fetch repositories"));
    }

    #[tokio::test]
    async fn test_profile_without_public_repos_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/users/octocat")
            .with_status(200)
            .with_body(r#"{"login": "octocat", "repos_url": "http://localhost/x"}"#)
            .create_async()
            .await;

        let err = fetch_profile(&Client::new(), &test_config(&server), "octocat")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FetchError::Malformed {
                stage: Stage::Profile,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_token_sent_as_bearer() {
        let mut server = mockito::Server::new_async().await;
        let profile_mock = server
            .mock("GET", "/users/octocat")
            .match_header("authorization", "Bearer secret-token")
            .with_status(200)
            .with_body(profile_body(&server))
            .create_async()
            .await;
        server
            .mock("GET", "/users/octocat/repos")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let config = GitHubConfig {
            token: Some("secret-token".to_string()),
            ..test_config(&server)
        };
        let data = fetch_profile(&Client::new(), &config, "octocat").await.unwrap();

        profile_mock.assert_async().await;
        assert!(data.repositories.is_empty());
    }
}
