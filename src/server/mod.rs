pub mod page;

use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Router,
};
use reqwest::Client;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::assessment::Assessor;
use crate::config::Config;
use crate::pipeline::{assess_user, AssessError};
use page::{render_page, Outcome};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Immutable per-process state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: Client,
    pub assessor: Arc<dyn Assessor>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AssessForm {
    #[serde(default)]
    pub username: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the page until the process is stopped.
pub async fn serve(state: AppState) -> Result<(), ServerError> {
    let addr = state.config.server.listen;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!(%addr, "listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// The single page. With a non-blank username, runs one assessment and shows
/// either the result or an error banner.
pub async fn index(State(state): State<AppState>, Query(form): Query<AssessForm>) -> Html<String> {
    let username = form.username.trim();
    if username.is_empty() {
        return Html(render_page("", Outcome::Empty));
    }

    let outcome = assess_user(
        &state.client,
        &state.config.github,
        state.assessor.as_ref(),
        username,
    )
    .await;

    match outcome {
        Ok(result) => Html(render_page(username, Outcome::Assessment(&result))),
        Err(err) => {
            let status = match &err {
                AssessError::Fetch(fetch) => fetch.status(),
                AssessError::Agent(_) => None,
            };
            warn!(%username, ?status, error = %err, "assessment failed");
            Html(render_page(username, Outcome::Error(err.to_string())))
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::{github_config, mock_octocat, StubAssessor};
    use std::sync::atomic::Ordering;

    fn state_with(config: Config, assessor: Arc<StubAssessor>) -> AppState {
        AppState {
            config: Arc::new(config),
            client: Client::new(),
            assessor,
        }
    }

    fn form(username: &str) -> Query<AssessForm> {
        Query(AssessForm {
            username: username.to_string(),
        })
    }

    #[tokio::test]
    async fn test_blank_username_shows_form_only() {
        let assessor = Arc::new(StubAssessor::replying("unused"));
        let state = state_with(Config::default(), assessor.clone());

        let Html(page) = index(State(state), form("   ")).await;

        assert!(page.contains("<form"));
        assert!(!page.contains("class=\"error\""));
        assert_eq!(assessor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_successful_assessment_page() {
        let mut server = mockito::Server::new_async().await;
        mock_octocat(&mut server, 200).await;
        let config = Config {
            github: github_config(&server),
            ..Config::default()
        };
        let state = state_with(config, Arc::new(StubAssessor::replying("## Strengths\n- Rust")));

        let Html(page) = index(State(state), form(" octocat ")).await;

        assert!(page.contains("<h2>Technical Skill Assessment</h2>"));
        assert!(page.contains("<h2>Strengths</h2>"));
        assert!(page.contains("value=\"octocat\""));
    }

    #[tokio::test]
    async fn test_fetch_failure_shows_banner() {
        let mut server = mockito::Server::new_async().await;
        mock_octocat(&mut server, 403).await;
        let config = Config {
            github: github_config(&server),
            ..Config::default()
        };
        let assessor = Arc::new(StubAssessor::replying("unused"));
        let state = state_with(config, assessor.clone());

        let Html(page) = index(State(state), form("octocat")).await;

        assert!(page.contains("class=\"error\""));
        assert!(page.contains("Error: Failed to fetch repositories: 403 - Forbidden"));
        assert!(!page.contains("<h2>Technical Skill Assessment</h2>"));
        assert_eq!(assessor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_health() {
        assert_eq!(health().await, "ok");
    }
}
