use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = ".skill-assessor.toml";
pub const DEFAULT_ENV_FILE: &str = ".env";

const API_KEY_VAR: &str = "GROQ_API_KEY";
const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to load environment file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("Missing GROQ API Key. Please set GROQ_API_KEY in the environment file.")]
    MissingApiKey,
}

/// Top-level configuration loaded from .skill-assessor.toml.
/// All fields are optional — the tool works with zero config once the
/// model API key is present in the environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Users endpoint; the username is appended as the final path segment.
    pub api_base: String,
    /// GitHub API token. If None, falls back to GITHUB_TOKEN env var.
    pub token: Option<String>,
    pub user_agent: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com/users/".to_string(),
            token: None,
            user_agent: "skill-assessor".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub id: String,
    /// OpenAI-compatible API root (the `/chat/completions` path is appended).
    pub base_url: String,
    /// Provider API key. If None, falls back to GROQ_API_KEY env var.
    pub api_key: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            id: "mixtral-8x7b-32768".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 8501)),
        }
    }
}

impl Config {
    /// Load the environment file, then the config file, then resolve credentials.
    ///
    /// A missing config file or env file yields defaults; a missing model API
    /// key is fatal. Variables already set in the process win over the file.
    pub fn load(config_path: &Path, env_path: &Path) -> Result<Config, ConfigError> {
        Self::load_with(config_path, env_path, |name| std::env::var(name).ok())
    }

    /// Same as [`Config::load`], reading process variables through `process_env`.
    pub fn load_with(
        config_path: &Path,
        env_path: &Path,
        process_env: impl Fn(&str) -> Option<String>,
    ) -> Result<Config, ConfigError> {
        let file_env = read_env_file(env_path)?;
        let lookup = |name: &str| process_env(name).or_else(|| file_env.get(name).cloned());

        let mut config = if config_path.exists() {
            Self::load_from(config_path)?
        } else {
            Config::default()
        };

        let api_key = config.resolve_api_key(lookup(API_KEY_VAR))?;
        config.model.api_key = Some(api_key);

        if config.github.token.is_none() {
            config.github.token = lookup(GITHUB_TOKEN_VAR);
        }

        Ok(config)
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the model API key: config file value takes precedence,
    /// falls back to the given environment value. Blank keys count as missing.
    pub fn resolve_api_key(&self, from_env: Option<String>) -> Result<String, ConfigError> {
        self.model
            .api_key
            .clone()
            .or(from_env)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let vars = dotenvy::from_path_iter(path)?.collect::<Result<HashMap<_, _>, _>>()?;
    debug!(path = %path.display(), vars = vars.len(), "loaded environment file");
    Ok(vars)
}
