//! Configuration management for Deep Search.
//!
//! Configuration is read from environment variables, with a `.env` file in the
//! working directory as a fallback for anything the environment leaves unset:
//! - `GEMINI_API_KEY` - Required. API key for the LLM provider.
//! - `TAVILY_API_KEY` - Required. API key for the Tavily search API.
//! - `DEEP_SEARCH_MODEL` - Optional. Model identifier. Defaults to `gemini-2.5-flash`.
//! - `LLM_BASE_URL` - Optional. OpenAI-compatible base URL. Defaults to the Gemini endpoint.
//! - `TAVILY_BASE_URL` - Optional. Tavily API base URL. Defaults to `https://api.tavily.com`.
//! - `MAX_TURNS` - Optional. Maximum model round-trips per question. Defaults to `10`.
//! - `STREAM_DELAY_MS` - Optional. Delay between rendered characters. Defaults to `10`.
//! - `DEEP_SEARCH_USERNAME` - Optional. Session username. Defaults to `TestUser`.
//! - `DEEP_SEARCH_EMAIL` - Optional. Session email; empty disables it. Defaults to `test@example.com`.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::tools::UserContext;

pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const TAVILY_API_KEY: &str = "TAVILY_API_KEY";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai/";
pub const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the chat-completions provider
    pub llm_api_key: String,

    /// API key for the Tavily search API
    pub tavily_api_key: String,

    /// Model identifier sent with every chat-completions request
    pub model: String,

    /// OpenAI-compatible base URL of the LLM provider
    pub llm_base_url: String,

    /// Base URL of the Tavily API
    pub tavily_base_url: String,

    /// Maximum model round-trips for a single question
    pub max_turns: usize,

    /// Delay between characters when rendering the final answer
    pub stream_delay: Duration,

    /// Static per-session user fields exposed to the agent
    pub user: UserContext,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if either API key is unset or empty.
    /// A value made only of spaces is accepted as set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from the environment, falling back to a dotenv file.
    ///
    /// Variables already set in the process environment take precedence over
    /// the file. A missing file is not an error.
    pub fn from_env_and_file(path: &Path) -> Result<Self, ConfigError> {
        let file = read_env_file(path);
        Self::from_lookup(layered(|key: &str| std::env::var(key).ok(), file))
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };

        // Both keys are checked before anything else so startup fails fast.
        let llm_api_key = required(GEMINI_API_KEY)?;
        let tavily_api_key = required(TAVILY_API_KEY)?;

        let model = lookup("DEEP_SEARCH_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let llm_base_url =
            lookup("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string());

        let tavily_base_url =
            lookup("TAVILY_BASE_URL").unwrap_or_else(|| DEFAULT_TAVILY_BASE_URL.to_string());

        let max_turns = lookup("MAX_TURNS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidValue("MAX_TURNS".to_string(), format!("{}", e)))?;
        if max_turns == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_TURNS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let stream_delay = lookup("STREAM_DELAY_MS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| {
                ConfigError::InvalidValue("STREAM_DELAY_MS".to_string(), format!("{}", e))
            })?;

        let user = UserContext {
            username: lookup("DEEP_SEARCH_USERNAME")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "TestUser".to_string()),
            email: match lookup("DEEP_SEARCH_EMAIL") {
                Some(v) if v.is_empty() => None,
                Some(v) => Some(v),
                None => Some("test@example.com".to_string()),
            },
        };

        Ok(Self {
            llm_api_key,
            tavily_api_key,
            model,
            llm_base_url,
            tavily_base_url,
            max_turns,
            stream_delay,
            user,
        })
    }
}

/// Look a key up in `primary` first, then in `fallback`.
fn layered<F>(primary: F, fallback: HashMap<String, String>) -> impl Fn(&str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    move |key: &str| primary(key).or_else(|| fallback.get(key).cloned())
}

/// Parse a dotenv file into a map without touching the process environment.
///
/// Lines that don't parse are skipped with a warning, as is an unreadable
/// file. A missing file yields an empty map.
fn read_env_file(path: &Path) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    if !path.exists() {
        return vars;
    }

    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) => {
            tracing::warn!("ignoring {}: {}", path.display(), e);
            return vars;
        }
    };

    for item in iter {
        match item {
            Ok((key, value)) => {
                vars.insert(key, value);
            }
            Err(dotenvy::Error::Io(e)) => {
                tracing::warn!("stopped reading {}: {}", path.display(), e);
                break;
            }
            Err(e) => tracing::warn!("skipping line in {}: {}", path.display(), e),
        }
    }
    vars
}
