mod schema;

pub use schema::{Config, RawConfig, RepoRef};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file name, relative to the home directory
pub const CONFIG_FILE_NAME: &str = ".xbar-github.json";

pub const DEFAULT_LOOKBACK: Duration = Duration::from_secs(30 * 24 * 60 * 60);
pub const DEFAULT_CLOSED_WINDOW: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Get the default config file path (~/.xbar-github.json)
pub fn get_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from(std::env::var("HOME").unwrap_or_default()))
        .join(CONFIG_FILE_NAME)
}

/// Load and validate configuration from a JSON file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.xbar-github.json)
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist
/// - The config file cannot be read or is not valid JSON
/// - `token` (unless supplied through the environment) or `username` is missing
/// - A duration or the `repo` key cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        anyhow::bail!("Global config file not found: {}", config_path.display());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let raw: RawConfig = serde_json::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid JSON in {}", config_path.display()))?;

    validate(raw, &config_path, crate::credentials::get_token_from_env())
}

/// Turn raw file contents into a [`Config`]. A token from the environment
/// takes precedence over the one in the file.
pub fn validate(raw: RawConfig, path: &Path, env_token: Option<String>) -> Result<Config> {
    let token = env_token
        .or_else(|| non_empty(raw.token))
        .ok_or_else(|| missing_key(path, "token"))?;
    let username = non_empty(raw.username).ok_or_else(|| missing_key(path, "username"))?;

    let repo = raw.repo.as_deref().map(parse_repo).transpose()?;

    Ok(Config {
        token,
        username,
        org: non_empty(raw.org),
        repo,
        lookback: parse_duration_or("lookback", raw.lookback.as_deref(), DEFAULT_LOOKBACK)?,
        closed_window: parse_duration_or(
            "closed_window",
            raw.closed_window.as_deref(),
            DEFAULT_CLOSED_WINDOW,
        )?,
        timeout: parse_duration_or("timeout", raw.timeout.as_deref(), DEFAULT_TIMEOUT)?,
    })
}

fn missing_key(path: &Path, key: &str) -> anyhow::Error {
    anyhow::anyhow!("The file {} is missing the key \"{}\".", path.display(), key)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_duration_or(key: &str, value: Option<&str>, default: Duration) -> Result<Duration> {
    match value {
        None => Ok(default),
        Some(text) => humantime::parse_duration(text)
            .with_context(|| format!("Invalid duration for \"{}\": {}", key, text)),
    }
}

fn parse_repo(value: &str) -> Result<RepoRef> {
    match value.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok(RepoRef {
                owner: owner.to_string(),
                name: name.to_string(),
            })
        }
        _ => anyhow::bail!("Invalid repo \"{}\": expected owner/name", value),
    }
}
