//! Client config load for `~/.twin/config.yaml` and ordered base-URL
//! resolution: explicit override > `TWIN_API_URL` > config file > default.

use std::path::{Path, PathBuf};

/// Environment variable holding the API base URL.
pub const ENV_API_URL: &str = "TWIN_API_URL";
/// Environment variable holding an alternate config file path.
pub const ENV_CONFIG_PATH: &str = "TWIN_CONFIG";
/// Base URL used when no other source defines one (local dev server).
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// API section (base_url, source_type).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ApiSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
}

/// Full config file schema.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSection,
}

/// Returns the default config file path: `~/.twin/config.yaml` (platform-specific).
pub fn default_config_path() -> Option<PathBuf> {
    let home = home_dir()?;
    Some(home.join(".twin").join("config.yaml"))
}

#[cfg(unix)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(windows)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE").map(PathBuf::from)
}

#[cfg(not(any(unix, windows)))]
fn home_dir() -> Option<PathBuf> {
    None
}

/// Resolve the config file path: explicit override, then `TWIN_CONFIG`,
/// then the default location.
pub fn resolve_config_path(override_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(ENV_CONFIG_PATH) {
        return Some(PathBuf::from(path));
    }
    default_config_path()
}

/// Load config from a YAML file. Path is typically `~/.twin/config.yaml`.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Returns the first source holding a non-blank value, scanning in order.
pub fn first_defined<I>(sources: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    sources
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

/// Resolve the API base URL from the ordered sources. Always yields a URL;
/// the chain ends at [`DEFAULT_API_URL`].
pub fn resolve_base_url(
    override_url: Option<&str>,
    env_url: Option<&str>,
    config: Option<&Config>,
) -> String {
    first_defined([
        override_url.map(str::to_string),
        env_url.map(str::to_string),
        config.and_then(|cfg| cfg.api.base_url.clone()),
    ])
    .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// [`resolve_base_url`] with the environment value read from `TWIN_API_URL`.
pub fn resolve_base_url_from_env(override_url: Option<&str>, config: Option<&Config>) -> String {
    let env_url = std::env::var(ENV_API_URL).ok();
    resolve_base_url(override_url, env_url.as_deref(), config)
}

/// Config load error.
#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(s) => write!(f, "IO error: {}", s),
            ConfigError::Parse(s) => write!(f, "parse error: {}", s),
        }
    }
}

impl std::error::Error for ConfigError {}
