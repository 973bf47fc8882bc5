use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::auth::{Credentials, TOKEN_ENV};

/// Configuration keys enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    BaseUrl,
    Repository,
    User,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::BaseUrl => "base_url",
            ConfigKey::Repository => "repository",
            ConfigKey::User => "user",
        }
    }

    /// Environment variable overriding the key
    pub fn env_var(&self) -> &'static str {
        match self {
            ConfigKey::BaseUrl => "ISSUECHECK_BASE_URL",
            ConfigKey::Repository => "ISSUECHECK_REPOSITORY",
            ConfigKey::User => "ISSUECHECK_USER",
        }
    }

    /// Get all config keys
    pub fn all() -> &'static [ConfigKey] {
        &[ConfigKey::BaseUrl, ConfigKey::Repository, ConfigKey::User]
    }
}

/// Filename for the project-specific configuration within the .issuecheck directory.
pub const PROJECT_CONFIG_FILENAME: &str = "config.json";
/// Directory name for project-specific configuration.
pub const PROJECT_CONFIG_DIR: &str = ".issuecheck";

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_REPOSITORY: &str = "steliyanbenev/postmantests";

/// A repository addressed as `<owner>/<repo>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl FromStr for Repository {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [owner, name] if is_path_segment(owner) && is_path_segment(name) => Ok(Repository {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(anyhow!(
                "Invalid repository format {s:?}. Please use <owner>/<repo>."
            )),
        }
    }
}

/// Owner and repository names end up as URL path segments
fn is_path_segment(part: &str) -> bool {
    !part.is_empty() && !part.chars().any(|c| c.is_whitespace() || c == '?' || c == '#')
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Parses a JSON configuration file content into a map of configuration values.
///
/// - Returns an empty map if `content` is empty or contains only whitespace.
/// - Unknown keys are skipped.
/// - Returns an `Err` if the JSON is invalid or is not an object.
pub fn parse_config(content: &[u8]) -> Result<HashMap<ConfigKey, Value>> {
    if content.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(HashMap::new());
    }

    match serde_json::from_slice::<Value>(content).context("Failed to parse config JSON")? {
        Value::Object(map) => Ok(ConfigKey::all()
            .iter()
            .filter_map(|key| map.get(key.as_str()).map(|value| (*key, value.clone())))
            .collect()),
        _ => Err(anyhow!("Config must be a JSON object")),
    }
}

/// Collects the configuration keys set in the environment. Empty values count
/// as unset.
pub fn env_config<F>(lookup: F) -> HashMap<ConfigKey, Value>
where
    F: Fn(&str) -> Option<String>,
{
    ConfigKey::all()
        .iter()
        .filter_map(|key| {
            lookup(key.env_var())
                .filter(|value| !value.trim().is_empty())
                .map(|value| (*key, Value::String(value)))
        })
        .collect()
}

fn string_value(config: &HashMap<ConfigKey, Value>, key: ConfigKey) -> Result<Option<String>> {
    match config.get(&key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(anyhow!(
            "Config key `{}` must be a string, got {other}",
            key.as_str()
        )),
    }
}

/// Trims trailing slashes and requires an http(s) scheme.
pub fn normalize_base_url(base_url: &str) -> Result<String> {
    let base_url = base_url.trim_end_matches('/');
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(anyhow!(
            "Base URL must start with http:// or https://, got {base_url:?}"
        ));
    }
    Ok(base_url.to_string())
}

/// Where the suite points and who it authenticates as
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    base_url: String,
    repository: Repository,
    credentials: Option<Credentials>,
}

impl SuiteConfig {
    pub fn new(
        base_url: &str,
        repository: Repository,
        credentials: Option<Credentials>,
    ) -> Result<Self> {
        Ok(SuiteConfig {
            base_url: normalize_base_url(base_url)?,
            repository,
            credentials,
        })
    }

    /// Builds the configuration from an optional project file and the
    /// environment. Environment values override the file; the token is only
    /// ever read from the environment.
    pub fn resolve<F>(file_content: Option<&[u8]>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match file_content {
            Some(content) => parse_config(content)?,
            None => HashMap::new(),
        };
        config.extend(env_config(&lookup));

        let base_url = string_value(&config, ConfigKey::BaseUrl)?
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let repository: Repository = string_value(&config, ConfigKey::Repository)?
            .as_deref()
            .unwrap_or(DEFAULT_REPOSITORY)
            .parse()?;
        let user = string_value(&config, ConfigKey::User)?.filter(|u| !u.trim().is_empty());
        let token = lookup(TOKEN_ENV).filter(|t| !t.trim().is_empty());

        let credentials = match (user, token) {
            (Some(user), Some(token)) => Some(Credentials::new(user, token)?),
            (None, Some(_)) => {
                return Err(anyhow!(
                    "{TOKEN_ENV} is set but no user is configured. Set {} or `{}` in {PROJECT_CONFIG_DIR}/{PROJECT_CONFIG_FILENAME}.",
                    ConfigKey::User.env_var(),
                    ConfigKey::User.as_str()
                ));
            }
            (Some(user), None) => {
                tracing::warn!(%user, "no {TOKEN_ENV} set; authenticated cases will fail");
                None
            }
            (None, None) => None,
        };

        Self::new(&base_url, repository, credentials)
    }

    /// Reads `.issuecheck/config.json` from the working directory, if present,
    /// and the process environment.
    pub fn load() -> Result<Self> {
        let dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::load_from(&dir, |name| std::env::var(name).ok())
    }

    /// Same as [`SuiteConfig::load`] with the project rooted at `dir`
    pub fn load_from<F>(dir: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = dir.join(PROJECT_CONFIG_DIR).join(PROJECT_CONFIG_FILENAME);
        let content = if path.exists() {
            Some(
                std::fs::read(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
            )
        } else {
            None
        };
        Self::resolve(content.as_deref(), lookup)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }
}
