use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_DIFF_BASE_URL: &str = "https://patch-diff.githubusercontent.com";
pub const DEFAULT_USER_AGENT: &str = "pr-review-agent";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CONFIG_FILE: &str = ".pr-review-agent.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .pr-review-agent.toml.
/// All fields are optional; the agent works with zero config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API token. If None, falls back to GITHUB_TOKEN env var.
    pub token: Option<String>,
    /// Base URL of the REST API (reviews are posted here)
    pub api_base_url: Option<String>,
    /// Base URL serving raw `.diff` files
    pub diff_base_url: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from .pr-review-agent.toml in the current directory.
    /// Returns default config if the file doesn't exist. The token is filled
    /// from GITHUB_TOKEN when the file leaves it unset.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        let mut config = if path.exists() {
            Self::load_from(path)?
        } else {
            Config::default()
        };

        config.github.token = resolve_token(
            config.github.token.take(),
            std::env::var("GITHUB_TOKEN").ok(),
        );

        Ok(config)
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// The token handed to components at construction time.
    pub fn github_token(&self) -> Option<String> {
        self.github.token.clone()
    }

    pub fn api_base_url(&self) -> &str {
        self.github
            .api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE_URL)
    }

    pub fn diff_base_url(&self) -> &str {
        self.github
            .diff_base_url
            .as_deref()
            .unwrap_or(DEFAULT_DIFF_BASE_URL)
    }

    pub fn user_agent(&self) -> &str {
        self.github
            .user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

/// Config file value takes precedence; empty strings count as unset.
fn resolve_token(from_file: Option<String>, from_env: Option<String>) -> Option<String> {
    from_file
        .filter(|t| !t.is_empty())
        .or_else(|| from_env.filter(|t| !t.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.github_token().is_none());
        assert_eq!(config.api_base_url(), "https://api.github.com");
        assert_eq!(
            config.diff_base_url(),
            "https://patch-diff.githubusercontent.com"
        );
        assert_eq!(config.user_agent(), "pr-review-agent");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_str = r#"
[github]
token = "ghp_file"
api_base_url = "http://127.0.0.1:9000"

[http]
timeout_secs = 5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.github_token().as_deref(), Some("ghp_file"));
        assert_eq!(config.api_base_url(), "http://127.0.0.1:9000");
        assert_eq!(config.diff_base_url(), DEFAULT_DIFF_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_load_from_missing_file() {
        let path = std::env::temp_dir().join("pr-review-agent-does-not-exist.toml");
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::FileRead(_))
        ));
    }

    #[test]
    fn test_load_from_invalid_toml() {
        let path = std::env::temp_dir().join("pr-review-agent-invalid.toml");
        std::fs::write(&path, "[github\ntoken = ").unwrap();
        let result = Config::load_from(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_resolve_token_precedence() {
        assert_eq!(
            resolve_token(Some("file".into()), Some("env".into())).as_deref(),
            Some("file")
        );
        assert_eq!(
            resolve_token(None, Some("env".into())).as_deref(),
            Some("env")
        );
        assert_eq!(
            resolve_token(Some(String::new()), Some("env".into())).as_deref(),
            Some("env")
        );
        assert!(resolve_token(None, None).is_none());
    }
}
