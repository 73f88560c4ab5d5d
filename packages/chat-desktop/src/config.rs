//! Configuration file loading
//!
//! Reads `config.toml` from the platform config directory. Every field is
//! optional; a missing file yields the defaults.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

use crate::api::types::Starter;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Overrides the config file location
pub const CONFIG_PATH_ENV: &str = "STARTER_CHAT_CONFIG";
/// Overrides the server URL from the config file
pub const SERVER_URL_ENV: &str = "STARTER_CHAT_SERVER_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server_url: String,
    pub access_token: Option<String>,
    /// Author name used until the server reports a signed-in user
    pub user_name: Option<String>,
    pub theme: String,
    /// Shown when the server offers no starters of its own
    pub starters: Vec<Starter>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            access_token: None,
            user_name: None,
            theme: crate::theme::DEFAULT_THEME_ID.to_string(),
            starters: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load a config file; a missing file gives the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from the default location, falling back to defaults on error
    pub fn load() -> Self {
        let mut config = match config_path() {
            Some(path) => match Self::load_from(&path) {
                Ok(config) => {
                    tracing::debug!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("{}; using defaults", e);
                    Self::default()
                }
            },
            None => {
                tracing::warn!("No config directory available; using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides(env::var(SERVER_URL_ENV).ok());
        config
    }

    fn apply_env_overrides(&mut self, server_url: Option<String>) {
        if let Some(url) = server_url {
            if !url.trim().is_empty() {
                self.server_url = url.trim().to_string();
            }
        }
    }
}

/// Path of the config file, honoring the environment override
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    ProjectDirs::from("dev", "starter-chat", "starter-chat")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn parses_starters_and_server() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
server_url = "https://chat.example.com"
user_name = "ada"

[[starters]]
label = "Morning routine"
message = "Plan my morning"
icon = "/public/sun.svg"
commands = ["plan"]
toggle_commands = ["deep"]

[[starters]]
label = "Joke"
message = "Tell me a joke"
"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.server_url, "https://chat.example.com");
        assert_eq!(config.user_name.as_deref(), Some("ada"));
        assert_eq!(config.theme, crate::theme::DEFAULT_THEME_ID);
        assert_eq!(config.starters.len(), 2);
        assert_eq!(config.starters[0].toggle_commands, vec!["deep"]);
        assert!(config.starters[1].commands.is_empty());
        assert!(config.starters[1].icon.is_none());
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server_url = [").unwrap();
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn env_override_wins_when_set() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(Some("  ".to_string()));
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        config.apply_env_overrides(Some("http://10.0.0.2:9000".to_string()));
        assert_eq!(config.server_url, "http://10.0.0.2:9000");
    }
}
