use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::archive::DEFAULT_TEXT_SUFFIX;
use crate::core::summary::DEFAULT_WORD_LIMIT;
use crate::error::ConfigError;

pub const CONFIG_VERSION: u64 = 1;

fn default_backend_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_text_suffix() -> String {
    DEFAULT_TEXT_SUFFIX.to_string()
}

fn default_word_limit() -> usize {
    DEFAULT_WORD_LIMIT
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PanelConfig {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_text_suffix")]
    pub text_suffix: String,
    #[serde(default = "default_word_limit")]
    pub summary_word_limit: usize,
    #[serde(default)]
    pub debug_logging: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            request_timeout_secs: default_timeout_secs(),
            text_suffix: default_text_suffix(),
            summary_word_limit: default_word_limit(),
            debug_logging: false,
        }
    }
}

impl PanelConfig {
    /// `~/.config/sift/config.json` (platform equivalent elsewhere).
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("sift")
            .join("config.json")
    }

    /// Missing file means defaults; a present but broken file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sift-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = scratch("absent.json");
        let config = PanelConfig::load(&path).unwrap();
        assert_eq!(config, PanelConfig::default());
        assert_eq!(config.backend_url, "http://localhost:5000");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let path = scratch("config.json");
        std::fs::write(&path, r#"{"backend_url":"http://panel.local:8080","debug_logging":true}"#)
            .unwrap();
        let config = PanelConfig::load(&path).unwrap();
        assert_eq!(config.backend_url, "http://panel.local:8080");
        assert!(config.debug_logging);
        assert_eq!(config.text_suffix, ".txt");
        assert_eq!(config.summary_word_limit, 500);
    }

    #[test]
    fn broken_file_is_an_error() {
        let path = scratch("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            PanelConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
