//! `milciv.toml` settings.
//!
//! Every key is optional:
//!
//! ```toml
//! data_dir = "/etc/milciv/rates"
//! log_level = "info"
//! log_file = "milciv.log"
//!
//! [offer_parser]
//! endpoint = "https://api.openai.com/v1/chat/completions"
//! model = "gpt-4o-mini"
//! timeout_secs = 20
//! ```
//!
//! The offer-parser API key is read only from [`API_KEY_ENV`].

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use milciv_offer::AssistedConfig;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "milciv.toml";
pub const API_KEY_ENV: &str = "MILCIV_OFFER_API_KEY";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub offer_parser: AssistedConfig,
}

impl Config {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid configuration")
    }

    /// Reads `path`, or `./milciv.toml` when no path is given. Only an
    /// explicitly named file has to exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !required && !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Command-line values win over file values.
    pub fn with_overrides(
        mut self,
        data_dir: Option<PathBuf>,
        log_level: Option<String>,
        log_file: Option<PathBuf>,
    ) -> Self {
        if data_dir.is_some() {
            self.data_dir = data_dir;
        }
        if log_level.is_some() {
            self.log_level = log_level;
        }
        if log_file.is_some() {
            self.log_file = log_file;
        }
        self
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

pub fn api_key() -> Option<String> {
    std::env::var(API_KEY_ENV).ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::parse("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.offer_parser.timeout_secs, 20);
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"
data_dir = "rates"
log_level = "debug"
log_file = "milciv.log"

[offer_parser]
endpoint = "http://localhost:8080/v1/chat/completions"
model = "local"
timeout_secs = 5
"#,
        )
        .unwrap();

        assert_eq!(config.data_dir, Some(PathBuf::from("rates")));
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.offer_parser.model, "local");
        assert_eq!(config.offer_parser.timeout_secs, 5);
        assert_eq!(
            config.offer_parser.share_price,
            AssistedConfig::default().share_price
        );
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(Config::parse("api_key = \"nope\"").is_err());
    }

    #[test]
    fn test_overrides_win() {
        let config = Config::parse("log_level = \"warn\"\ndata_dir = \"a\"")
            .unwrap()
            .with_overrides(Some(PathBuf::from("b")), None, None);

        assert_eq!(config.data_dir, Some(PathBuf::from("b")));
        assert_eq!(config.log_level(), "warn");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = Config::load(Some(Path::new("/definitely/not/here/milciv.toml")));

        assert!(result.is_err());
    }
}
