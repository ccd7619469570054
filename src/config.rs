//! Configuration loading and management for urlgist.
//!
//! Loads settings from `urlgist.toml`. Every key has a default, so a missing
//! file is not an error. The API token is never read from the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variables checked (in order) for the Hugging Face API token.
pub const TOKEN_ENV_VARS: [&str; 2] = ["HF_API_TOKEN", "HUGGINGFACEHUB_API_TOKEN"];

const CONFIG_FILE_NAME: &str = "urlgist.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("summary prompt must contain the {{text}} placeholder")]
    MissingPlaceholder,
}

/// Hosted inference endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Hugging Face model repository id
    pub model: String,
    /// Base URL the model id is appended to
    pub base_url: String,
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_new_tokens: u32,
    pub timeout_secs: u64,
}

/// Content loader settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// User-Agent sent by the generic page loader
    pub user_agent: String,
    /// Skip TLS certificate verification when fetching pages
    pub accept_invalid_certs: bool,
    pub timeout_secs: u64,
    /// Transcript languages, most preferred first
    pub languages: Vec<String>,
    /// Attach video title, author etc. to transcript documents
    pub video_metadata: bool,
}

/// Summarization prompt settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Prompt template with a single `{text}` placeholder
    pub prompt: String,
    /// Combined document text is cut to this many characters
    pub max_input_chars: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive, overridden by `URLGIST_LOG`
    pub level: String,
    /// Write logs here instead of stderr
    pub file: Option<PathBuf>,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: EndpointConfig,
    pub loader: LoaderConfig,
    pub summary: SummaryConfig,
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from the default location (urlgist.toml in cwd or home)
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;

        if !config.summary.prompt.contains("{text}") {
            return Err(ConfigError::MissingPlaceholder);
        }

        Ok(config)
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from(CONFIG_FILE_NAME);
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        let home_config = dirs::home_dir()?
            .join(".config")
            .join("urlgist")
            .join(CONFIG_FILE_NAME);
        home_config.exists().then_some(home_config)
    }
}

/// Read the API token from the environment, if one is set and non-blank
pub fn token_from_env() -> Option<String> {
    TOKEN_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            model: "mistralai/Mistral-7B-Instruct-v0.3".to_string(),
            base_url: "https://router.huggingface.co/hf-inference/models".to_string(),
            temperature: 0.7,
            max_new_tokens: 512,
            timeout_secs: 120,
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            user_agent: crate::scraper::BROWSER_USER_AGENT.to_string(),
            accept_invalid_certs: true,
            timeout_secs: 30,
            languages: vec!["en".to_string()],
            video_metadata: true,
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            prompt: crate::prompt::DEFAULT_TEMPLATE.to_string(),
            max_input_chars: Some(24_000),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_file_yields_defaults() {
        let file = write_config("");
        let config = Config::load_from(file.path()).unwrap();

        assert_eq!(config.endpoint.model, "mistralai/Mistral-7B-Instruct-v0.3");
        assert_eq!(config.endpoint.temperature, 0.7);
        assert!(config.loader.accept_invalid_certs);
        assert_eq!(config.loader.languages, vec!["en".to_string()]);
        assert!(config.summary.prompt.contains("{text}"));
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let file = write_config(
            r#"
[endpoint]
model = "HuggingFaceH4/zephyr-7b-beta"
max_new_tokens = 256

[loader]
languages = ["de", "en"]
"#,
        );
        let config = Config::load_from(file.path()).unwrap();

        assert_eq!(config.endpoint.model, "HuggingFaceH4/zephyr-7b-beta");
        assert_eq!(config.endpoint.max_new_tokens, 256);
        assert_eq!(config.endpoint.timeout_secs, 120);
        assert_eq!(config.loader.languages, vec!["de", "en"]);
        assert_eq!(config.loader.timeout_secs, 30);
    }

    #[test]
    fn prompt_without_placeholder_is_rejected() {
        let file = write_config("[summary]\nprompt = \"Summarize this.\"\n");
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPlaceholder));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let file = write_config("[endpoint\nmodel = ");
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Config::load_from(Path::new("/nonexistent/urlgist.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }
}
