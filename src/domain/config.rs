//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! Every section is optional; credentials are normally supplied through the environment.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::domain::error::ConfigError;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration for the connected services.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ServicesConfig {
    #[serde(default)]
    pub practicum: PracticumConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
}

/// Homework review API.
#[derive(Debug, Deserialize, Clone)]
pub struct PracticumConfig {
    #[serde(default = "default_practicum_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_practicum_token_env")]
    pub token_env: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for PracticumConfig {
    fn default() -> Self {
        Self {
            endpoint: default_practicum_endpoint(),
            token: None,
            token_env: default_practicum_token_env(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Telegram Bot API.
#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_telegram_token_env")]
    pub token_env: String, // e.g. "TELEGRAM_TOKEN"
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default = "default_telegram_chat_id_env")]
    pub chat_id_env: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: default_telegram_api_base(),
            token: None,
            token_env: default_telegram_token_env(),
            chat_id: None,
            chat_id_env: default_telegram_chat_id_env(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollConfig {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub directory: String,
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    #[serde(default = "default_console")]
    pub console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_log_dir(),
            max_files: default_max_files(),
            console: default_console(),
        }
    }
}

fn default_practicum_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}
fn default_practicum_token_env() -> String {
    "PRACTICUM_TOKEN".to_string()
}
fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}
fn default_telegram_token_env() -> String {
    "TELEGRAM_TOKEN".to_string()
}
fn default_telegram_chat_id_env() -> String {
    "TELEGRAM_CHAT_ID".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_interval() -> u64 {
    600
}
fn default_log_dir() -> String {
    crate::domain::paths::DATA_DIR.to_string()
}
fn default_max_files() -> usize {
    5
}
fn default_console() -> bool {
    true
}

/// The three secrets the notifier cannot run without.
#[derive(Clone)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"***")
            .field("telegram_token", &"***")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

impl AppConfig {
    /// Load from a YAML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserializes to unit, not to an empty mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Resolve all credentials. Inline values win over the environment, and
    /// blank values count as missing. Every missing name is reported at once.
    pub fn credentials<F>(&self, lookup: F) -> Result<Credentials, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let practicum = &self.services.practicum;
        let telegram = &self.services.telegram;

        let practicum_token = resolve(&practicum.token, &practicum.token_env, &lookup);
        let telegram_token = resolve(&telegram.token, &telegram.token_env, &lookup);
        let telegram_chat_id = resolve(&telegram.chat_id, &telegram.chat_id_env, &lookup);

        match (practicum_token, telegram_token, telegram_chat_id) {
            (Some(practicum_token), Some(telegram_token), Some(telegram_chat_id)) => {
                Ok(Credentials {
                    practicum_token,
                    telegram_token,
                    telegram_chat_id,
                })
            }
            (p, t, c) => {
                let mut missing = Vec::new();
                if p.is_none() {
                    missing.push(practicum.token_env.clone());
                }
                if t.is_none() {
                    missing.push(telegram.token_env.clone());
                }
                if c.is_none() {
                    missing.push(telegram.chat_id_env.clone());
                }
                Err(ConfigError::MissingCredentials(missing))
            }
        }
    }
}

fn resolve<F>(inline: &Option<String>, env_key: &str, lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    inline
        .clone()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| lookup(env_key).filter(|v| !v.trim().is_empty()))
}
