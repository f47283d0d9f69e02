use crate::api::completion::{
    CompletionSettings, DEFAULT_FALLBACK_REPLY, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, OPENAI_BASE_URL,
};
use crate::api::dexscreener::DEXSCREENER_BASE_URL;
use crate::api::retry::{Backoff, RetryConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_dexscreener_base_url")]
    pub dexscreener_base_url: String,
    #[serde(default = "default_completion_base_url")]
    pub completion_base_url: String,
    #[serde(default = "default_completion_model")]
    pub completion_model: String,
    #[serde(default = "default_completion_max_tokens")]
    pub completion_max_tokens: u32,
    #[serde(default = "default_completion_temperature")]
    pub completion_temperature: f32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,
    #[serde(default = "default_user_fetch_delay_ms")]
    pub user_fetch_delay_ms: u64,
}

fn default_dexscreener_base_url() -> String {
    DEXSCREENER_BASE_URL.to_string()
}

fn default_completion_base_url() -> String {
    OPENAI_BASE_URL.to_string()
}

fn default_completion_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_completion_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_completion_temperature() -> f32 {
    0.7
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_fallback_reply() -> String {
    DEFAULT_FALLBACK_REPLY.to_string()
}

fn default_user_fetch_delay_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dexscreener_base_url: default_dexscreener_base_url(),
            completion_base_url: default_completion_base_url(),
            completion_model: default_completion_model(),
            completion_max_tokens: default_completion_max_tokens(),
            completion_temperature: default_completion_temperature(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            fallback_reply: default_fallback_reply(),
            user_fetch_delay_ms: default_user_fetch_delay_ms(),
        }
    }
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("token-desk");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        Ok(config_dir.join("config.json"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Read `path`, writing defaults there first if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Zero timeouts would fail every request; blank replies would hide the
    /// fallback entirely.
    fn normalize(&mut self) {
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = default_request_timeout_secs();
        }
        if self.fallback_reply.trim().is_empty() {
            self.fallback_reply = default_fallback_reply();
        }
    }

    /// The AI credential lives only in the environment (or `.env`), never
    /// in the config file.
    pub fn api_key() -> Option<String> {
        std::env::var(API_KEY_VAR)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn user_fetch_delay(&self) -> Duration {
        Duration::from_millis(self.user_fetch_delay_ms)
    }

    pub fn completion_settings(&self) -> CompletionSettings {
        CompletionSettings {
            model: self.completion_model.clone(),
            max_tokens: self.completion_max_tokens,
            temperature: self.completion_temperature,
        }
    }

    /// Token lookups are idempotent GETs: exponential backoff.
    pub fn lookup_retry(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            initial_delay: Duration::from_millis(self.retry_delay_ms),
            max_delay: Duration::from_secs(10),
            backoff: Backoff::Exponential,
        }
    }

    pub fn completion_retry(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            initial_delay: Duration::from_millis(self.retry_delay_ms),
            max_delay: Duration::from_secs(10),
            backoff: Backoff::Linear,
        }
    }
}
