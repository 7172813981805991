//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client behavior settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Review volume caps
    #[serde(default)]
    pub quotas: QuotaConfig,

    /// App Store pipeline settings
    #[serde(default)]
    pub apple: AppleConfig,

    /// Google Play pipeline settings
    #[serde(default)]
    pub google: GoogleConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agents.is_empty() {
            return Err(AppError::config("http.user_agents is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::config("http.timeout_secs must be > 0"));
        }
        if self.quotas.return_quota == 0 {
            return Err(AppError::config("quotas.return_quota must be > 0"));
        }
        if self.quotas.fetch_quota < self.quotas.return_quota {
            return Err(AppError::config(
                "quotas.fetch_quota must be >= quotas.return_quota",
            ));
        }
        if self.apple.page_size == 0 {
            return Err(AppError::config("apple.page_size must be > 0"));
        }
        if self.apple.retry_max_attempts == 0 {
            return Err(AppError::config("apple.retry_max_attempts must be > 0"));
        }
        if self.google.languages.is_empty() {
            return Err(AppError::config("google.languages is empty"));
        }
        Ok(())
    }
}

/// HTTP client behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent pool; one is picked at random per request
    #[serde(default = "defaults::user_agents")]
    pub user_agents: Vec<String>,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agents: defaults::user_agents(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Caps on how many reviews are fetched and returned per source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Raw reviews accumulated before ranking
    #[serde(default = "defaults::fetch_quota")]
    pub fetch_quota: usize,

    /// Reviews returned to the caller after ranking
    #[serde(default = "defaults::return_quota")]
    pub return_quota: usize,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            fetch_quota: defaults::fetch_quota(),
            return_quota: defaults::return_quota(),
        }
    }
}

/// App Store pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppleConfig {
    /// Storefront locale requested from the reviews endpoint
    #[serde(default = "defaults::apple_locale")]
    pub locale: String,

    /// Reviews per page
    #[serde(default = "defaults::page_size")]
    pub page_size: usize,

    /// Delay between successive page fetches in milliseconds
    #[serde(default = "defaults::page_delay")]
    pub page_delay_ms: u64,

    /// Maximum attempts for a single page fetch
    #[serde(default = "defaults::retry_max_attempts")]
    pub retry_max_attempts: u32,

    /// Base retry delay in seconds (scaled linearly on rate limits)
    #[serde(default = "defaults::retry_base_delay")]
    pub retry_base_delay_secs: u64,
}

impl Default for AppleConfig {
    fn default() -> Self {
        Self {
            locale: defaults::apple_locale(),
            page_size: defaults::page_size(),
            page_delay_ms: defaults::page_delay(),
            retry_max_attempts: defaults::retry_max_attempts(),
            retry_base_delay_secs: defaults::retry_base_delay(),
        }
    }
}

/// Google Play pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// Language buckets queried independently, each for half the fetch quota
    #[serde(default = "defaults::google_languages")]
    pub languages: Vec<String>,

    /// Storefront country for every language bucket
    #[serde(default = "defaults::google_country")]
    pub country: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            languages: defaults::google_languages(),
            country: defaults::google_country(),
        }
    }
}

mod defaults {
    pub fn user_agents() -> Vec<String> {
        vec![
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
        ]
    }

    pub fn timeout() -> u64 {
        30
    }

    pub fn fetch_quota() -> usize {
        150
    }

    pub fn return_quota() -> usize {
        50
    }

    pub fn apple_locale() -> String {
        "zh-TW".to_string()
    }

    pub fn page_size() -> usize {
        20
    }

    pub fn page_delay() -> u64 {
        500
    }

    pub fn retry_max_attempts() -> u32 {
        5
    }

    pub fn retry_base_delay() -> u64 {
        10
    }

    pub fn google_languages() -> Vec<String> {
        vec!["zh-TW".to_string(), "en".to_string()]
    }

    pub fn google_country() -> String {
        "tw".to_string()
    }
}
