//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BISTRO_API_URL` - Backend base URL; menu and checkout are disabled without it
//! - `BISTRO_TRANSLATIONS` - `http(s)://` base URL or directory of `<code>.json`
//!   files (default: ./locales)
//! - `BISTRO_STATE_FILE` - File holding the cart and language preference
//!   (default: ./bistro-state.json)
//! - `BISTRO_CURRENCY` - Display currency code (default: EUR)
//! - `BISTRO_HTTP_TIMEOUT_SECS` - HTTP request timeout (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use bistro_core::CurrencyCode;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where translation files are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationsLocation {
    Url(Url),
    Dir(PathBuf),
}

impl TranslationsLocation {
    /// Interpret a configured value: `http(s)://` values are URLs, anything
    /// else is a directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for a malformed URL.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            return parse_url("BISTRO_TRANSLATIONS", value).map(Self::Url);
        }
        Ok(Self::Dir(PathBuf::from(value)))
    }
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend base URL.
    pub api_url: Option<Url>,
    pub translations: TranslationsLocation,
    pub state_file: PathBuf,
    pub currency: CurrencyCode,
    pub http_timeout: Duration,
    /// Sentry DSN for error tracking (optional).
    pub sentry_dsn: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            translations: TranslationsLocation::Dir(PathBuf::from("./locales")),
            state_file: PathBuf::from("./bistro-state.json"),
            currency: CurrencyCode::default(),
            http_timeout: Duration::from_secs(10),
            sentry_dsn: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = get_optional_env("BISTRO_API_URL")
            .map(|value| parse_url("BISTRO_API_URL", &value))
            .transpose()?;
        let translations =
            TranslationsLocation::parse(&get_env_or_default("BISTRO_TRANSLATIONS", "./locales"))?;
        let state_file = PathBuf::from(get_env_or_default(
            "BISTRO_STATE_FILE",
            "./bistro-state.json",
        ));
        let currency = get_env_or_default("BISTRO_CURRENCY", "EUR")
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("BISTRO_CURRENCY".to_string(), e))?;
        let http_timeout =
            parse_timeout(&get_env_or_default("BISTRO_HTTP_TIMEOUT_SECS", "10"))?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            api_url,
            translations,
            state_file,
            currency,
            http_timeout,
            sentry_dsn,
        })
    }

    /// Build the shared HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(self.http_timeout)
            .user_agent(concat!("bistro/", env!("CARGO_PKG_VERSION")))
            .build()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    let secs = value.trim().parse::<u64>().map_err(|e| {
        ConfigError::InvalidEnvVar("BISTRO_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
    })?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            "BISTRO_HTTP_TIMEOUT_SECS".to_string(),
            "must be at least 1 second".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}
