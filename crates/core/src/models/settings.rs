use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection and display settings for the forecast panel.
///
/// Mirrors what the host application would hand to the plugin: where the
/// server lives, how to authenticate, and the initial variant toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// API root of the server, e.g. "https://inventory.example.com/api/"
    pub base_url: String,

    /// Token sent as `Authorization: Token <key>`
    #[serde(default)]
    pub api_token: Option<String>,

    /// Request timeout (native targets only)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Whether forecasts include movements of variant parts
    #[serde(default)]
    pub include_variants: bool,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            include_variants: false,
        }
    }
}

impl Settings {
    /// Build settings from `STOCK_FORECAST_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(url) = lookup("STOCK_FORECAST_BASE_URL") {
            settings.base_url = url.trim().to_string();
        }

        settings.api_token = lookup("STOCK_FORECAST_API_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        if let Some(raw) = lookup("STOCK_FORECAST_TIMEOUT_SECS") {
            settings.timeout_secs = raw.trim().parse().map_err(|_| {
                CoreError::ValidationError(format!(
                    "STOCK_FORECAST_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                ))
            })?;
        }

        if let Some(raw) = lookup("STOCK_FORECAST_INCLUDE_VARIANTS") {
            settings.include_variants = parse_flag(&raw).ok_or_else(|| {
                CoreError::ValidationError(format!(
                    "STOCK_FORECAST_INCLUDE_VARIANTS must be true or false, got '{raw}'"
                ))
            })?;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the HTTP source could not work with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.base_url.is_empty() {
            return Err(CoreError::ValidationError("base_url must not be empty".into()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(CoreError::ValidationError(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(CoreError::ValidationError("timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
