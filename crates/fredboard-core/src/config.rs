use std::time::Duration;

use serde::Serialize;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org/fred";
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 120;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 500;

pub const FRED_API_KEY_VAR: &str = "FRED_API_KEY";
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

const FRED_KEY_PLACEHOLDER: &str = "your_api_key_here";
const OPENAI_KEY_PLACEHOLDER: &str = "your_openai_api_key_here";

/// Settings for the upstream client, its cache and its rate limiter.
#[derive(Clone, PartialEq, Eq)]
pub struct FredConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub rate_limit_per_minute: u32,
    pub cache_ttl: Duration,
    pub cache_max_entries: usize,
    pub request_timeout: Option<Duration>,
}

// The key is redacted so configs can be logged.
impl std::fmt::Debug for FredConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FredConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("cache_ttl", &self.cache_ttl)
            .field("cache_max_entries", &self.cache_max_entries)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for FredConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: String::from(DEFAULT_BASE_URL),
            rate_limit_per_minute: DEFAULT_RATE_LIMIT_PER_MINUTE,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            request_timeout: None,
        }
    }
}

impl FredConfig {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = configured(Some(api_key.into()), FRED_KEY_PLACEHOLDER);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            api_key: configured(lookup(FRED_API_KEY_VAR), FRED_KEY_PLACEHOLDER),
            base_url: lookup("FRED_BASE_URL")
                .map(|url| url.trim().trim_end_matches('/').to_owned())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.base_url),
            rate_limit_per_minute: read_number(&lookup, "FRED_RATE_LIMIT_PER_MINUTE")?
                .unwrap_or(defaults.rate_limit_per_minute),
            cache_ttl: read_number(&lookup, "FRED_CACHE_TTL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            cache_max_entries: read_number(&lookup, "FRED_CACHE_MAX_ENTRIES")?
                .unwrap_or(defaults.cache_max_entries),
            request_timeout: read_number(&lookup, "FRED_REQUEST_TIMEOUT_MS")?
                .map(Duration::from_millis),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit_per_minute == 0 {
            return Err(ConfigError::ZeroLimit {
                name: "rate_limit_per_minute",
            });
        }
        if self.cache_max_entries == 0 {
            return Err(ConfigError::ZeroLimit {
                name: "cache_max_entries",
            });
        }
        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

fn configured(value: Option<String>, placeholder: &str) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty() && value != placeholder)
}

fn read_number<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber { name, value: raw })
}

/// Which provider credentials are present, without exposing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyStatus {
    pub fred: bool,
    pub openai: bool,
    pub all_configured: bool,
}

impl KeyStatus {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let fred = configured(lookup(FRED_API_KEY_VAR), FRED_KEY_PLACEHOLDER).is_some();
        let openai = configured(lookup(OPENAI_API_KEY_VAR), OPENAI_KEY_PLACEHOLDER).is_some();
        Self {
            fred,
            openai,
            all_configured: fred && openai,
        }
    }
}
