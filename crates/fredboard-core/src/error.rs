use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Local parameter validation errors. None of these are caused by upstream.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("series_id is required")]
    EmptySeriesId,
    #[error("series_id length {len} exceeds max {max}")]
    SeriesIdTooLong { len: usize, max: usize },
    #[error("series_id contains invalid character '{ch}' at index {index}")]
    SeriesIdInvalidChar { ch: char, index: usize },

    #[error("search_text (or q) is required")]
    EmptySearchText,
    #[error("category_id is required")]
    MissingCategoryId,

    #[error("series_ids must be a non-empty array")]
    EmptySeriesList,
    #[error("Maximum {max} series per request, got {count}")]
    TooManySeries { count: usize, max: usize },

    #[error("{field} must be a YYYY-MM-DD date: '{value}'")]
    InvalidDate { field: &'static str, value: String },
    #[error("observation_start {start} is after observation_end {end}")]
    InvertedDateRange { start: String, end: String },
    #[error("timestamp must be RFC3339 UTC: '{value}'")]
    TimestampNotUtc { value: String },

    #[error("invalid {field} '{value}', expected one of {expected}")]
    InvalidOption {
        field: &'static str,
        value: String,
        expected: String,
    },
    #[error("{field} must be an integer: '{value}'")]
    InvalidInteger { field: &'static str, value: String },
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}

/// Configuration errors raised while loading settings from the environment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {name} must be a positive integer: '{value}'")]
    InvalidNumber { name: &'static str, value: String },
    #[error("{name} must be greater than zero")]
    ZeroLimit { name: &'static str },
}

/// Classification of a failed client operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FredErrorKind {
    /// Upstream answered 429.
    RateLimited,
    /// Upstream answered 400 or 404: unknown series or malformed query.
    NotFound,
    /// Any other non-2xx upstream answer.
    Api,
    /// The request never produced an HTTP response.
    Transport,
    /// A 2xx body did not match the expected shape.
    Decode,
    /// Rejected locally before any upstream call.
    Validation,
    /// No provider credential is configured.
    MissingCredential,
    /// Client settings are unusable.
    Config,
}

/// Typed error carrying a message and an HTTP-like status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FredError {
    kind: FredErrorKind,
    message: String,
    status: u16,
    retryable: bool,
}

impl FredError {
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: FredErrorKind::RateLimited,
            message: message.into(),
            status: 429,
            retryable: true,
        }
    }

    /// Always 404; upstream reports unknown series as 400, so the upstream code
    /// only appears in the message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: FredErrorKind::NotFound,
            message: message.into(),
            status: 404,
            retryable: false,
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: FredErrorKind::Api,
            message: message.into(),
            status,
            retryable: status >= 500,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FredErrorKind::Transport,
            message: message.into(),
            status: 500,
            retryable: true,
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: FredErrorKind::Decode,
            message: message.into(),
            status: 500,
            retryable: false,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: FredErrorKind::Validation,
            message: message.into(),
            status: 400,
            retryable: false,
        }
    }

    pub fn missing_credential(variable: &str) -> Self {
        Self {
            kind: FredErrorKind::MissingCredential,
            message: format!("{variable} environment variable is not set"),
            status: 500,
            retryable: false,
        }
    }

    pub const fn kind(&self) -> FredErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn status(&self) -> u16 {
        self.status
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FredErrorKind::RateLimited => "fred.rate_limited",
            FredErrorKind::NotFound => "fred.not_found",
            FredErrorKind::Api => "fred.api",
            FredErrorKind::Transport => "fred.transport",
            FredErrorKind::Decode => "fred.decode",
            FredErrorKind::Validation => "fred.validation",
            FredErrorKind::MissingCredential => "fred.missing_credential",
            FredErrorKind::Config => "fred.config",
        }
    }
}

impl Display for FredError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for FredError {}

impl From<ValidationError> for FredError {
    fn from(error: ValidationError) -> Self {
        Self::validation(error.to_string())
    }
}

impl From<ConfigError> for FredError {
    fn from(error: ConfigError) -> Self {
        Self {
            kind: FredErrorKind::Config,
            message: error.to_string(),
            status: 500,
            retryable: false,
        }
    }
}
