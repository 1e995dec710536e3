//! # Fredboard Core
//!
//! Data-access layer for the FRED economic time-series API.
//!
//! ## Overview
//!
//! - **API client** that routes every call through a response cache and a
//!   token-bucket rate limiter before reaching upstream
//! - **Multi-series fan-out** with per-series failure isolation
//! - **Typed errors** carrying an HTTP-like status code
//! - **Domain models** for series metadata and observations, with the
//!   upstream missing-value sentinel decoded as `None`
//! - **Response envelope** shared by the handler surface
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Bounded TTL response cache and request signatures |
//! | [`client`] | API client and multi-series fan-out |
//! | [`config`] | Environment-driven settings and credential status |
//! | [`domain`] | Series identifiers, dates, option enums, response models |
//! | [`envelope`] | `{data, error, cached, timestamp}` response envelope |
//! | [`error`] | Error taxonomy |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`key_check`] | Live credential check against upstream |
//! | [`params`] | Normalized query parameters |
//! | [`presets`] | Curated series groups |
//! | [`rate_limiter`] | Token-bucket admission gate |
//! | [`request`] | Validated per-endpoint requests |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fredboard_core::{FredClient, FredConfig, ObservationsRequest, SeriesId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FredClient::new(&FredConfig::from_env()?)?;
//!
//!     let request = ObservationsRequest::new(SeriesId::parse("UNRATE")?);
//!     let fetched = client.observations(&request).await?;
//!
//!     for observation in &fetched.data.observations {
//!         println!("{} {:?}", observation.date, observation.value);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Request Flow
//!
//! ```text
//! handler ─▶ FredClient ─▶ ResponseCache ──hit──▶ { data, cached: true }
//!                              │ miss
//!                              ▼
//!                         TokenBucket ─▶ HttpClient ─▶ upstream
//!                                                         │ 2xx
//!                              ┌──────────────────────────┘
//!                              ▼
//!                      cache write ─▶ { data, cached: false }
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use fredboard_core::{FredError, FredErrorKind};
//!
//! fn describe(error: &FredError) -> &'static str {
//!     match error.kind() {
//!         FredErrorKind::RateLimited => "back off",
//!         FredErrorKind::NotFound | FredErrorKind::Validation => "fix the query",
//!         _ => "try again later",
//!     }
//! }
//!
//! assert_eq!(describe(&FredError::rate_limited("slow down")), "back off");
//! ```
//!
//! ## Security
//!
//! - The API key is read from the environment and is never logged or echoed in errors
//! - All HTTP requests use TLS via rustls

pub mod cache;
pub mod client;
pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod key_check;
pub mod params;
pub mod presets;
pub mod rate_limiter;
pub mod request;

// Caching
pub use cache::{cache_key, CacheStats, ResponseCache};

// Client
pub use client::{classify, Fetched, FredClient};

// Configuration
pub use config::{FredConfig, KeyStatus};

// Domain models
pub use domain::{
    parse_observation_value, AggregationMethod, CategorySeriesResponse, FilterVariable, Frequency,
    MultiSeriesResponse, MultiSeriesResult, Observation, ObservationDate, ObservationsResponse,
    SearchOrderBy, SearchResponse, SearchType, SeriesId, SeriesInfo, SeriesPage, SeriesResponse,
    SortOrder, Units, UtcDateTime,
};

// Envelope
pub use envelope::Envelope;

// Error types
pub use error::{ConfigError, FredError, FredErrorKind, ValidationError};

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

// Credential checks
pub use key_check::{check_fred_key, KeyCheck};

// Query parameters
pub use params::QueryParams;

// Presets
pub use presets::{find_preset, PresetGroup, SeriesPreset, PRESETS};

// Rate limiting
pub use rate_limiter::{Limiter, RateLimiterStatus, TokenBucket};

// Requests
pub use request::{
    parse_bounded, CategorySeriesRequest, Endpoint, ListingOptions, MultiSeriesRequest,
    ObservationsRequest, SearchRequest, SeriesRequest,
};
