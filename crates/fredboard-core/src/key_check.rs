//! Live validation of a FRED credential.
//!
//! A key is checked by fetching the metadata of a long-lived series with it.
//! The check bypasses the response cache and the rate limiter: the result must
//! reflect upstream right now, and the key under test is usually not the one
//! the process is configured with.

use std::time::Duration;

use serde::Serialize;

use crate::client::{API_KEY_PARAM, FILE_TYPE_JSON, FILE_TYPE_PARAM};
use crate::http_client::{HttpClient, HttpRequest};
use crate::request::Endpoint;

/// Series fetched to test a key. Annual real GNP, published since 1929.
pub const KEY_CHECK_SERIES: &str = "GNPCA";

const ERROR_PREVIEW_CHARS: usize = 100;

/// Outcome of checking one credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyCheck {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl KeyCheck {
    pub fn valid() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
        }
    }
}

/// Checks `api_key` against upstream.
///
/// Upstream answers 400 for an unknown key. Other failures report the first
/// characters of the upstream body or the transport error.
pub async fn check_fred_key(
    http: &dyn HttpClient,
    base_url: &str,
    api_key: &str,
    timeout: Option<Duration>,
) -> KeyCheck {
    let request = HttpRequest::get(format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        Endpoint::Series.as_str()
    ))
    .with_query_param("series_id", KEY_CHECK_SERIES)
    .with_query_param(API_KEY_PARAM, api_key)
    .with_query_param(FILE_TYPE_PARAM, FILE_TYPE_JSON)
    .with_timeout(timeout);

    match http.execute(request).await {
        Ok(response) if response.is_success() => KeyCheck::valid(),
        Ok(response) if response.status == 400 => KeyCheck::invalid("Invalid API key"),
        Ok(response) => {
            tracing::debug!(status = response.status, "key check rejected upstream");
            let preview: String = response.body.chars().take(ERROR_PREVIEW_CHARS).collect();
            KeyCheck::invalid(format!("FRED error: {preview}"))
        }
        Err(error) => KeyCheck::invalid(error.message()),
    }
}
