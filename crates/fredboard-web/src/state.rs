use std::sync::Arc;
use std::time::Duration;

use fredboard_core::{
    check_fred_key, ConfigError, FredClient, FredConfig, FredError, HttpClient, KeyCheck,
    KeyStatus, ReqwestHttpClient, ResponseCache, TokenBucket,
};

/// Process-wide state shared by every handler.
///
/// The cache and limiter are created once and shared by every request. A
/// client that could not be built keeps its error so routes that need it
/// report it, while `/api/status` keeps working.
#[derive(Clone)]
pub struct AppState {
    client: Result<Arc<FredClient>, FredError>,
    cache: Arc<ResponseCache>,
    limiter: Arc<TokenBucket>,
    keys: KeyStatus,
    http: Arc<dyn HttpClient>,
    base_url: String,
    request_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(config: &FredConfig, keys: KeyStatus) -> Result<Self, ConfigError> {
        config.validate()?;
        let cache = Arc::new(ResponseCache::new(config.cache_max_entries, config.cache_ttl));
        let limiter = Arc::new(TokenBucket::new(config.rate_limit_per_minute)?);
        let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());

        let client = FredClient::new(config).map(|client| {
            Arc::new(
                client
                    .with_http_client(Arc::clone(&http))
                    .with_cache(Arc::clone(&cache))
                    .with_limiter(limiter.clone()),
            )
        });
        if let Err(error) = &client {
            tracing::warn!(error = %error, "FRED client unavailable; data routes will fail");
        }

        Ok(Self {
            client,
            cache,
            limiter,
            keys,
            http,
            base_url: config.base_url.clone(),
            request_timeout: config.request_timeout,
        })
    }

    /// Routes upstream calls through `http` instead of the default transport.
    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.client = self.client.map(|client| {
            Arc::new(FredClient::clone(&client).with_http_client(Arc::clone(&http)))
        });
        self.http = http;
        self
    }

    pub fn client(&self) -> Result<&FredClient, FredError> {
        self.client.as_deref().map_err(Clone::clone)
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn limiter(&self) -> &TokenBucket {
        &self.limiter
    }

    pub fn keys(&self) -> KeyStatus {
        self.keys
    }

    /// Checks a caller-supplied key against upstream through the shared transport.
    pub async fn check_fred_key(&self, api_key: &str) -> KeyCheck {
        check_fred_key(self.http.as_ref(), &self.base_url, api_key, self.request_timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fredboard_core::FredErrorKind;

    #[test]
    fn missing_key_is_deferred_to_first_use() {
        let state = AppState::new(&FredConfig::default(), KeyStatus::from_lookup(|_| None))
            .expect("state builds without a key");

        let error = state.client().expect_err("no client without key");
        assert_eq!(error.kind(), FredErrorKind::MissingCredential);
        assert_eq!(state.cache().stats().max_size, 500);
    }

    #[test]
    fn zero_cache_size_fails_fast() {
        let config = FredConfig {
            cache_max_entries: 0,
            ..FredConfig::default()
        };
        assert!(AppState::new(&config, KeyStatus::from_lookup(|_| None)).is_err());
    }
}
