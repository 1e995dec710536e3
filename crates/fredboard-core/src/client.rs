use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cache::{cache_key, ResponseCache};
use crate::config::{FredConfig, FRED_API_KEY_VAR};
use crate::domain::{
    CategorySeriesResponse, MultiSeriesResponse, MultiSeriesResult, ObservationsResponse,
    SearchResponse, SeriesResponse,
};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
use crate::params::QueryParams;
use crate::rate_limiter::{Limiter, TokenBucket};
use crate::request::{
    CategorySeriesRequest, Endpoint, MultiSeriesRequest, ObservationsRequest, SearchRequest,
    SeriesRequest,
};
use crate::FredError;

pub(crate) const API_KEY_PARAM: &str = "api_key";
pub(crate) const FILE_TYPE_PARAM: &str = "file_type";
pub(crate) const FILE_TYPE_JSON: &str = "json";

/// A decoded upstream body and whether it was served from the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub cached: bool,
}

/// Client for the upstream statistical API.
///
/// Every call goes cache, then rate limiter, then HTTP. A cache hit never
/// touches the limiter, and nothing is cached on an error path.
#[derive(Clone)]
pub struct FredClient {
    api_key: String,
    base_url: String,
    request_timeout: Option<Duration>,
    http: Arc<dyn HttpClient>,
    cache: Arc<ResponseCache>,
    limiter: Arc<dyn Limiter>,
}

impl std::fmt::Debug for FredClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FredClient")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("cache", &self.cache.stats())
            .field("limiter", &self.limiter.status())
            .finish_non_exhaustive()
    }
}

impl FredClient {
    /// Fails immediately when no credential is configured.
    pub fn new(config: &FredConfig) -> Result<Self, FredError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| FredError::missing_credential(FRED_API_KEY_VAR))?;
        config.validate()?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            request_timeout: config.request_timeout,
            http: Arc::new(ReqwestHttpClient::new()),
            cache: Arc::new(ResponseCache::new(
                config.cache_max_entries,
                config.cache_ttl,
            )),
            limiter: Arc::new(TokenBucket::new(config.rate_limit_per_minute)?),
        })
    }

    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = http;
        self
    }

    /// Shares an existing cache, e.g. the process-wide one.
    pub fn with_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_limiter(mut self, limiter: Arc<dyn Limiter>) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn limiter(&self) -> &Arc<dyn Limiter> {
        &self.limiter
    }

    /// Fetches and decodes one endpoint.
    pub async fn fetch<T>(&self, endpoint: Endpoint, params: QueryParams) -> Result<Fetched<T>, FredError>
    where
        T: DeserializeOwned,
    {
        let params = params.with(FILE_TYPE_PARAM, FILE_TYPE_JSON);
        let key = cache_key(endpoint.as_str(), &params);

        if let Some(body) = self.cache.get(&key) {
            tracing::debug!(%endpoint, "cache hit");
            let data = decode(endpoint, body)?;
            return Ok(Fetched { data, cached: true });
        }
        tracing::debug!(%endpoint, "cache miss");

        self.limiter.acquire().await;

        let request = HttpRequest::get(format!("{}/{}", self.base_url, endpoint.as_str()))
            .with_query(params.iter())
            .with_query_param(API_KEY_PARAM, self.api_key.as_str())
            .with_header("Accept", "application/json")
            .with_timeout(self.request_timeout);

        let response = self.http.execute(request).await.map_err(|error| {
            tracing::warn!(%endpoint, error = %error, "upstream transport failure");
            FredError::transport(format!("FRED API request failed: {error}"))
        })?;

        if !response.is_success() {
            let error = classify(&response);
            tracing::warn!(%endpoint, status = response.status, code = error.code(), "upstream request failed");
            return Err(error);
        }

        let body: Value = serde_json::from_str(&response.body).map_err(|error| {
            FredError::decode(format!("FRED API returned invalid JSON for {endpoint}: {error}"))
        })?;
        let data = decode(endpoint, body.clone())?;
        self.cache.set(key, body);

        Ok(Fetched {
            data,
            cached: false,
        })
    }

    pub async fn observations(
        &self,
        request: &ObservationsRequest,
    ) -> Result<Fetched<ObservationsResponse>, FredError> {
        self.fetch(Endpoint::Observations, request.to_params()).await
    }

    pub async fn series_info(
        &self,
        request: &SeriesRequest,
    ) -> Result<Fetched<SeriesResponse>, FredError> {
        self.fetch(Endpoint::Series, request.to_params()).await
    }

    pub async fn search(
        &self,
        request: &SearchRequest,
    ) -> Result<Fetched<SearchResponse>, FredError> {
        self.fetch(Endpoint::Search, request.to_params()).await
    }

    pub async fn category_series(
        &self,
        request: &CategorySeriesRequest,
    ) -> Result<Fetched<CategorySeriesResponse>, FredError> {
        self.fetch(Endpoint::CategorySeries, request.to_params()).await
    }

    /// Fetches every series concurrently. Never fails as a whole: each slot holds
    /// either observations or the error that series hit, in input order.
    pub async fn multiple_observations(&self, request: &MultiSeriesRequest) -> MultiSeriesResponse {
        let fetches = request.series_ids.iter().map(|raw_id| async move {
            let outcome = match request.observations_for(raw_id) {
                Ok(single) => self
                    .observations(&single)
                    .await
                    .map(|fetched| fetched.data.observations),
                Err(error) => Err(FredError::from(error)),
            };

            match outcome {
                Ok(observations) => MultiSeriesResult::success(raw_id.as_str(), observations),
                Err(error) => {
                    tracing::warn!(series_id = %raw_id, code = error.code(), "series fetch failed");
                    MultiSeriesResult::failure(raw_id.as_str(), error.message())
                }
            }
        });

        MultiSeriesResponse {
            results: join_all(fetches).await,
        }
    }
}

fn decode<T: DeserializeOwned>(endpoint: Endpoint, body: Value) -> Result<T, FredError> {
    serde_json::from_value(body).map_err(|error| {
        FredError::decode(format!("unexpected FRED API response for {endpoint}: {error}"))
    })
}

/// Maps a non-2xx upstream response to the error taxonomy.
pub fn classify(response: &HttpResponse) -> FredError {
    match response.status {
        429 => FredError::rate_limited("FRED API rate limit exceeded"),
        400 | 404 => FredError::not_found(format!(
            "FRED API error ({}): {}",
            response.status,
            response.body.trim()
        )),
        status => {
            let reason = response.reason.as_deref().unwrap_or_default();
            FredError::api(
                status,
                format!("FRED API request failed: {status} {reason}")
                    .trim_end()
                    .to_owned(),
            )
        }
    }
}
