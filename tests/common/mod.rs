//! Scripted transport and spying limiter shared by the behavior tests.
#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use fredboard_core::{
    FredClient, FredConfig, HttpClient, HttpError, HttpRequest, HttpResponse, Limiter,
    RateLimiterStatus,
};
use serde_json::json;

pub const TEST_API_KEY: &str = "test-key";
pub const TEST_BASE_URL: &str = "https://fred.test/fred";

type Responder = dyn Fn(&HttpRequest) -> Result<HttpResponse, HttpError> + Send + Sync;

/// Upstream stand-in that answers from a closure and records every request.
pub struct ScriptedHttpClient {
    responder: Box<Responder>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse, HttpError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Answers every request with the same status and body.
    pub fn always(status: u16, body: &str) -> Arc<Self> {
        let body = body.to_owned();
        Self::new(move |_| Ok(HttpResponse::new(status, body.clone())))
    }

    /// Serves two observations for any series, except the listed ids which get `status`.
    pub fn observations_failing_for(failing: &[&str], status: u16) -> Arc<Self> {
        let failing: Vec<String> = failing.iter().map(|id| (*id).to_owned()).collect();
        Self::new(move |request| {
            let series_id = request
                .query
                .get("series_id")
                .cloned()
                .unwrap_or_default();
            if failing.contains(&series_id) {
                return Ok(HttpResponse::new(
                    status,
                    r#"{"error_code":400,"error_message":"Bad Request.  The series does not exist."}"#,
                ));
            }
            Ok(HttpResponse::ok_json(observations_body(&[
                ("2024-01-01", "3.7"),
                ("2024-02-01", "3.9"),
            ])))
        })
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().expect("request log").len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("request log").clone()
    }

    pub fn requested_series(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|request| request.query.get("series_id").cloned())
            .collect()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let response = (self.responder)(&request);
            self.requests.lock().expect("request log").push(request);
            response
        })
    }
}

/// Limiter that admits immediately and counts how often it was asked.
#[derive(Default)]
pub struct CountingLimiter {
    acquires: AtomicUsize,
}

impl CountingLimiter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn acquire_count(&self) -> usize {
        self.acquires.load(Ordering::SeqCst)
    }
}

impl Limiter for CountingLimiter {
    fn acquire<'a>(&'a self) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        self.acquires.fetch_add(1, Ordering::SeqCst);
        Box::pin(async {})
    }

    fn status(&self) -> RateLimiterStatus {
        RateLimiterStatus {
            available_tokens: 0,
            max_tokens: 0,
        }
    }
}

pub fn test_config() -> FredConfig {
    FredConfig::default()
        .with_api_key(TEST_API_KEY)
        .with_base_url(TEST_BASE_URL)
}

pub fn client_with(http: Arc<ScriptedHttpClient>, limiter: Arc<CountingLimiter>) -> FredClient {
    FredClient::new(&test_config())
        .expect("test config carries a key")
        .with_http_client(http)
        .with_limiter(limiter)
}

pub fn observations_body(points: &[(&str, &str)]) -> String {
    let observations: Vec<_> = points
        .iter()
        .map(|(date, value)| {
            json!({
                "realtime_start": "2024-06-01",
                "realtime_end": "2024-06-01",
                "date": date,
                "value": value,
            })
        })
        .collect();

    json!({
        "realtime_start": "2024-06-01",
        "realtime_end": "2024-06-01",
        "observation_start": "1600-01-01",
        "observation_end": "9999-12-31",
        "units": "lin",
        "output_type": 1,
        "file_type": "json",
        "order_by": "observation_date",
        "sort_order": "asc",
        "count": observations.len(),
        "offset": 0,
        "limit": 100000,
        "observations": observations,
    })
    .to_string()
}
