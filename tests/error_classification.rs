//! Behavior tests for mapping upstream failures to typed errors.

mod common;

use std::sync::Arc;

use common::{client_with, observations_body, CountingLimiter, ScriptedHttpClient};
use fredboard_core::{
    FredErrorKind, HttpError, HttpResponse, ObservationsRequest, SeriesId,
};

fn request(id: &str) -> ObservationsRequest {
    ObservationsRequest::new(SeriesId::parse(id).expect("valid id"))
}

// =============================================================================
// Status classification
// =============================================================================

#[tokio::test]
async fn upstream_429_is_a_rate_limit_error() {
    // Given: upstream is throttling us
    let client = client_with(ScriptedHttpClient::always(429, ""), CountingLimiter::new());

    // When: a series is requested
    let error = client.observations(&request("UNRATE")).await.expect_err("must fail");

    // Then: the caller is told to back off
    assert_eq!(error.kind(), FredErrorKind::RateLimited);
    assert_eq!(error.status(), 429);
    assert_eq!(error.message(), "FRED API rate limit exceeded");
    assert!(error.retryable());
}

#[tokio::test]
async fn upstream_404_is_a_not_found_error() {
    let client = client_with(
        ScriptedHttpClient::always(404, "Not Found"),
        CountingLimiter::new(),
    );

    let error = client.observations(&request("NOPE")).await.expect_err("must fail");

    assert_eq!(error.kind(), FredErrorKind::NotFound);
    assert_eq!(error.status(), 404);
    assert!(!error.retryable());
}

#[tokio::test]
async fn upstream_400_is_reported_as_404_carrying_the_body() {
    // Given: upstream signals an unknown series with 400
    let client = client_with(
        ScriptedHttpClient::always(400, "Bad Request.  The series does not exist."),
        CountingLimiter::new(),
    );

    // When: the series is requested
    let error = client.observations(&request("NOPE")).await.expect_err("must fail");

    // Then: callers see a 404 and the upstream code stays in the message
    assert_eq!(error.kind(), FredErrorKind::NotFound);
    assert_eq!(error.status(), 404);
    assert!(error.message().starts_with("FRED API error (400): "));
    assert!(error.message().contains("The series does not exist."));
}

#[tokio::test]
async fn upstream_503_is_a_generic_api_error_with_its_status() {
    // Given: upstream is unavailable
    let http = ScriptedHttpClient::new(|_| {
        Ok(HttpResponse {
            status: 503,
            reason: Some(String::from("Service Unavailable")),
            body: String::from("<html>maintenance</html>"),
        })
    });
    let client = client_with(http, CountingLimiter::new());

    // When: a series is requested
    let error = client.observations(&request("GDP")).await.expect_err("must fail");

    // Then: the upstream status is preserved
    assert_eq!(error.kind(), FredErrorKind::Api);
    assert_eq!(error.status(), 503);
    assert_eq!(error.message(), "FRED API request failed: 503 Service Unavailable");
}

#[tokio::test]
async fn transport_failure_maps_to_500() {
    // Given: the connection cannot be established
    let http = ScriptedHttpClient::new(|_| Err(HttpError::new("connection failed: refused")));
    let client = client_with(http, CountingLimiter::new());

    // When: a series is requested
    let error = client.observations(&request("GDP")).await.expect_err("must fail");

    // Then: the failure is a retryable transport error
    assert_eq!(error.kind(), FredErrorKind::Transport);
    assert_eq!(error.status(), 500);
    assert!(error.retryable());
    assert!(!error.message().contains("test-key"));
}

// =============================================================================
// Error paths leave the cache untouched
// =============================================================================

#[tokio::test]
async fn failed_fetch_is_not_cached_and_next_success_goes_upstream() {
    // Given: upstream fails once, then recovers
    let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let http = ScriptedHttpClient::new(move |_| {
        let attempt = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if attempt == 0 {
            Ok(HttpResponse::new(500, "internal error"))
        } else {
            Ok(HttpResponse::ok_json(observations_body(&[("2024-01-01", "1.0")])))
        }
    });
    let limiter = CountingLimiter::new();
    let client = client_with(Arc::clone(&http), Arc::clone(&limiter));

    // When: the same request is made after the failure
    let error = client.observations(&request("DFF")).await.expect_err("first attempt fails");
    assert!(client.cache().is_empty(), "errors must not be cached");
    let recovered = client.observations(&request("DFF")).await.expect("second attempt");

    // Then: the retry went upstream instead of replaying the failure
    assert_eq!(error.status(), 500);
    assert!(!recovered.cached);
    assert_eq!(http.call_count(), 2);
    assert_eq!(limiter.acquire_count(), 2);
}
