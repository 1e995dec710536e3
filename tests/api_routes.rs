//! Route-level behavior of the HTTP surface, exercised in-process.

mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use common::{observations_body, test_config, ScriptedHttpClient};
use fredboard_core::{FredConfig, KeyStatus};
use fredboard_web::{router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn keys(fred: bool) -> KeyStatus {
    KeyStatus::from_lookup(|name| match name {
        "FRED_API_KEY" if fred => Some(String::from("configured")),
        _ => None,
    })
}

fn app_with(http: Arc<ScriptedHttpClient>) -> Router {
    let state = AppState::new(&test_config(), keys(true))
        .expect("valid config")
        .with_http_client(http);
    router(state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let body = serde_json::from_slice(&bytes).expect("JSON body");
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

// =============================================================================
// Observations
// =============================================================================

#[tokio::test]
async fn observations_route_wraps_data_in_envelope_and_reports_cache_hits() {
    // Given: upstream serves UNRATE
    let http = ScriptedHttpClient::always(200, &observations_body(&[("2024-01-01", ".")]));
    let app = app_with(Arc::clone(&http));

    // When: the route is hit twice
    let (first_status, first) = send(app.clone(), get("/api/fred/observations?series_id=UNRATE")).await;
    let (_, second) = send(app, get("/api/fred/observations?series_id=UNRATE")).await;

    // Then: both succeed, the second from cache
    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(first["cached"], false);
    assert_eq!(second["cached"], true);
    assert_eq!(first["error"], Value::Null);
    assert_eq!(first["data"]["observations"][0]["value"], Value::Null);
    assert!(first["timestamp"].is_string());
    assert_eq!(http.call_count(), 1);
}

#[tokio::test]
async fn observations_route_requires_series_id() {
    let http = ScriptedHttpClient::always(200, "{}");
    let app = app_with(Arc::clone(&http));

    let (status, body) = send(app, get("/api/fred/observations")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "series_id is required");
    assert_eq!(body["data"], Value::Null);
    assert_eq!(http.call_count(), 0);
}

#[tokio::test]
async fn observations_route_rejects_unknown_units() {
    let app = app_with(ScriptedHttpClient::always(200, "{}"));

    let (status, body) = send(app, get("/api/fred/observations?series_id=GDP&units=percent")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .is_some_and(|message| message.starts_with("invalid units 'percent'")));
}

#[tokio::test]
async fn upstream_status_is_mirrored_in_the_response() {
    let app = app_with(ScriptedHttpClient::always(404, "Not Found"));

    let (status, body) = send(app, get("/api/fred/observations?series_id=NOPE")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "FRED API error (404): Not Found");
    assert_eq!(body["cached"], false);
}

#[tokio::test]
async fn unknown_series_reported_by_upstream_as_400_answers_404() {
    // Given: upstream rejects an unknown series with 400
    let app = app_with(ScriptedHttpClient::always(
        400,
        "Bad Request.  The series does not exist.",
    ));

    // When: the series is requested
    let (status, body) = send(app, get("/api/fred/observations?series_id=NOPE")).await;

    // Then: the caller sees 404 in an error envelope
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["error"],
        "FRED API error (400): Bad Request.  The series does not exist."
    );
    assert_eq!(body["data"], Value::Null);
}

#[tokio::test]
async fn repeated_query_key_uses_first_value() {
    // Given: upstream serves any series
    let http = ScriptedHttpClient::always(200, &observations_body(&[("2024-01-01", "1.0")]));
    let app = app_with(Arc::clone(&http));

    // When: a parameter is repeated
    let (status, body) = send(
        app,
        get("/api/fred/observations?series_id=GDP&limit=1&limit=2"),
    )
    .await;

    // Then: the first value wins and the response is an envelope
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cached"], false);
    assert_eq!(http.requests()[0].query.get("limit").map(String::as_str), Some("1"));
}

#[tokio::test]
async fn undecodable_query_string_gets_an_error_envelope() {
    let http = ScriptedHttpClient::always(200, "{}");
    let app = app_with(Arc::clone(&http));

    let (status, body) = send(app, get("/api/fred/series?series_id=%FF")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .is_some_and(|message| message.starts_with("invalid query string")));
    assert_eq!(body["cached"], false);
    assert_eq!(http.call_count(), 0);
}

#[tokio::test]
async fn upstream_rate_limit_maps_to_429() {
    let app = app_with(ScriptedHttpClient::always(429, ""));

    let (status, body) = send(app, get("/api/fred/series?series_id=GDP")).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "FRED API rate limit exceeded");
}

// =============================================================================
// Search and categories
// =============================================================================

#[tokio::test]
async fn search_accepts_q_as_alias() {
    // Given: upstream returns an empty listing
    let http = ScriptedHttpClient::always(200, &json!({"count": 0, "seriess": []}).to_string());
    let app = app_with(Arc::clone(&http));

    // When: the short alias is used with listing options
    let (status, _) = send(app, get("/api/fred/search?q=housing&limit=5&order_by=popularity")).await;

    // Then: the text is forwarded as search_text
    assert_eq!(status, StatusCode::OK);
    let sent = &http.requests()[0];
    assert_eq!(sent.query.get("search_text").map(String::as_str), Some("housing"));
    assert_eq!(sent.query.get("limit").map(String::as_str), Some("5"));
    assert_eq!(sent.query.get("order_by").map(String::as_str), Some("popularity"));
}

#[tokio::test]
async fn search_without_text_is_rejected() {
    let app = app_with(ScriptedHttpClient::always(200, "{}"));

    let (status, body) = send(app, get("/api/fred/search")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "search_text (or q) is required");
}

#[tokio::test]
async fn category_series_requires_numeric_id() {
    let app = app_with(ScriptedHttpClient::always(200, "{}"));

    let (status, _) = send(app, get("/api/fred/category-series?category_id=abc")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Multi-series and presets
// =============================================================================

#[tokio::test]
async fn multi_route_returns_partial_results_with_cached_false() {
    // Given: one of three series is unknown upstream
    let app = app_with(ScriptedHttpClient::observations_failing_for(&["BOGUS"], 400));

    // When: the batch is posted
    let (status, body) = send(
        app,
        post_json("/api/fred/multi", &json!({"series_ids": ["GDP", "BOGUS", "UNRATE"]})),
    )
    .await;

    // Then: the request succeeds with the failure isolated in its slot
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cached"], false);
    let results = body["data"]["results"].as_array().expect("results array");
    assert_eq!(results.len(), 3);
    assert_eq!(results[1]["series_id"], "BOGUS");
    assert!(results[1]["error"].is_string());
    assert_eq!(results[1]["observations"], json!([]));
    assert!(results[0].get("error").is_none());
}

#[tokio::test]
async fn multi_route_validates_series_list() {
    let app = app_with(ScriptedHttpClient::always(200, "{}"));
    let too_many: Vec<String> = (0..21).map(|index| format!("S{index}")).collect();

    let (empty_status, empty) =
        send(app.clone(), post_json("/api/fred/multi", &json!({"series_ids": []}))).await;
    let (many_status, many) =
        send(app.clone(), post_json("/api/fred/multi", &json!({"series_ids": too_many}))).await;
    let (bad_status, _) = send(
        app,
        Request::builder()
            .method("POST")
            .uri("/api/fred/multi")
            .body(Body::from("not json"))
            .expect("valid request"),
    )
    .await;

    assert_eq!(empty_status, StatusCode::BAD_REQUEST);
    assert_eq!(empty["error"], "series_ids must be a non-empty array");
    assert_eq!(many_status, StatusCode::BAD_REQUEST);
    assert_eq!(many["error"], "Maximum 20 series per request, got 21");
    assert_eq!(bad_status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn presets_are_listed_and_fetchable_by_slug() {
    let http = ScriptedHttpClient::observations_failing_for(&[], 400);
    let app = app_with(Arc::clone(&http));

    let (list_status, list) = send(app.clone(), get("/api/fred/presets")).await;
    let (fetch_status, fetched) = send(app.clone(), get("/api/fred/presets/housing-market")).await;
    let (missing_status, _) = send(app, get("/api/fred/presets/crypto")).await;

    assert_eq!(list_status, StatusCode::OK);
    assert_eq!(list["data"].as_array().map(Vec::len), Some(6));
    assert_eq!(fetch_status, StatusCode::OK);
    assert_eq!(fetched["data"]["results"].as_array().map(Vec::len), Some(5));
    assert_eq!(missing_status, StatusCode::NOT_FOUND);
    assert_eq!(http.call_count(), 5);
}

// =============================================================================
// Status and missing credentials
// =============================================================================

#[tokio::test]
async fn status_reports_keys_and_gauges_without_credentials() {
    // Given: no upstream key is configured
    let state = AppState::new(&FredConfig::default(), keys(false)).expect("valid config");
    let app = router(state);

    // When: status is requested
    let (status, body) = send(app, get("/api/status")).await;

    // Then: it answers with presence flags and resource gauges
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fred"], false);
    assert_eq!(body["openai"], false);
    assert_eq!(body["allConfigured"], false);
    assert_eq!(body["cache"], json!({"size": 0, "maxSize": 500}));
    assert_eq!(body["rateLimiter"]["maxTokens"], 120);
}

#[tokio::test]
async fn data_route_without_credentials_fails_with_500() {
    let state = AppState::new(&FredConfig::default(), keys(false)).expect("valid config");
    let app = router(state);

    let (status, body) = send(app, get("/api/fred/series?series_id=GDP")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "FRED_API_KEY environment variable is not set");
}

// =============================================================================
// Key validation
// =============================================================================

#[tokio::test]
async fn validate_keys_checks_fred_key_against_upstream_without_configured_key() {
    // Given: no key is configured and upstream accepts the supplied one
    let http = ScriptedHttpClient::always(200, &json!({"seriess": []}).to_string());
    let state = AppState::new(&FredConfig::default(), keys(false))
        .expect("valid config")
        .with_http_client(http.clone());

    // When: a key is submitted for validation
    let (status, body) = send(
        router(state),
        post_json("/api/validate-keys", &json!({"fredKey": "candidate", "openaiKey": "sk-x"})),
    )
    .await;

    // Then: the key was tried on the series endpoint and the AI key is not checked
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"fred": {"valid": true}, "openai": null}));
    let sent = &http.requests()[0];
    assert!(sent.url.ends_with("/series"));
    assert_eq!(sent.query.get("series_id").map(String::as_str), Some("GNPCA"));
    assert_eq!(sent.query.get("api_key").map(String::as_str), Some("candidate"));
}

#[tokio::test]
async fn validate_keys_reports_rejected_key() {
    let app = app_with(ScriptedHttpClient::always(400, "Bad Request.  Invalid api_key."));

    let (status, body) = send(
        app,
        post_json("/api/validate-keys", &json!({"fredKey": "wrong"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["fred"],
        json!({"valid": false, "error": "Invalid API key"})
    );
}

#[tokio::test]
async fn validate_keys_without_keys_or_with_bad_body() {
    let http = ScriptedHttpClient::always(200, "{}");
    let app = app_with(Arc::clone(&http));

    let (empty_status, empty) =
        send(app.clone(), post_json("/api/validate-keys", &json!({}))).await;
    let (bad_status, bad) = send(
        app,
        Request::builder()
            .method("POST")
            .uri("/api/validate-keys")
            .body(Body::from("{"))
            .expect("valid request"),
    )
    .await;

    assert_eq!(empty_status, StatusCode::OK);
    assert_eq!(empty, json!({"fred": null, "openai": null}));
    assert_eq!(bad_status, StatusCode::BAD_REQUEST);
    assert_eq!(bad["error"], "Invalid request");
    assert_eq!(http.call_count(), 0);
}
