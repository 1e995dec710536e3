use std::str::FromStr;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use fredboard_core::{
    find_preset, parse_bounded, AggregationMethod, CacheStats, CategorySeriesRequest,
    CategorySeriesResponse, Envelope, FilterVariable, Frequency, ListingOptions,
    MultiSeriesRequest, MultiSeriesResponse, ObservationDate, ObservationsRequest,
    ObservationsResponse, PresetGroup, RateLimiterStatus, SearchOrderBy, SearchRequest,
    SearchResponse, SearchType, SeriesId, SeriesRequest, SeriesResponse, SortOrder, Units,
    KeyCheck, ValidationError, PRESETS,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::FirstQuery;
use crate::state::AppState;

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

fn present(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

fn parse_opt<T>(raw: &Option<String>) -> Result<Option<T>, ValidationError>
where
    T: FromStr<Err = ValidationError>,
{
    present(raw).map(T::from_str).transpose()
}

fn parse_date(field: &'static str, raw: &Option<String>) -> Result<Option<ObservationDate>, ValidationError> {
    present(raw)
        .map(|value| ObservationDate::parse_field(field, value))
        .transpose()
}

fn parse_count(field: &'static str, raw: &Option<String>) -> Result<Option<u32>, ValidationError> {
    present(raw)
        .map(|value| parse_bounded(field, value, 0, u32::MAX))
        .transpose()
}

#[derive(Debug, Default, Deserialize)]
pub struct ObservationsQuery {
    pub series_id: Option<String>,
    pub observation_start: Option<String>,
    pub observation_end: Option<String>,
    pub units: Option<String>,
    pub frequency: Option<String>,
    pub aggregation_method: Option<String>,
    pub sort_order: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ObservationsQuery {
    fn into_request(self) -> Result<ObservationsRequest, ValidationError> {
        let series_id = SeriesId::parse(self.series_id.as_deref().unwrap_or_default())?;
        ObservationsRequest::new(series_id)
            .with_range(
                parse_date("observation_start", &self.observation_start)?,
                parse_date("observation_end", &self.observation_end)?,
            )?
            .with_units(parse_opt::<Units>(&self.units)?)
            .with_frequency(parse_opt::<Frequency>(&self.frequency)?)
            .with_aggregation_method(parse_opt::<AggregationMethod>(&self.aggregation_method)?)
            .with_sort_order(parse_opt::<SortOrder>(&self.sort_order)?)
            .with_offset(parse_count("offset", &self.offset)?)
            .with_limit(parse_count("limit", &self.limit)?)
    }
}

pub async fn observations(
    State(state): State<AppState>,
    FirstQuery(query): FirstQuery<ObservationsQuery>,
) -> ApiResult<ObservationsResponse> {
    let request = query.into_request()?;
    let fetched = state.client()?.observations(&request).await?;
    Ok(Json(Envelope::success(fetched.data, fetched.cached)))
}

#[derive(Debug, Default, Deserialize)]
pub struct SeriesQuery {
    pub series_id: Option<String>,
}

pub async fn series(
    State(state): State<AppState>,
    FirstQuery(query): FirstQuery<SeriesQuery>,
) -> ApiResult<SeriesResponse> {
    let series_id = SeriesId::parse(query.series_id.as_deref().unwrap_or_default())?;
    let fetched = state
        .client()?
        .series_info(&SeriesRequest::new(series_id))
        .await?;
    Ok(Json(Envelope::success(fetched.data, fetched.cached)))
}

/// Listing controls shared by search and category routes.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub order_by: Option<String>,
    pub sort_order: Option<String>,
    pub filter_variable: Option<String>,
    pub filter_value: Option<String>,
    pub tag_names: Option<String>,
    pub exclude_tag_names: Option<String>,
}

impl ListingQuery {
    fn into_options(self) -> Result<ListingOptions, ValidationError> {
        ListingOptions {
            offset: parse_count("offset", &self.offset)?,
            order_by: parse_opt::<SearchOrderBy>(&self.order_by)?,
            sort_order: parse_opt::<SortOrder>(&self.sort_order)?,
            filter_variable: parse_opt::<FilterVariable>(&self.filter_variable)?,
            filter_value: self.filter_value,
            tag_names: self.tag_names,
            exclude_tag_names: self.exclude_tag_names,
            ..ListingOptions::default()
        }
        .with_limit(parse_count("limit", &self.limit)?)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search_text: Option<String>,
    pub q: Option<String>,
    pub search_type: Option<String>,
    #[serde(flatten)]
    pub listing: ListingQuery,
}

pub async fn search(
    State(state): State<AppState>,
    FirstQuery(query): FirstQuery<SearchQuery>,
) -> ApiResult<SearchResponse> {
    let text = present(&query.search_text).or(present(&query.q)).unwrap_or_default();
    let request = SearchRequest::new(text)?
        .with_search_type(parse_opt::<SearchType>(&query.search_type)?)
        .with_options(query.listing.into_options()?);

    let fetched = state.client()?.search(&request).await?;
    Ok(Json(Envelope::success(fetched.data, fetched.cached)))
}

#[derive(Debug, Default, Deserialize)]
pub struct CategorySeriesQuery {
    pub category_id: Option<String>,
    #[serde(flatten)]
    pub listing: ListingQuery,
}

pub async fn category_series(
    State(state): State<AppState>,
    FirstQuery(query): FirstQuery<CategorySeriesQuery>,
) -> ApiResult<CategorySeriesResponse> {
    let request = CategorySeriesRequest::parse(query.category_id.as_deref())?
        .with_options(query.listing.into_options()?);

    let fetched = state.client()?.category_series(&request).await?;
    Ok(Json(Envelope::success(fetched.data, fetched.cached)))
}

#[derive(Debug, Default, Deserialize)]
pub struct MultiSeriesBody {
    #[serde(default)]
    pub series_ids: Vec<String>,
    pub observation_start: Option<String>,
    pub observation_end: Option<String>,
    pub units: Option<String>,
    pub frequency: Option<String>,
}

impl MultiSeriesBody {
    fn into_request(self) -> Result<MultiSeriesRequest, ValidationError> {
        let request = MultiSeriesRequest::new(self.series_ids)?;
        Ok(request
            .with_range(
                parse_date("observation_start", &self.observation_start)?,
                parse_date("observation_end", &self.observation_end)?,
            )?
            .with_units(parse_opt::<Units>(&self.units)?)
            .with_frequency(parse_opt::<Frequency>(&self.frequency)?))
    }
}

/// Body is parsed by hand so malformed JSON still gets an error envelope.
pub async fn multi(State(state): State<AppState>, body: Bytes) -> ApiResult<MultiSeriesResponse> {
    let body: MultiSeriesBody =
        serde_json::from_slice(&body).map_err(|error| ApiError::InvalidBody(error.to_string()))?;
    let request = body.into_request()?;

    let response = state.client()?.multiple_observations(&request).await;
    Ok(Json(Envelope::success(response, false)))
}

pub async fn presets() -> Json<Envelope<&'static [PresetGroup]>> {
    Json(Envelope::success(PRESETS, false))
}

#[derive(Debug, Default, Deserialize)]
pub struct PresetQuery {
    pub observation_start: Option<String>,
    pub observation_end: Option<String>,
}

pub async fn preset_observations(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    FirstQuery(query): FirstQuery<PresetQuery>,
) -> ApiResult<MultiSeriesResponse> {
    let group = find_preset(&slug).ok_or_else(|| ApiError::NotFound(format!("unknown preset '{slug}'")))?;
    let request = MultiSeriesRequest::from_preset(group)?.with_range(
        parse_date("observation_start", &query.observation_start)?,
        parse_date("observation_end", &query.observation_end)?,
    )?;

    let response = state.client()?.multiple_observations(&request).await;
    Ok(Json(Envelope::success(response, false)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub fred: bool,
    pub openai: bool,
    pub all_configured: bool,
    pub cache: CacheStats,
    pub rate_limiter: RateLimiterStatus,
}

/// Credential presence and shared-resource gauges. Never needs a credential.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let keys = state.keys();
    Json(StatusResponse {
        fred: keys.fred,
        openai: keys.openai,
        all_configured: keys.all_configured,
        cache: state.cache().stats(),
        rate_limiter: state.limiter().status(),
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateKeysBody {
    pub fred_key: Option<String>,
}

/// `openai` is always `null`; the AI provider is not checked here.
#[derive(Debug, Default, Serialize)]
pub struct ValidateKeysResponse {
    pub fred: Option<KeyCheck>,
    pub openai: Option<KeyCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Checks caller-supplied credentials against upstream. Works without a configured key.
pub async fn validate_keys(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<ValidateKeysResponse>) {
    let Ok(body) = serde_json::from_slice::<ValidateKeysBody>(&body) else {
        let rejected = ValidateKeysResponse {
            error: Some(String::from("Invalid request")),
            ..ValidateKeysResponse::default()
        };
        return (StatusCode::BAD_REQUEST, Json(rejected));
    };

    let fred = match present(&body.fred_key) {
        Some(key) => Some(state.check_fred_key(key).await),
        None => None,
    };
    (
        StatusCode::OK,
        Json(ValidateKeysResponse {
            fred,
            ..ValidateKeysResponse::default()
        }),
    )
}
