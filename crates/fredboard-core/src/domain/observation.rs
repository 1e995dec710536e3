use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::ObservationDate;

/// Upstream sentinel for a missing data point.
pub const MISSING_VALUE: &str = ".";

/// Parses an upstream observation value. The missing-value sentinel and any
/// non-numeric or non-finite text become `None`, never zero or NaN.
pub fn parse_observation_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == MISSING_VALUE {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn deserialize_observation_value<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawValue {
        Text(String),
        Number(f64),
    }

    Ok(match Option::<RawValue>::deserialize(deserializer)? {
        Some(RawValue::Text(text)) => parse_observation_value(&text),
        Some(RawValue::Number(number)) => Some(number).filter(|value| value.is_finite()),
        None => None,
    })
}

/// One dated data point of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(default)]
    pub realtime_start: String,
    #[serde(default)]
    pub realtime_end: String,
    pub date: ObservationDate,
    #[serde(default, deserialize_with = "deserialize_observation_value")]
    pub value: Option<f64>,
}

impl Observation {
    pub fn is_missing(&self) -> bool {
        self.value.is_none()
    }
}

/// Body of `series/observations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationsResponse {
    #[serde(default)]
    pub realtime_start: String,
    #[serde(default)]
    pub realtime_end: String,
    #[serde(default)]
    pub observation_start: String,
    #[serde(default)]
    pub observation_end: String,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub order_by: String,
    #[serde(default)]
    pub sort_order: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
    pub observations: Vec<Observation>,
}

/// Outcome for one identifier of a multi-series batch.
///
/// A failed fetch keeps its slot with empty observations and the failure message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiSeriesResult {
    pub series_id: String,
    pub observations: Vec<Observation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MultiSeriesResult {
    pub fn success(series_id: impl Into<String>, observations: Vec<Observation>) -> Self {
        Self {
            series_id: series_id.into(),
            observations,
            error: None,
        }
    }

    pub fn failure(series_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            series_id: series_id.into(),
            observations: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiSeriesResponse {
    pub results: Vec<MultiSeriesResult>,
}

impl MultiSeriesResponse {
    pub fn failures(&self) -> impl Iterator<Item = &MultiSeriesResult> {
        self.results.iter().filter(|result| result.is_failure())
    }
}
