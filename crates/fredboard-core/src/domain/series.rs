use serde::{Deserialize, Serialize};

/// Series metadata as reported by `series`, `series/search` and `category/series`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesInfo {
    pub id: String,
    #[serde(default)]
    pub realtime_start: String,
    #[serde(default)]
    pub realtime_end: String,
    pub title: String,
    #[serde(default)]
    pub observation_start: String,
    #[serde(default)]
    pub observation_end: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub frequency_short: String,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub units_short: String,
    #[serde(default)]
    pub seasonal_adjustment: String,
    #[serde(default)]
    pub seasonal_adjustment_short: String,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub popularity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_popularity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `series`. Upstream spells the list field `seriess`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesResponse {
    #[serde(default)]
    pub realtime_start: String,
    #[serde(default)]
    pub realtime_end: String,
    pub seriess: Vec<SeriesInfo>,
}

impl SeriesResponse {
    pub fn first(&self) -> Option<&SeriesInfo> {
        self.seriess.first()
    }
}

/// Paged series listing shared by `series/search` and `category/series`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPage {
    #[serde(default)]
    pub realtime_start: String,
    #[serde(default)]
    pub realtime_end: String,
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
    pub seriess: Vec<SeriesInfo>,
}

pub type SearchResponse = SeriesPage;
pub type CategorySeriesResponse = SeriesPage;
