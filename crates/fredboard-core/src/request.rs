use std::fmt::{Display, Formatter};

use crate::domain::{
    AggregationMethod, FilterVariable, Frequency, ObservationDate, SearchOrderBy, SearchType,
    SeriesId, SortOrder, Units,
};
use crate::params::QueryParams;
use crate::presets::PresetGroup;
use crate::ValidationError;

pub const MAX_OBSERVATIONS_LIMIT: u32 = 100_000;
pub const MAX_SEARCH_LIMIT: u32 = 1_000;
pub const MAX_SERIES_PER_REQUEST: usize = 20;

/// Upstream endpoint path segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Series,
    Observations,
    Search,
    CategorySeries,
}

impl Endpoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Series => "series",
            Self::Observations => "series/observations",
            Self::Search => "series/search",
            Self::CategorySeries => "category/series",
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses an integer query parameter and checks it lies in `min..=max`.
pub fn parse_bounded(
    field: &'static str,
    raw: &str,
    min: u32,
    max: u32,
) -> Result<u32, ValidationError> {
    let value: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidInteger {
            field,
            value: raw.to_owned(),
        })?;
    check_bounds(field, value, min, max)
}

fn check_bounds(field: &'static str, value: u64, min: u32, max: u32) -> Result<u32, ValidationError> {
    if value < u64::from(min) || value > u64::from(max) {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min: u64::from(min),
            max: u64::from(max),
        });
    }
    // Bounded by `max` above.
    Ok(value as u32)
}

fn check_range(
    start: Option<ObservationDate>,
    end: Option<ObservationDate>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => Err(ValidationError::InvertedDateRange {
            start: start.to_string(),
            end: end.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Request for `series/observations`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationsRequest {
    pub series_id: SeriesId,
    pub observation_start: Option<ObservationDate>,
    pub observation_end: Option<ObservationDate>,
    pub units: Option<Units>,
    pub frequency: Option<Frequency>,
    pub aggregation_method: Option<AggregationMethod>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ObservationsRequest {
    pub fn new(series_id: SeriesId) -> Self {
        Self {
            series_id,
            observation_start: None,
            observation_end: None,
            units: None,
            frequency: None,
            aggregation_method: None,
            sort_order: None,
            limit: None,
            offset: None,
        }
    }

    /// Sets the date bounds; either side may be open.
    pub fn with_range(
        mut self,
        start: Option<ObservationDate>,
        end: Option<ObservationDate>,
    ) -> Result<Self, ValidationError> {
        check_range(start, end)?;
        self.observation_start = start;
        self.observation_end = end;
        Ok(self)
    }

    pub fn with_units(mut self, units: Option<Units>) -> Self {
        self.units = units;
        self
    }

    pub fn with_frequency(mut self, frequency: Option<Frequency>) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_aggregation_method(mut self, method: Option<AggregationMethod>) -> Self {
        self.aggregation_method = method;
        self
    }

    pub fn with_sort_order(mut self, sort_order: Option<SortOrder>) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn with_limit(mut self, limit: Option<u32>) -> Result<Self, ValidationError> {
        if let Some(limit) = limit {
            check_bounds("limit", u64::from(limit), 1, MAX_OBSERVATIONS_LIMIT)?;
        }
        self.limit = limit;
        Ok(self)
    }

    pub fn with_offset(mut self, offset: Option<u32>) -> Self {
        self.offset = offset;
        self
    }

    pub fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with("series_id", &self.series_id)
            .with_opt("observation_start", self.observation_start)
            .with_opt("observation_end", self.observation_end)
            .with_opt("units", self.units)
            .with_opt("frequency", self.frequency)
            .with_opt("aggregation_method", self.aggregation_method)
            .with_opt("sort_order", self.sort_order)
            .with_opt("limit", self.limit)
            .with_opt("offset", self.offset)
    }
}

/// Request for `series` metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub series_id: SeriesId,
}

impl SeriesRequest {
    pub fn new(series_id: SeriesId) -> Self {
        Self { series_id }
    }

    pub fn to_params(&self) -> QueryParams {
        QueryParams::new().with("series_id", &self.series_id)
    }
}

/// Optional listing controls shared by search and category listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingOptions {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub order_by: Option<SearchOrderBy>,
    pub sort_order: Option<SortOrder>,
    pub filter_variable: Option<FilterVariable>,
    pub filter_value: Option<String>,
    pub tag_names: Option<String>,
    pub exclude_tag_names: Option<String>,
}

impl ListingOptions {
    pub fn with_limit(mut self, limit: Option<u32>) -> Result<Self, ValidationError> {
        if let Some(limit) = limit {
            check_bounds("limit", u64::from(limit), 1, MAX_SEARCH_LIMIT)?;
        }
        self.limit = limit;
        Ok(self)
    }

    fn apply(&self, params: QueryParams) -> QueryParams {
        params
            .with_opt("limit", self.limit)
            .with_opt("offset", self.offset)
            .with_opt("order_by", self.order_by)
            .with_opt("sort_order", self.sort_order)
            .with_opt("filter_variable", self.filter_variable)
            .with_opt("filter_value", non_blank(self.filter_value.as_deref()))
            .with_opt("tag_names", non_blank(self.tag_names.as_deref()))
            .with_opt("exclude_tag_names", non_blank(self.exclude_tag_names.as_deref()))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Request for `series/search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub search_text: String,
    pub search_type: Option<SearchType>,
    pub options: ListingOptions,
}

impl SearchRequest {
    pub fn new(search_text: impl Into<String>) -> Result<Self, ValidationError> {
        let search_text = search_text.into();
        let trimmed = search_text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySearchText);
        }
        Ok(Self {
            search_text: trimmed.to_owned(),
            search_type: None,
            options: ListingOptions::default(),
        })
    }

    pub fn with_search_type(mut self, search_type: Option<SearchType>) -> Self {
        self.search_type = search_type;
        self
    }

    pub fn with_options(mut self, options: ListingOptions) -> Self {
        self.options = options;
        self
    }

    pub fn to_params(&self) -> QueryParams {
        let params = QueryParams::new()
            .with("search_text", &self.search_text)
            .with_opt("search_type", self.search_type);
        self.options.apply(params)
    }
}

/// Request for `category/series`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySeriesRequest {
    pub category_id: u64,
    pub options: ListingOptions,
}

impl CategorySeriesRequest {
    pub fn new(category_id: u64) -> Self {
        Self {
            category_id,
            options: ListingOptions::default(),
        }
    }

    /// Parses the raw `category_id` query value.
    pub fn parse(raw: Option<&str>) -> Result<Self, ValidationError> {
        let raw = non_blank(raw).ok_or(ValidationError::MissingCategoryId)?;
        let category_id = raw.parse().map_err(|_| ValidationError::InvalidInteger {
            field: "category_id",
            value: raw.to_owned(),
        })?;
        Ok(Self::new(category_id))
    }

    pub fn with_options(mut self, options: ListingOptions) -> Self {
        self.options = options;
        self
    }

    pub fn to_params(&self) -> QueryParams {
        let params = QueryParams::new().with("category_id", self.category_id);
        self.options.apply(params)
    }
}

/// Batch observation request fanned out one fetch per identifier.
///
/// Identifiers are kept as given so a malformed one fails in its own slot
/// instead of rejecting the whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSeriesRequest {
    pub series_ids: Vec<String>,
    pub observation_start: Option<ObservationDate>,
    pub observation_end: Option<ObservationDate>,
    pub units: Option<Units>,
    pub frequency: Option<Frequency>,
}

impl MultiSeriesRequest {
    pub fn new<I, S>(series_ids: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let series_ids: Vec<String> = series_ids.into_iter().map(Into::into).collect();
        if series_ids.is_empty() {
            return Err(ValidationError::EmptySeriesList);
        }
        if series_ids.len() > MAX_SERIES_PER_REQUEST {
            return Err(ValidationError::TooManySeries {
                count: series_ids.len(),
                max: MAX_SERIES_PER_REQUEST,
            });
        }
        Ok(Self {
            series_ids,
            observation_start: None,
            observation_end: None,
            units: None,
            frequency: None,
        })
    }

    /// Batch over every series of a preset group.
    pub fn from_preset(group: &PresetGroup) -> Result<Self, ValidationError> {
        Self::new(group.series.iter().map(|preset| preset.id))
    }

    pub fn with_range(
        mut self,
        start: Option<ObservationDate>,
        end: Option<ObservationDate>,
    ) -> Result<Self, ValidationError> {
        check_range(start, end)?;
        self.observation_start = start;
        self.observation_end = end;
        Ok(self)
    }

    pub fn with_units(mut self, units: Option<Units>) -> Self {
        self.units = units;
        self
    }

    pub fn with_frequency(mut self, frequency: Option<Frequency>) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn len(&self) -> usize {
        self.series_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series_ids.is_empty()
    }

    /// Single-series request carrying the shared parameters.
    pub fn observations_for(&self, raw_id: &str) -> Result<ObservationsRequest, ValidationError> {
        Ok(ObservationsRequest::new(SeriesId::parse(raw_id)?)
            .with_range(self.observation_start, self.observation_end)?
            .with_units(self.units)
            .with_frequency(self.frequency))
    }
}
