//! # Domain Models
//!
//! Typed values exchanged with the upstream statistical API.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SeriesId`] | Validated, uppercase series identifier |
//! | [`ObservationDate`] | `YYYY-MM-DD` calendar day |
//! | [`UtcDateTime`] | RFC3339 UTC timestamp |
//! | [`Observation`] | One dated value; missing points are `None` |
//! | [`SeriesInfo`] | Series metadata |
//! | [`MultiSeriesResult`] | Per-series outcome of a batch fetch |
//!
//! Query option enums ([`Units`], [`Frequency`], ...) parse from their wire
//! values with `FromStr` and reject anything outside the accepted set.

mod date;
mod observation;
mod options;
mod series;
mod series_id;
mod timestamp;

pub use date::ObservationDate;
pub use observation::{
    parse_observation_value, MultiSeriesResponse, MultiSeriesResult, Observation,
    ObservationsResponse, MISSING_VALUE,
};
pub use options::{
    AggregationMethod, FilterVariable, Frequency, SearchOrderBy, SearchType, SortOrder, Units,
};
pub use series::{CategorySeriesResponse, SearchResponse, SeriesInfo, SeriesPage, SeriesResponse};
pub use series_id::SeriesId;
pub use timestamp::UtcDateTime;
