//! Closed value sets accepted by the upstream query parameters.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

macro_rules! query_option {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim().to_ascii_lowercase().as_str() {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(ValidationError::InvalidOption {
                        field: $field,
                        value: other.to_owned(),
                        expected: Self::ALL
                            .iter()
                            .map(|option| option.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    }),
                }
            }
        }
    };
}

query_option! {
    /// Data transformation applied upstream before values are returned.
    Units, field = "units" {
        /// Levels, no transformation.
        Levels => "lin",
        Change => "chg",
        ChangeFromYearAgo => "ch1",
        PercentChange => "pch",
        PercentChangeFromYearAgo => "pc1",
        CompoundedAnnualRate => "pca",
        ContinuouslyCompounded => "cch",
        ContinuouslyCompoundedAnnual => "cca",
        NaturalLog => "log",
    }
}

query_option! {
    Frequency, field = "frequency" {
        Daily => "d",
        Weekly => "w",
        Biweekly => "bw",
        Monthly => "m",
        Quarterly => "q",
        Semiannual => "sa",
        Annual => "a",
    }
}

query_option! {
    /// How values are combined when `frequency` aggregates to a lower resolution.
    AggregationMethod, field = "aggregation_method" {
        Average => "avg",
        Sum => "sum",
        EndOfPeriod => "eop",
    }
}

query_option! {
    SortOrder, field = "sort_order" {
        Ascending => "asc",
        Descending => "desc",
    }
}

query_option! {
    SearchType, field = "search_type" {
        FullText => "full_text",
        SeriesId => "series_id",
    }
}

query_option! {
    SearchOrderBy, field = "order_by" {
        SearchRank => "search_rank",
        SeriesId => "series_id",
        Title => "title",
        Units => "units",
        Frequency => "frequency",
        SeasonalAdjustment => "seasonal_adjustment",
        RealtimeStart => "realtime_start",
        RealtimeEnd => "realtime_end",
        LastUpdated => "last_updated",
        ObservationStart => "observation_start",
        ObservationEnd => "observation_end",
        Popularity => "popularity",
        GroupPopularity => "group_popularity",
    }
}

query_option! {
    FilterVariable, field = "filter_variable" {
        Frequency => "frequency",
        Units => "units",
        SeasonalAdjustment => "seasonal_adjustment",
    }
}
