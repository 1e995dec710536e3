//! Curated series groups served as ready-made dashboards.

use serde::Serialize;

use crate::domain::Frequency;
use crate::domain::Frequency::{Daily, Monthly, Quarterly, Weekly};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub frequency: Frequency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PresetGroup {
    pub slug: &'static str,
    pub title: &'static str,
    pub series: &'static [SeriesPreset],
}

const fn preset(id: &'static str, name: &'static str, frequency: Frequency) -> SeriesPreset {
    SeriesPreset {
        id,
        name,
        frequency,
    }
}

pub const PRESETS: &[PresetGroup] = &[
    PresetGroup {
        slug: "economy-at-a-glance",
        title: "Economy at a Glance",
        series: &[
            preset("GDP", "Gross Domestic Product", Quarterly),
            preset("CPIAUCSL", "CPI - All Urban Consumers", Monthly),
            preset("UNRATE", "Unemployment Rate", Monthly),
            preset("DFF", "Federal Funds Rate", Daily),
            preset("DGS10", "10-Year Treasury Yield", Daily),
            preset("UMCSENT", "Consumer Sentiment", Monthly),
        ],
    },
    PresetGroup {
        slug: "inflation-watch",
        title: "Inflation Watch",
        series: &[
            preset("CPIAUCSL", "CPI - All Urban Consumers", Monthly),
            preset("PCEPI", "PCE Price Index", Monthly),
            preset("CPILFESL", "Core CPI (Less Food & Energy)", Monthly),
            preset("MICH", "Inflation Expectations", Monthly),
            preset("M2SL", "M2 Money Supply", Monthly),
        ],
    },
    PresetGroup {
        slug: "jobs-and-employment",
        title: "Jobs and Employment",
        series: &[
            preset("UNRATE", "Unemployment Rate", Monthly),
            preset("PAYEMS", "Nonfarm Payrolls", Monthly),
            preset("ICSA", "Initial Jobless Claims", Weekly),
            preset("CIVPART", "Labor Force Participation", Monthly),
            preset("CES0500000003", "Average Hourly Earnings", Monthly),
        ],
    },
    PresetGroup {
        slug: "interest-rates",
        title: "Interest Rates",
        series: &[
            preset("DFF", "Federal Funds Rate", Daily),
            preset("DGS2", "2-Year Treasury Yield", Daily),
            preset("DGS10", "10-Year Treasury Yield", Daily),
            preset("DGS30", "30-Year Treasury Yield", Daily),
            preset("T10Y2Y", "Yield Curve Spread (10Y-2Y)", Daily),
            preset("BAMLH0A0HYM2", "High Yield Bond Spread", Daily),
        ],
    },
    PresetGroup {
        slug: "housing-market",
        title: "Housing Market",
        series: &[
            preset("HOUST", "Housing Starts", Monthly),
            preset("PERMIT", "Building Permits", Monthly),
            preset("MORTGAGE30US", "30-Year Mortgage Rate", Weekly),
            preset("MSPUS", "Median Home Sale Price", Quarterly),
            preset("CSUSHPISA", "Case-Shiller Home Price Index", Monthly),
        ],
    },
    PresetGroup {
        slug: "economic-growth",
        title: "Economic Growth",
        series: &[
            preset("GDP", "Gross Domestic Product", Quarterly),
            preset("GDPC1", "Real GDP", Quarterly),
            preset("INDPRO", "Industrial Production", Monthly),
            preset("RSAFS", "Retail Sales", Monthly),
            preset("DCOILWTICO", "WTI Crude Oil", Daily),
        ],
    },
];

pub fn find_preset(slug: &str) -> Option<&'static PresetGroup> {
    let slug = slug.trim();
    PRESETS
        .iter()
        .find(|group| group.slug.eq_ignore_ascii_case(slug))
}
