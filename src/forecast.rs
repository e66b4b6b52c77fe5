//! Forecast requests against the Open-Meteo forecast and archive endpoints

use crate::config::EndpointsConfig;
use crate::error::FetchError;
use crate::http::JsonFetcher;
use crate::models::{Coordinate, DateRange, ForecastDays, ForecastVariable};
use serde_json::Value;
use tracing::debug;

/// Daily aggregates requested for trip planning
pub const DETAILED_DAILY_VARIABLES: [&str; 6] = [
    "weathercode",
    "temperature_2m_max",
    "temperature_2m_min",
    "rain_sum",
    "showers_sum",
    "windspeed_10m_max",
];

/// Variable served by the historical archive
pub const HISTORICAL_VARIABLE: &str = "temperature_2m";

/// One weather request; each variant carries only what its URL needs
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastRequest {
    /// Hourly values of one variable for the next `days` days
    ShortRange {
        coordinate: Coordinate,
        variable: ForecastVariable,
        days: ForecastDays,
    },
    /// The six daily aggregates over a date range
    Detailed {
        coordinate: Coordinate,
        range: DateRange,
        timezone: String,
    },
    /// Hourly archived temperature over a past date range
    Historical {
        coordinate: Coordinate,
        range: DateRange,
    },
}

impl ForecastRequest {
    /// Full request URL for the configured endpoints
    #[must_use]
    pub fn url(&self, endpoints: &EndpointsConfig) -> String {
        match self {
            ForecastRequest::ShortRange {
                coordinate,
                variable,
                days,
            } => format!(
                "{}/v1/forecast?latitude={}&longitude={}&hourly={}&forecast_days={}",
                base(&endpoints.forecast_url),
                coordinate.latitude(),
                coordinate.longitude(),
                variable.as_str(),
                days.get()
            ),
            ForecastRequest::Detailed {
                coordinate,
                range,
                timezone,
            } => format!(
                "{}/v1/forecast?latitude={}&longitude={}&daily={}&start_date={}&end_date={}&timezone={}",
                base(&endpoints.forecast_url),
                coordinate.latitude(),
                coordinate.longitude(),
                DETAILED_DAILY_VARIABLES.join(","),
                range.start.format("%Y-%m-%d"),
                range.end.format("%Y-%m-%d"),
                urlencoding::encode(timezone)
            ),
            ForecastRequest::Historical { coordinate, range } => format!(
                "{}/v1/archive?latitude={}&longitude={}&start_date={}&end_date={}&hourly={}",
                base(&endpoints.archive_url),
                coordinate.latitude(),
                coordinate.longitude(),
                range.start.format("%Y-%m-%d"),
                range.end.format("%Y-%m-%d"),
                HISTORICAL_VARIABLE
            ),
        }
    }

    /// Issue the request; the fetcher's result is returned unmodified
    pub fn fetch(
        &self,
        fetcher: &dyn JsonFetcher,
        endpoints: &EndpointsConfig,
    ) -> std::result::Result<Value, FetchError> {
        let url = self.url(endpoints);
        debug!("Weather request: {url}");
        fetcher.get_json(&url)
    }
}

fn base(url: &str) -> &str {
    url.trim_end_matches('/')
}
