//! Dataset assembly
//!
//! Converts raw forecast responses into [`ForecastSeries`] for charting and
//! [`DetailedForecastRecord`]s for the trip map, and computes the date ranges
//! used for year-over-year comparison.

use crate::config::EndpointsConfig;
use crate::forecast::{ForecastRequest, HISTORICAL_VARIABLE};
use crate::http::JsonFetcher;
use crate::models::openmeteo::{DailyResponse, HourlyResponse};
use crate::models::{
    Coordinate, DateRange, DetailedForecastRecord, ForecastDays, ForecastSeries, ForecastVariable,
};
use crate::{Result, TripcastError};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

/// Pair `hourly.time` with `hourly.{key}` of one response
pub fn extract_series(response: &Value, key: &str, label: &str) -> Result<ForecastSeries> {
    let hourly = HourlyResponse::deserialize(response)
        .map_err(|e| TripcastError::missing_data(format!("hourly block: {e}")))?
        .hourly;

    let values = hourly
        .values
        .get(key)
        .ok_or_else(|| TripcastError::missing_data(format!("hourly.{key}")))?;

    if values.len() != hourly.time.len() {
        return Err(TripcastError::missing_data(format!(
            "hourly.{key} has {} values for {} timestamps",
            values.len(),
            hourly.time.len()
        )));
    }

    let points = hourly.time.into_iter().zip(values.iter().copied()).collect();
    Ok(ForecastSeries::new(label, points))
}

/// One series per short-range variable, each from its own request
pub fn short_range_series(
    fetcher: &dyn JsonFetcher,
    endpoints: &EndpointsConfig,
    coordinate: Coordinate,
    days: ForecastDays,
) -> Result<Vec<ForecastSeries>> {
    ForecastVariable::all()
        .iter()
        .map(|&variable| {
            let response = ForecastRequest::ShortRange {
                coordinate,
                variable,
                days,
            }
            .fetch(fetcher, endpoints)?;
            extract_series(&response, variable.as_str(), variable.as_str())
        })
        .collect()
}

/// Date ranges for the `years` years preceding `start`.
///
/// Month and day are kept, the year counts down from `start.year() - 1`,
/// and each range ends `days - 1` days later within the same month. Dates
/// that do not exist (a day past the month's end, Feb 29 outside leap years)
/// are not corrected and fail with [`TripcastError::InvalidDate`].
pub fn historical_ranges(start: NaiveDate, days: ForecastDays, years: u32) -> Result<Vec<DateRange>> {
    if years == 0 {
        return Err(TripcastError::validation("Number of years must be at least 1"));
    }

    let month = start.month();
    let start_day = start.day();
    let end_day = start_day + days.get() - 1;

    (1..=years)
        .map(|offset| {
            let year = start.year() - i32::try_from(offset).unwrap_or(i32::MAX);
            let from = calendar_date(year, month, start_day)?;
            let to = calendar_date(year, month, end_day)?;
            Ok(DateRange::new(from, to))
        })
        .collect()
}

fn calendar_date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(TripcastError::InvalidDate { year, month, day })
}

/// Archived temperature for each historical year, followed by the current
/// temperature forecast, ready to be overlaid on one chart
pub fn historical_series(
    fetcher: &dyn JsonFetcher,
    endpoints: &EndpointsConfig,
    coordinate: Coordinate,
    start: NaiveDate,
    days: ForecastDays,
    years: u32,
) -> Result<Vec<ForecastSeries>> {
    let ranges = historical_ranges(start, days, years)?;
    let mut series = Vec::with_capacity(ranges.len() + 1);

    for range in ranges {
        info!("Fetching archived temperature for {range}");
        let response = ForecastRequest::Historical { coordinate, range }.fetch(fetcher, endpoints)?;
        let key = range.key();
        series.push(extract_series(&response, HISTORICAL_VARIABLE, &key[..4])?);
    }

    let variable = ForecastVariable::Temperature;
    let response = ForecastRequest::ShortRange {
        coordinate,
        variable,
        days,
    }
    .fetch(fetcher, endpoints)?;
    series.push(extract_series(&response, variable.as_str(), variable.as_str())?);

    debug!("Assembled {} series", series.len());
    Ok(series)
}

/// Daily aggregates for `date`, read from the first element of each daily array
pub fn detailed_record(response: &Value, date: NaiveDate) -> Result<DetailedForecastRecord> {
    let daily = DailyResponse::deserialize(response)
        .map_err(|e| TripcastError::missing_data(format!("daily block: {e}")))?
        .daily;

    if daily.time.is_empty() {
        return Err(TripcastError::missing_data(format!("no daily values for {date}")));
    }

    Ok(DetailedForecastRecord {
        date,
        weather_code: first(&daily.weather_code),
        temperature_max: first(&daily.temperature_max),
        temperature_min: first(&daily.temperature_min),
        rain_sum: first(&daily.rain_sum),
        showers_sum: first(&daily.showers_sum),
        wind_speed_max: first(&daily.wind_speed_max),
    })
}

fn first<T: Copy>(values: &[Option<T>]) -> Option<T> {
    values.first().copied().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use serde_json::json;
    use std::cell::RefCell;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_extract_series_keeps_order_and_values() {
        let response = json!({
            "hourly": {
                "time": ["2024-01-01T00:00", "2024-01-01T01:00"],
                "temperature_2m": [1.0, 2.0]
            }
        });
        let series = extract_series(&response, "temperature_2m", "temperature_2m").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(
            series.points,
            vec![
                ("2024-01-01T00:00".to_string(), Some(1.0)),
                ("2024-01-01T01:00".to_string(), Some(2.0)),
            ]
        );
    }

    #[test]
    fn test_extract_series_missing_variable() {
        let response = json!({"hourly": {"time": ["2024-01-01T00:00"], "showers": [0.0]}});
        let err = extract_series(&response, "cloudcover", "cloudcover").unwrap_err();
        assert!(err.to_string().contains("hourly.cloudcover"));
    }

    #[test]
    fn test_extract_series_rejects_error_body() {
        let response = json!({"error": true, "reason": "Cannot initialize WeatherVariable"});
        let err = extract_series(&response, "temperature_2m", "t").unwrap_err();
        assert!(matches!(err, TripcastError::MissingData { .. }));
    }

    #[test]
    fn test_extract_series_length_mismatch() {
        let response = json!({"hourly": {"time": ["a", "b"], "temperature_2m": [1.0]}});
        assert!(extract_series(&response, "temperature_2m", "t").is_err());
    }

    #[test]
    fn test_historical_ranges_step_back_one_year() {
        let ranges =
            historical_ranges(date(2024, 3, 10), ForecastDays::new(5).unwrap(), 3).unwrap();
        assert_eq!(
            ranges,
            vec![
                DateRange::new(date(2023, 3, 10), date(2023, 3, 14)),
                DateRange::new(date(2022, 3, 10), date(2022, 3, 14)),
                DateRange::new(date(2021, 3, 10), date(2021, 3, 14)),
            ]
        );
    }

    #[test]
    fn test_historical_ranges_do_not_roll_into_next_month() {
        let err =
            historical_ranges(date(2024, 3, 30), ForecastDays::new(5).unwrap(), 1).unwrap_err();
        assert!(matches!(
            err,
            TripcastError::InvalidDate {
                year: 2023,
                month: 3,
                day: 34
            }
        ));
    }

    #[test]
    fn test_historical_ranges_leap_day() {
        let err =
            historical_ranges(date(2024, 2, 29), ForecastDays::new(1).unwrap(), 2).unwrap_err();
        assert!(matches!(err, TripcastError::InvalidDate { year: 2023, .. }));
    }

    #[test]
    fn test_historical_ranges_zero_years() {
        assert!(historical_ranges(date(2024, 3, 10), ForecastDays::new(5).unwrap(), 0).is_err());
    }

    struct ByUrl {
        urls: RefCell<Vec<String>>,
    }

    impl JsonFetcher for ByUrl {
        fn get_json(&self, url: &str) -> std::result::Result<Value, FetchError> {
            self.urls.borrow_mut().push(url.to_string());
            let variable = ["temperature_2m", "showers", "cloudcover"]
                .into_iter()
                .find(|v| url.contains(&format!("hourly={v}")))
                .ok_or_else(|| FetchError::InvalidUrl(url.to_string()))?;
            Ok(json!({"hourly": {"time": ["t0", "t1"], variable: [0.5, 1.5]}}))
        }
    }

    fn endpoints() -> EndpointsConfig {
        EndpointsConfig {
            geocode_url: "https://geo.test".into(),
            forecast_url: "https://forecast.test".into(),
            archive_url: "https://archive.test".into(),
        }
    }

    #[test]
    fn test_short_range_series_one_request_per_variable() {
        let fetcher = ByUrl {
            urls: RefCell::new(Vec::new()),
        };
        let series = short_range_series(
            &fetcher,
            &endpoints(),
            Coordinate::new(51.11, 17.04),
            ForecastDays::new(2).unwrap(),
        )
        .unwrap();

        let labels: Vec<&str> = series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["temperature_2m", "showers", "cloudcover"]);
        assert_eq!(fetcher.urls.borrow().len(), 3);
    }

    #[test]
    fn test_historical_series_labels_years_then_forecast() {
        let fetcher = ByUrl {
            urls: RefCell::new(Vec::new()),
        };
        let series = historical_series(
            &fetcher,
            &endpoints(),
            Coordinate::new(51.11, 17.04),
            date(2024, 3, 10),
            ForecastDays::new(5).unwrap(),
            2,
        )
        .unwrap();

        let labels: Vec<&str> = series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["2023", "2022", "temperature_2m"]);

        let urls = fetcher.urls.borrow();
        assert!(urls[0].starts_with("https://archive.test/v1/archive?"));
        assert!(urls[0].contains("start_date=2023-03-10&end_date=2023-03-14"));
        assert!(urls[2].starts_with("https://forecast.test/v1/forecast?"));
    }

    #[test]
    fn test_sentinel_stops_assembly() {
        struct Offline;
        impl JsonFetcher for Offline {
            fn get_json(&self, _url: &str) -> std::result::Result<Value, FetchError> {
                Err(FetchError::Connection("refused".into()))
            }
        }

        let err = short_range_series(
            &Offline,
            &endpoints(),
            Coordinate::new(51.11, 17.04),
            ForecastDays::new(2).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, TripcastError::Fetch(FetchError::Connection(_))));
    }

    #[test]
    fn test_detailed_record_reads_first_values() {
        let response = json!({
            "daily": {
                "time": ["2024-07-01"],
                "weathercode": [80],
                "temperature_2m_max": [27.4],
                "temperature_2m_min": [15.1],
                "rain_sum": [0.0],
                "showers_sum": [1.8],
                "windspeed_10m_max": [19.6]
            }
        });
        let record = detailed_record(&response, date(2024, 7, 1)).unwrap();
        assert_eq!(record.weather_code, Some(80));
        assert_eq!(record.temperature_max, Some(27.4));
        assert_eq!(record.showers_sum, Some(1.8));
        assert!(record.has_precipitation());
    }

    #[test]
    fn test_detailed_record_without_daily_block() {
        let err = detailed_record(&json!({"hourly": {}}), date(2024, 7, 1)).unwrap_err();
        assert!(matches!(err, TripcastError::MissingData { .. }));
    }
}
